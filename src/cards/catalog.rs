use super::Category;
use super::Combination;
use super::canonical;
use itertools::Itertools;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::collections::HashSet;
use std::path::Path;

/// rank characters in game order, weakest first, jokers excluded
const SEQUENCE: &str = "34567890JQKA2";

/// On-disk form of the catalog: family name to the list of plays in
/// emission order (array index == score). The file is a build artifact,
/// regenerated whenever it is missing.
#[derive(Debug, Serialize, Deserialize)]
pub struct RuleFile(pub BTreeMap<String, Vec<String>>);

impl RuleFile {
    /// Enumerate every legal play of every family. Jokers join the
    /// singles list only after sequence generation, so runs never hold a
    /// `2` or a joker while solo kickers may be jokers.
    pub fn generate() -> RuleFile {
        let mut rule = BTreeMap::new();
        let mut singles = SEQUENCE.chars().map(String::from).collect::<Vec<String>>();
        let pairs = repeated(2);
        let trios = repeated(3);
        let bombs = repeated(4);
        for n in 5..=12 {
            rule.insert(format!("seq_single{}", n), runs(&singles, n));
        }
        for n in 3..=10 {
            rule.insert(format!("seq_pair{}", n), runs(&pairs, n));
        }
        for n in 2..=6 {
            rule.insert(format!("seq_trio{}", n), runs(&trios, n));
        }
        singles.push("w".to_string());
        singles.push("W".to_string());
        rule.insert("rocket".to_string(), vec!["Ww".to_string()]);
        let mut trio_single = Vec::new();
        let mut trio_pair = Vec::new();
        for trio in &trios {
            for solo in singles.iter().filter(|s| differ(s, trio)) {
                trio_single.push(format!("{}{}", trio, solo));
            }
            for pair in pairs.iter().filter(|p| differ(p, trio)) {
                trio_pair.push(format!("{}{}", trio, pair));
            }
        }
        rule.insert("trio_single".to_string(), trio_single);
        rule.insert("trio_pair".to_string(), trio_pair);
        for n in 2..=5 {
            let mut with_solos = Vec::new();
            let mut with_pairs = Vec::new();
            for run in runs(&trios, n) {
                for kicker in kickers(&singles, &run, n) {
                    with_solos.push(format!("{}{}", run, kicker));
                    if jokerless(&kicker) {
                        with_pairs.push(format!("{}{}{}", run, kicker, kicker));
                    }
                }
            }
            rule.insert(format!("seq_trio_single{}", n), with_solos);
            rule.insert(format!("seq_trio_pair{}", n), with_pairs);
        }
        let mut bomb_single = Vec::new();
        let mut bomb_pair = Vec::new();
        for bomb in &bombs {
            for kicker in kickers(&singles, bomb, 2) {
                bomb_single.push(format!("{}{}", bomb, kicker));
                if jokerless(&kicker) {
                    bomb_pair.push(format!("{}{}{}", bomb, kicker, kicker));
                }
            }
        }
        rule.insert("bomb_single".to_string(), bomb_single);
        rule.insert("bomb_pair".to_string(), bomb_pair);
        rule.insert("single".to_string(), singles);
        rule.insert("pair".to_string(), pairs);
        rule.insert("trio".to_string(), trios);
        rule.insert("bomb".to_string(), bombs);
        RuleFile(rule)
    }
}

/// every rank repeated n times, weakest first
fn repeated(n: usize) -> Vec<String> {
    SEQUENCE.chars().map(|c| c.to_string().repeat(n)).collect()
}

/// contiguous runs of length n that stop short of rank `2`
fn runs(seq: &[String], n: usize) -> Vec<String> {
    seq.windows(n).take(SEQUENCE.len() - n).map(|w| w.concat()).collect()
}

/// n distinct kicker ranks drawn from the singles minus the base's ranks
fn kickers(singles: &[String], base: &str, n: usize) -> Vec<String> {
    let taken = base.bytes().collect::<HashSet<u8>>();
    singles
        .iter()
        .filter(|s| !taken.contains(&s.as_bytes()[0]))
        .combinations(n)
        .map(|combo| combo.into_iter().map(String::as_str).collect::<String>())
        .collect()
}

fn differ(kicker: &str, base: &str) -> bool {
    kicker.as_bytes()[0] != base.as_bytes()[0]
}

fn jokerless(kicker: &str) -> bool {
    !kicker.contains(['w', 'W'])
}

/// The complete play catalog, generated once at startup and read-only
/// thereafter. `by_key` resolves a canonical rank string to its entry;
/// `by_type` lists each family weakest first, so an entry's score equals
/// its index in its family list.
#[derive(Debug)]
pub struct Catalog {
    by_key: HashMap<String, Combination>,
    by_type: HashMap<Category, Vec<Combination>>,
}

impl Catalog {
    /// generate in memory, no cache file
    pub fn new() -> Catalog {
        Self::index(&RuleFile::generate()).expect("generated catalog is well formed")
    }

    /// load the cache if present, otherwise generate and write it.
    /// a cache write failure is fatal: the caller terminates startup.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Catalog> {
        let path = path.as_ref();
        let rule = if path.exists() {
            serde_json::from_str(&std::fs::read_to_string(path)?)?
        } else {
            let rule = RuleFile::generate();
            std::fs::write(path, serde_json::to_string(&rule)?)?;
            log::info!("wrote combination catalog to {}", path.display());
            rule
        };
        Self::index(&rule)
    }

    fn index(rule: &RuleFile) -> anyhow::Result<Catalog> {
        let mut by_key = HashMap::with_capacity(16384);
        let mut by_type = HashMap::<Category, Vec<Combination>>::new();
        for (name, plays) in &rule.0 {
            let category = name
                .parse::<Category>()
                .map_err(|e| anyhow::anyhow!("bad catalog entry: {}", e))?;
            let family = by_type.entry(category).or_default();
            for play in plays {
                let key = canonical(play);
                let combination = Combination {
                    category,
                    score: family.len(),
                    key: key.clone(),
                };
                by_key.insert(key, combination.clone());
                family.push(combination);
            }
        }
        Ok(Catalog { by_key, by_type })
    }

    pub fn lookup(&self, key: &str) -> Option<&Combination> {
        self.by_key.get(key)
    }

    pub fn family(&self, category: Category) -> &[Combination] {
        self.by_type.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn size(&self) -> usize {
        self.by_key.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choose(n: usize, k: usize) -> usize {
        (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
    }

    #[test]
    fn base_family_counts() {
        let catalog = Catalog::new();
        assert_eq!(catalog.family(Category::Single).len(), 15);
        assert_eq!(catalog.family(Category::Pair).len(), 13);
        assert_eq!(catalog.family(Category::Trio).len(), 13);
        assert_eq!(catalog.family(Category::Bomb).len(), 13);
        assert_eq!(catalog.family(Category::Rocket).len(), 1);
    }

    #[test]
    fn sequence_family_counts() {
        let catalog = Catalog::new();
        for n in 5..=12 {
            assert_eq!(catalog.family(Category::SeqSingle(n)).len(), 13 - n);
        }
        for n in 3..=10 {
            assert_eq!(catalog.family(Category::SeqPair(n)).len(), 13 - n);
        }
        for n in 2..=6 {
            assert_eq!(catalog.family(Category::SeqTrio(n)).len(), 13 - n);
        }
    }

    #[test]
    fn kicker_family_counts() {
        let catalog = Catalog::new();
        assert_eq!(catalog.family(Category::TrioSingle).len(), 13 * 14);
        assert_eq!(catalog.family(Category::TrioPair).len(), 13 * 12);
        for n in 2..=5 {
            assert_eq!(
                catalog.family(Category::SeqTrioSingle(n)).len(),
                (13 - n) * choose(15 - n, n),
            );
            assert_eq!(
                catalog.family(Category::SeqTrioPair(n)).len(),
                (13 - n) * choose(13 - n, n),
            );
        }
        assert_eq!(catalog.family(Category::BombSingle).len(), 13 * choose(14, 2));
        assert_eq!(catalog.family(Category::BombPair).len(), 13 * choose(12, 2));
    }

    #[test]
    fn keys_are_unique_across_families() {
        let catalog = Catalog::new();
        let total = catalog.by_type.values().map(Vec::len).sum::<usize>();
        assert_eq!(catalog.size(), total);
        assert_eq!(total, 13_998);
    }

    #[test]
    fn score_equals_family_index() {
        let catalog = Catalog::new();
        for family in catalog.by_type.values() {
            for (index, combination) in family.iter().enumerate() {
                assert_eq!(combination.score, index);
                assert_eq!(catalog.lookup(&combination.key), Some(combination));
            }
        }
    }

    #[test]
    fn family_order_ascends_by_strength() {
        let catalog = Catalog::new();
        let singles = catalog.family(Category::Single);
        assert_eq!(singles.first().map(|c| c.key.as_str()), Some("3"));
        assert_eq!(singles.get(12).map(|c| c.key.as_str()), Some("2"));
        assert_eq!(singles.get(13).map(|c| c.key.as_str()), Some("w"));
        assert_eq!(singles.last().map(|c| c.key.as_str()), Some("W"));
        let bombs = catalog.family(Category::Bomb);
        assert_eq!(bombs.first().map(|c| c.key.as_str()), Some("3333"));
        assert_eq!(bombs.last().map(|c| c.key.as_str()), Some("2222"));
    }

    #[test]
    fn sequences_never_hold_twos_or_jokers() {
        let catalog = Catalog::new();
        for n in 5..=12 {
            for combination in catalog.family(Category::SeqSingle(n)) {
                assert!(!combination.key.contains(['2', 'w', 'W']));
            }
        }
        for n in 2..=6 {
            for combination in catalog.family(Category::SeqTrio(n)) {
                assert!(!combination.key.contains(['2', 'w', 'W']));
            }
        }
    }

    #[test]
    fn kickers_avoid_their_base_rank() {
        let catalog = Catalog::new();
        for combination in catalog.family(Category::TrioSingle) {
            let mut counts = std::collections::HashMap::<char, usize>::new();
            for c in combination.key.chars() {
                *counts.entry(c).or_default() += 1;
            }
            assert_eq!(counts.values().filter(|&&n| n == 3).count(), 1);
            assert_eq!(counts.values().filter(|&&n| n == 1).count(), 1);
        }
    }

    #[test]
    fn pair_kickers_exclude_jokers() {
        let catalog = Catalog::new();
        for n in 2..=5 {
            for combination in catalog.family(Category::SeqTrioPair(n)) {
                assert!(!combination.key.contains(['w', 'W']));
            }
        }
        for combination in catalog.family(Category::BombPair) {
            assert!(!combination.key.contains(['w', 'W']));
        }
    }

    #[test]
    fn cache_file_roundtrip() {
        let dir = std::env::temp_dir().join("landlord-catalog-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("rule.json");
        let _ = std::fs::remove_file(&path);
        let generated = Catalog::load(&path).unwrap();
        assert!(path.exists());
        let reloaded = Catalog::load(&path).unwrap();
        assert_eq!(generated.size(), reloaded.size());
        std::fs::remove_file(&path).unwrap();
    }
}
