/// A card is an integer in 0..54. Ids 0..52 encode rank x suit with
/// rank = id mod 13 over the deal alphabet below; 52 and 53 are the
/// jokers. Suit never matters to the rules, only the rank character.
pub type CardId = u8;

pub const BIG_JOKER: CardId = 52;
pub const SMALL_JOKER: CardId = 53;
/// produced for unknown rank characters, matches no dealt card
pub const SENTINEL: CardId = 54;

/// rank alphabet in deal order, indexed by id mod 13
const DEAL_RANKS: &[u8; 13] = b"A234567890JQK";

/// both jokers, the one combination that beats everything
pub const ROCKET: &str = "Ww";

/// rank character of a single card id
pub fn rank(id: CardId) -> u8 {
    match id {
        BIG_JOKER => b'W',
        SMALL_JOKER => b'w',
        id => DEAL_RANKS[(id % 13) as usize],
    }
}

/// rank string of a hand, in the order the ids are given
pub fn ranks(ids: &[CardId]) -> String {
    ids.iter().map(|&id| rank(id) as char).collect()
}

/// every card id carrying the given rank character
pub fn candidates(rank: u8) -> Vec<CardId> {
    match rank {
        b'W' => vec![BIG_JOKER],
        b'w' => vec![SMALL_JOKER],
        rank => match DEAL_RANKS.iter().position(|&c| c == rank) {
            Some(i) => vec![i as u8, i as u8 + 13, i as u8 + 26, i as u8 + 39],
            None => vec![SENTINEL],
        },
    }
}

/// canonical key: rank characters sorted ascending by code point.
/// catalog keys and classification keys share this collation, which is
/// all the lookup requires.
pub fn canonical(ranks: &str) -> String {
    let mut bytes = ranks.bytes().collect::<Vec<u8>>();
    bytes.sort_unstable();
    bytes.into_iter().map(|b| b as char).collect()
}

/// multiset containment of rank characters
pub fn covers(parent: &str, child: &str) -> bool {
    let mut counts = [0i32; 128];
    for b in parent.bytes() {
        counts[b as usize] += 1;
    }
    for b in child.bytes() {
        counts[b as usize] -= 1;
        if counts[b as usize] < 0 {
            return false;
        }
    }
    true
}

/// translate a catalog key back into concrete card ids the hand owns,
/// picking a distinct id for every rank character
pub fn materialize(hand: &[CardId], key: &str) -> Vec<CardId> {
    let mut picked = Vec::with_capacity(key.len());
    for rank in key.bytes() {
        for id in candidates(rank) {
            if hand.contains(&id) && !picked.contains(&id) {
                picked.push(id);
                break;
            }
        }
    }
    picked
}
