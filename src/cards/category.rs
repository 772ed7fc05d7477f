use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

/// Every family of legal plays. Sequence families carry their length so
/// that e.g. a run of five singles and a run of six singles never compare
/// against each other. The string form is the on-disk name used by the
/// catalog cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Single,
    Pair,
    Trio,
    Bomb,
    Rocket,
    SeqSingle(usize),
    SeqPair(usize),
    SeqTrio(usize),
    TrioSingle,
    TrioPair,
    SeqTrioSingle(usize),
    SeqTrioPair(usize),
    BombSingle,
    BombPair,
}

impl Category {
    pub fn is_bomb(self) -> bool {
        self == Category::Bomb
    }
    pub fn is_rocket(self) -> bool {
        self == Category::Rocket
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Category::Single => write!(f, "single"),
            Category::Pair => write!(f, "pair"),
            Category::Trio => write!(f, "trio"),
            Category::Bomb => write!(f, "bomb"),
            Category::Rocket => write!(f, "rocket"),
            Category::SeqSingle(n) => write!(f, "seq_single{}", n),
            Category::SeqPair(n) => write!(f, "seq_pair{}", n),
            Category::SeqTrio(n) => write!(f, "seq_trio{}", n),
            Category::TrioSingle => write!(f, "trio_single"),
            Category::TrioPair => write!(f, "trio_pair"),
            Category::SeqTrioSingle(n) => write!(f, "seq_trio_single{}", n),
            Category::SeqTrioPair(n) => write!(f, "seq_trio_pair{}", n),
            Category::BombSingle => write!(f, "bomb_single"),
            Category::BombPair => write!(f, "bomb_pair"),
        }
    }
}

impl FromStr for Category {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let suffixed = |prefix: &str| {
            s.strip_prefix(prefix)
                .and_then(|digits| digits.parse::<usize>().ok())
        };
        match s {
            "single" => Ok(Category::Single),
            "pair" => Ok(Category::Pair),
            "trio" => Ok(Category::Trio),
            "bomb" => Ok(Category::Bomb),
            "rocket" => Ok(Category::Rocket),
            "trio_single" => Ok(Category::TrioSingle),
            "trio_pair" => Ok(Category::TrioPair),
            "bomb_single" => Ok(Category::BombSingle),
            "bomb_pair" => Ok(Category::BombPair),
            _ => None
                .or_else(|| suffixed("seq_trio_single").map(Category::SeqTrioSingle))
                .or_else(|| suffixed("seq_trio_pair").map(Category::SeqTrioPair))
                .or_else(|| suffixed("seq_single").map(Category::SeqSingle))
                .or_else(|| suffixed("seq_pair").map(Category::SeqPair))
                .or_else(|| suffixed("seq_trio").map(Category::SeqTrio))
                .ok_or_else(|| format!("unknown combination family: {}", s)),
        }
    }
}
