use super::Category;

/// One entry of the rule catalog: a legal play pattern, its family, and
/// its rank among same-family plays. The key is the canonically sorted
/// rank string; the score is the entry's index within its family list,
/// which ascends with strength because generation emits weakest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    pub category: Category,
    pub score: usize,
    pub key: String,
}
