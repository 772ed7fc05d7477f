use super::CardId;
use super::Catalog;
use super::Category;
use super::ROCKET;
use super::canonical;
use super::covers;
use super::materialize;
use super::ranks;

impl Catalog {
    /// classify a played hand; anything outside the catalog is no play
    pub fn classify(&self, cards: &[CardId]) -> Option<(Category, usize)> {
        self.lookup(&canonical(&ranks(cards)))
            .map(|combination| (combination.category, combination.score))
    }

    /// Decide whether `challenger` beats `base`. Positive sign means it
    /// does; the flag asks the table to double the multiplier. Same-family
    /// plays compare by score and never double, even bomb over bomb.
    pub fn compare(&self, base: &[CardId], challenger: &[CardId]) -> (i64, bool) {
        if base.is_empty() && challenger.is_empty() {
            return (0, false);
        }
        if challenger.is_empty() {
            return (-1, false);
        }
        if base.is_empty() {
            return match self.classify(challenger) {
                Some((category, _)) if category.is_rocket() || category.is_bomb() => (1, true),
                _ => (1, false),
            };
        }
        match (self.classify(base), self.classify(challenger)) {
            (Some((base_kind, below)), Some((kind, above))) if base_kind == kind => {
                (above as i64 - below as i64, false)
            }
            (_, Some((kind, _))) if kind.is_rocket() => (1, true),
            (Some((kind, _)), _) if kind.is_rocket() => (-1, false),
            (_, Some((kind, _))) if kind.is_bomb() => (1, true),
            _ => (0, false),
        }
    }

    /// Smallest play in `hand` that beats `last`: first a same-family play
    /// of strictly greater score, then any bomb when the base is neither
    /// bomb nor rocket, finally the rocket. Empty means must pass.
    pub fn cards_above(&self, hand: &[CardId], last: &[CardId]) -> Vec<CardId> {
        let held = ranks(hand);
        let Some((category, score)) = self.classify(last) else {
            return Vec::new();
        };
        if let Some(key) = self.hunt(category, Some(score), &held) {
            return materialize(hand, &key);
        }
        if !category.is_bomb() && !category.is_rocket() {
            if let Some(key) = self.hunt(Category::Bomb, None, &held) {
                return materialize(hand, &key);
            }
        }
        if covers(&held, ROCKET) {
            return materialize(hand, ROCKET);
        }
        Vec::new()
    }

    /// weakest combination of the family above the given score that the
    /// held ranks can pay for
    fn hunt(&self, category: Category, above: Option<usize>, held: &str) -> Option<String> {
        self.family(category)
            .iter()
            .filter(|c| above.is_none_or(|score| c.score > score))
            .find(|c| covers(held, &c.key))
            .map(|c| c.key.clone())
    }
}
