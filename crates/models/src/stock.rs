use serde::{Deserialize, Serialize};

use crate::product::ProductId;

/// Authoritative stock level for a product at query time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: u32,
}

impl Stock {
    /// Whether `requested` units can be held in a cart.
    pub fn covers(&self, requested: u64) -> bool {
        requested <= u64::from(self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_is_inclusive() {
        let s = Stock { id: 1, amount: 5 };
        assert!(s.covers(0));
        assert!(s.covers(5));
        assert!(!s.covers(6));
    }
}
