//! Bets and the strict ordering between them.
//!
//! A bet claims that at least `quantity` dice on the table show `value`,
//! counting wild ones. Ordering compares quantity first, then face value.
//! Face one ranks lowest here even though it is wild when counting: the
//! two rules are independent.

use serde::{Deserialize, Serialize};

use super::dice::{DiceTally, Face};
use super::player::PlayerId;

/// A public claim about the dice on the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bet {
    pub player: PlayerId,
    pub quantity: u32,
    pub value: Face,
}

impl Bet {
    /// Create a bet. Returns `None` for a zero quantity.
    #[must_use]
    pub fn new(player: PlayerId, quantity: u32, value: Face) -> Option<Self> {
        (quantity >= 1).then_some(Self {
            player,
            quantity,
            value,
        })
    }

    /// Whether this bet is strictly higher than `reference`.
    ///
    /// Any bet outranks the absence of a bet.
    #[must_use]
    pub fn outranks(&self, reference: Option<&Bet>) -> bool {
        is_higher(self.quantity, self.value, reference)
    }

    /// Dice in `tally` that satisfy this bet, wild ones included.
    #[must_use]
    pub fn matching(&self, tally: &DiceTally) -> u32 {
        tally.matching(self.value)
    }

    /// Whether the bet holds against the revealed dice.
    #[must_use]
    pub fn holds(&self, tally: &DiceTally) -> bool {
        self.matching(tally) >= self.quantity
    }
}

impl std::fmt::Display for Bet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} x {}", self.quantity, self.value)
    }
}

/// Strict bet ordering on (quantity, value) pairs.
#[must_use]
pub fn is_higher(quantity: u32, value: Face, reference: Option<&Bet>) -> bool {
    match reference {
        None => true,
        Some(current) => {
            quantity > current.quantity || (quantity == current.quantity && value > current.value)
        }
    }
}
