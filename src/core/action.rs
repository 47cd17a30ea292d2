//! Player actions during the betting phase.
//!
//! Humans and opponents produce the same `Action` values; the scheduler
//! feeds them into the engine mutators either way.

use serde::{Deserialize, Serialize};

use super::bet::{is_higher, Bet};
use super::dice::Face;

/// A betting-phase action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Raise the current bet.
    Bet { quantity: u32, value: Face },
    /// Call the current bet a bluff.
    Challenge,
}

impl Action {
    /// Create a bet action.
    #[must_use]
    pub fn bet(quantity: u32, value: Face) -> Self {
        Self::Bet { quantity, value }
    }

    #[must_use]
    pub fn is_challenge(&self) -> bool {
        matches!(self, Self::Challenge)
    }

    /// Whether the action would be accepted against `current`.
    ///
    /// A bet must have a positive quantity and outrank `current`; a challenge
    /// needs a bet to challenge.
    #[must_use]
    pub fn is_legal(&self, current: Option<&Bet>) -> bool {
        match *self {
            Self::Bet { quantity, value } => quantity >= 1 && is_higher(quantity, value, current),
            Self::Challenge => current.is_some(),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bet { quantity, value } => write!(f, "bet {quantity} x {value}"),
            Self::Challenge => write!(f, "challenge"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::player::PlayerId;

    #[test]
    fn test_legality() {
        let current = Bet::new(PlayerId::new(0), 2, Face::FIVE).unwrap();

        assert!(Action::bet(2, Face::SIX).is_legal(Some(&current)));
        assert!(!Action::bet(2, Face::FOUR).is_legal(Some(&current)));
        assert!(!Action::bet(0, Face::SIX).is_legal(None));
        assert!(Action::Challenge.is_legal(Some(&current)));
        assert!(!Action::Challenge.is_legal(None));
    }

    #[test]
    fn test_action_json_shape() {
        let json = serde_json::to_string(&Action::bet(3, Face::TWO)).unwrap();
        assert_eq!(json, r#"{"action":"bet","quantity":3,"value":2}"#);

        let challenge: Action = serde_json::from_str(r#"{"action":"challenge"}"#).unwrap();
        assert!(challenge.is_challenge());
    }
}
