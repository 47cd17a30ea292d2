//! Dice, faces and per-face tallies.
//!
//! A [`Face`] is a validated value in 1..=6. Face one is wild when a
//! challenge is resolved, but keeps its numeric rank when bets are compared
//! (see [`crate::core::bet`]).

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use super::rng::GameRng;

/// Number of faces on a die.
pub const FACE_COUNT: usize = 6;

/// A die face, always in 1..=6.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Face(u8);

impl Face {
    pub const ONE: Face = Face(1);
    pub const TWO: Face = Face(2);
    pub const THREE: Face = Face(3);
    pub const FOUR: Face = Face(4);
    pub const FIVE: Face = Face(5);
    pub const SIX: Face = Face(6);

    /// The wild face.
    pub const WILD: Face = Face::ONE;

    /// Validate a raw face value.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value >= 1 && value <= 6 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Face from a 0-based index. Indices above 5 are clamped to six.
    #[must_use]
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index.min(FACE_COUNT - 1) as u8 + 1)
    }

    /// Raw value in 1..=6.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// 0-based index, for table lookups.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }

    #[must_use]
    pub const fn is_wild(self) -> bool {
        self.0 == 1
    }

    /// The next higher face, skipping the wild face and wrapping six to two.
    ///
    /// Returns the face and whether the wrap happened.
    #[must_use]
    pub fn next_non_wild(self) -> (Face, bool) {
        match self.0 {
            6 => (Face::TWO, true),
            1 => (Face::TWO, false),
            v => (Face(v + 1), false),
        }
    }

    /// All six faces in ascending order.
    pub fn all() -> impl DoubleEndedIterator<Item = Face> {
        (1..=6u8).map(Face)
    }
}

impl TryFrom<u8> for Face {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Face::new(value).ok_or_else(|| format!("face value {value} outside 1..=6"))
    }
}

impl From<Face> for u8 {
    fn from(face: Face) -> Self {
        face.0
    }
}

impl std::fmt::Display for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single die owned by a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Die {
    pub id: u32,
    pub value: Face,
    pub revealed: bool,
}

impl Die {
    /// Create a hidden die showing `value`.
    #[must_use]
    pub const fn new(id: u32, value: Face) -> Self {
        Self {
            id,
            value,
            revealed: false,
        }
    }
}

/// Roll a fresh, hidden die.
pub fn roll_die(id: u32, rng: &mut GameRng) -> Die {
    Die::new(id, rng.roll_face())
}

/// Count of dice per face. Every face is present, unused faces count zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceTally([u32; FACE_COUNT]);

impl DiceTally {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one die showing `face`.
    pub fn add(&mut self, face: Face) {
        self.0[face.index()] += 1;
    }

    #[must_use]
    pub fn count(&self, face: Face) -> u32 {
        self.0[face.index()]
    }

    /// Dice showing `face` plus wild ones. Wild ones are counted once.
    #[must_use]
    pub fn matching(&self, face: Face) -> u32 {
        if face.is_wild() {
            self.count(face)
        } else {
            self.count(face) + self.count(Face::WILD)
        }
    }

    /// Total dice tallied.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    /// Iterate over (face, count) pairs in ascending face order.
    pub fn iter(&self) -> impl Iterator<Item = (Face, u32)> + '_ {
        Face::all().map(move |face| (face, self.count(face)))
    }

    #[must_use]
    pub fn as_array(&self) -> [u32; FACE_COUNT] {
        self.0
    }
}

impl Index<Face> for DiceTally {
    type Output = u32;

    fn index(&self, face: Face) -> &Self::Output {
        &self.0[face.index()]
    }
}

impl IndexMut<Face> for DiceTally {
    fn index_mut(&mut self, face: Face) -> &mut Self::Output {
        &mut self.0[face.index()]
    }
}

impl<'a> FromIterator<&'a Die> for DiceTally {
    fn from_iter<I: IntoIterator<Item = &'a Die>>(iter: I) -> Self {
        let mut tally = DiceTally::new();
        for die in iter {
            tally.add(die.value);
        }
        tally
    }
}

/// Tally dice by face value.
pub fn tally<'a>(dice: impl IntoIterator<Item = &'a Die>) -> DiceTally {
    dice.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dice(values: &[u8]) -> Vec<Die> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Die::new(i as u32, Face::new(v).unwrap()))
            .collect()
    }

    #[test]
    fn test_face_validation() {
        assert!(Face::new(0).is_none());
        assert!(Face::new(7).is_none());
        assert_eq!(Face::new(4), Some(Face::FOUR));
        assert!(Face::ONE.is_wild());
        assert!(!Face::SIX.is_wild());
    }

    #[test]
    fn test_next_non_wild() {
        assert_eq!(Face::ONE.next_non_wild(), (Face::TWO, false));
        assert_eq!(Face::THREE.next_non_wild(), (Face::FOUR, false));
        assert_eq!(Face::SIX.next_non_wild(), (Face::TWO, true));
    }

    #[test]
    fn test_face_serde_rejects_out_of_range() {
        assert_eq!(serde_json::to_string(&Face::FIVE).unwrap(), "5");
        assert!(serde_json::from_str::<Face>("0").is_err());
        assert!(serde_json::from_str::<Face>("7").is_err());
        assert_eq!(serde_json::from_str::<Face>("2").unwrap(), Face::TWO);
    }

    #[test]
    fn test_rolled_die_is_hidden() {
        let mut rng = GameRng::new(1);
        let die = roll_die(10, &mut rng);
        assert_eq!(die.id, 10);
        assert!(!die.revealed);
    }

    #[test]
    fn test_tally_empty_has_all_faces() {
        let t = tally(&Vec::<Die>::new());
        assert_eq!(t.total(), 0);
        assert_eq!(t.iter().count(), 6);
        assert!(t.iter().all(|(_, c)| c == 0));
    }

    #[test]
    fn test_tally_counts() {
        let t = tally(&dice(&[4, 4, 1, 2, 6]));
        assert_eq!(t[Face::FOUR], 2);
        assert_eq!(t[Face::ONE], 1);
        assert_eq!(t[Face::THREE], 0);
        assert_eq!(t.total(), 5);
        assert_eq!(t.as_array(), [1, 1, 0, 2, 0, 1]);
    }

    #[test]
    fn test_matching_counts_wilds_once() {
        let t = tally(&dice(&[4, 4, 1, 2]));
        assert_eq!(t.matching(Face::FOUR), 3);
        assert_eq!(t.matching(Face::THREE), 1);
        assert_eq!(t.matching(Face::ONE), 1);
    }
}
