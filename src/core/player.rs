//! Players, seats and per-seat storage.
//!
//! ## PlayerId
//!
//! A game has exactly two seats, `PlayerId(0)` and `PlayerId(1)`. Turns
//! alternate strictly between them, so [`PlayerId::other`] is the whole
//! turn-order rule.
//!
//! ## PlayerMap
//!
//! Per-seat data backed by a two-element array with O(1) indexing.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::dice::{Die, DiceTally};

/// Number of seats at the table.
pub const SEATS: usize = 2;

/// Seat identifier, 0 or 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PlayerId(u8);

impl PlayerId {
    /// Create a new player ID.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a valid seat.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        assert!((id as usize) < SEATS, "Only seats 0 and 1 exist");
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The other seat.
    #[must_use]
    pub const fn other(self) -> Self {
        Self(1 - self.0)
    }

    /// Both seats, in seat order.
    pub fn both() -> impl Iterator<Item = PlayerId> {
        (0..SEATS as u8).map(PlayerId)
    }
}

impl TryFrom<u8> for PlayerId {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (value as usize) < SEATS {
            Ok(Self(value))
        } else {
            Err(format!("seat {value} does not exist"))
        }
    }
}

impl From<PlayerId> for u8 {
    fn from(player: PlayerId) -> Self {
        player.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-seat data storage.
///
/// ```
/// use liars_dice::core::{PlayerId, PlayerMap};
///
/// let mut dice: PlayerMap<usize> = PlayerMap::new(|_| 5);
/// dice[PlayerId::new(1)] -= 1;
/// assert_eq!(dice[PlayerId::new(0)], 5);
/// assert_eq!(dice[PlayerId::new(1)], 4);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; SEATS],
}

impl<T> PlayerMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(PlayerId) -> T) -> Self {
        Self {
            data: [factory(PlayerId(0)), factory(PlayerId(1))],
        }
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over values in seat order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

/// Dice held by one player. Inline for the usual five.
pub type Hand = SmallVec<[Die; 5]>;

/// A seated player and their dice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub dice: Hand,
    pub is_automated: bool,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, is_automated: bool) -> Self {
        Self {
            id,
            name: name.into(),
            dice: Hand::new(),
            is_automated,
        }
    }

    #[must_use]
    pub fn dice_count(&self) -> usize {
        self.dice.len()
    }

    #[must_use]
    pub fn is_eliminated(&self) -> bool {
        self.dice.is_empty()
    }

    /// Tally of this player's own dice.
    #[must_use]
    pub fn tally(&self) -> DiceTally {
        self.dice.iter().collect()
    }

    /// Die id for the `index`-th die of this seat: the seat digit followed
    /// by the index digits, so seat 0 uses 10..19, 110..199, ... and seat 1
    /// uses 20..29, 210..299, ...
    #[must_use]
    pub(crate) fn die_id(&self, index: usize) -> u32 {
        let index = index as u32;
        let shift = 10u32.pow(index.checked_ilog10().unwrap_or(0) + 1);
        (self.id.index() as u32 + 1) * shift + index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dice::Face;

    #[test]
    fn test_player_id_basics() {
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);

        assert_eq!(p0.index(), 0);
        assert_eq!(p1.index(), 1);
        assert_eq!(p0.other(), p1);
        assert_eq!(p1.other(), p0);
        assert_eq!(format!("{}", p0), "Player 0");
    }

    #[test]
    fn test_both_seats() {
        let seats: Vec<_> = PlayerId::both().collect();
        assert_eq!(seats, vec![PlayerId::new(0), PlayerId::new(1)]);
    }

    #[test]
    #[should_panic(expected = "Only seats 0 and 1 exist")]
    fn test_third_seat_panics() {
        let _ = PlayerId::new(2);
    }

    #[test]
    fn test_player_map_new_and_mutation() {
        let mut map: PlayerMap<i32> = PlayerMap::new(|p| p.index() as i32 * 10);
        assert_eq!(map[PlayerId::new(0)], 0);
        assert_eq!(map[PlayerId::new(1)], 10);

        map[PlayerId::new(0)] = 7;
        assert_eq!(map[PlayerId::new(0)], 7);

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(PlayerId::new(0), &7), (PlayerId::new(1), &10)]);
    }

    #[test]
    fn test_player_map_serialization() {
        let map: PlayerMap<u32> = PlayerMap::new(|p| p.index() as u32 + 1);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: PlayerMap<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }

    #[test]
    fn test_player_tally_and_elimination() {
        let mut player = Player::new(PlayerId::new(1), "Android", true);
        assert!(player.is_eliminated());

        player.dice.push(Die::new(player.die_id(0), Face::ONE));
        player.dice.push(Die::new(player.die_id(1), Face::THREE));

        assert_eq!(player.dice[0].id, 20);
        assert_eq!(player.dice[1].id, 21);
        assert_eq!(player.dice_count(), 2);
        assert_eq!(player.tally().matching(Face::THREE), 2);
    }

    #[test]
    fn test_die_ids_unique_past_ten_dice() {
        let seats = [Player::new(PlayerId::new(0), "You", false), Player::new(PlayerId::new(1), "Android", true)];
        let ids: Vec<u32> = seats.iter().flat_map(|p| (0..120).map(|i| p.die_id(i))).collect();

        let mut unique = ids.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), ids.len());

        assert_eq!(seats[0].die_id(9), 19);
        assert_eq!(seats[0].die_id(10), 110);
        assert_eq!(seats[1].die_id(10), 210);
        assert_eq!(seats[1].die_id(100), 2100);
    }
}
