//! Pure state transitions.
//!
//! Each transition takes the current snapshot and returns either a new
//! snapshot or the reason it was ignored. The input is never modified, so
//! a rejected call leaves the game exactly as it was.

use thiserror::Error;
use uuid::Uuid;

use crate::core::{
    roll_die, Bet, ChallengeResult, Die, Face, GameConfig, GameEvent, GameRng, GameState, Hand,
    Phase, PlayerId, PlayerMap,
};

/// Why a mutator call was ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("{action} is not allowed in the {phase:?} phase")]
    WrongPhase { action: &'static str, phase: Phase },
    #[error("{quantity} x {value} is not a bet")]
    InvalidBet { quantity: u32, value: u8 },
    #[error("{quantity} x {value} does not outrank the current bet")]
    NotHigher { quantity: u32, value: Face },
    #[error("there is no bet to challenge")]
    NoBet,
}

fn require_phase(state: &GameState, phase: Phase, action: &'static str) -> Result<(), Rejection> {
    if state.phase == phase {
        Ok(())
    } else {
        Err(Rejection::WrongPhase {
            action,
            phase: state.phase,
        })
    }
}

/// Roll `count` fresh hidden dice for `player`.
fn roll_hand(state: &GameState, player: PlayerId, count: usize, rng: &mut GameRng) -> Hand {
    let owner = state.player(player);
    (0..count).map(|i| roll_die(owner.die_id(i), rng)).collect()
}

/// Start a new game: fresh dice for both seats, a random first player and
/// a new session id. Betting begins in round 1.
pub fn start(config: &GameConfig, rng: &mut GameRng) -> GameState {
    let mut state = GameState::new(config);
    for player in PlayerId::both() {
        state.players[player].dice = roll_hand(&state, player, config.starting_dice, rng);
    }

    let first = if rng.gen_bool(0.5) {
        PlayerId::new(0)
    } else {
        PlayerId::new(1)
    };
    let session_id = uuid::Builder::from_random_bytes(rng.gen_bytes16()).into_uuid();

    begin_first_round(state, first, Some(session_id))
}

/// Start a game from known dice, e.g. when replaying a recorded session.
///
/// # Panics
///
/// Panics if either hand is empty.
pub fn start_from_rolls(
    config: &GameConfig,
    rolls: &PlayerMap<Vec<Face>>,
    first: PlayerId,
    session_id: Option<Uuid>,
) -> GameState {
    let mut state = GameState::new(config);
    for (player, faces) in rolls.iter() {
        assert!(!faces.is_empty(), "Every player needs at least 1 die");
        let owner = state.player(player);
        let hand: Hand = faces
            .iter()
            .enumerate()
            .map(|(i, &face)| Die::new(owner.die_id(i), face))
            .collect();
        state.players[player].dice = hand;
    }
    begin_first_round(state, first, session_id)
}

fn begin_first_round(mut state: GameState, first: PlayerId, session_id: Option<Uuid>) -> GameState {
    state.session_id = session_id;
    state.phase = Phase::Betting;
    state.round = 1;
    state.active_player = first;
    state.recount();
    state
}

/// Raise the current bet on behalf of the active player.
pub fn place_bet(
    state: &GameState,
    quantity: u32,
    value: u8,
    timestamp_ms: u64,
) -> Result<GameState, Rejection> {
    require_phase(state, Phase::Betting, "bet")?;

    let bettor = state.active_player;
    let bet = Face::new(value)
        .and_then(|face| Bet::new(bettor, quantity, face))
        .ok_or(Rejection::InvalidBet { quantity, value })?;
    if !bet.outranks(state.current_bet.as_ref()) {
        return Err(Rejection::NotHigher {
            quantity,
            value: bet.value,
        });
    }

    let mut next = state.clone();
    next.previous_bet = next.current_bet.replace(bet);
    next.previous_player = Some(bettor);
    next.active_player = bettor.other();
    next.history.push_back(GameEvent::bet(bet, timestamp_ms));
    Ok(next)
}

/// Challenge the current bet and reveal every die.
///
/// The challenge succeeds when fewer dice than claimed show the bet's face
/// or a wild one. The challenger wins the round on success, the bettor
/// otherwise.
pub fn challenge(state: &GameState, timestamp_ms: u64) -> Result<GameState, Rejection> {
    require_phase(state, Phase::Betting, "challenge")?;
    let bet = state.current_bet.ok_or(Rejection::NoBet)?;

    let challenger = state.active_player;
    let bettor = bet.player;
    let dice_count = bet.matching(&state.dice_tally);
    let successful = dice_count < bet.quantity;
    let result = ChallengeResult {
        successful,
        dice_count,
    };
    let winner = if successful { challenger } else { bettor };

    let mut next = state.clone();
    next.phase = Phase::Revealing;
    next.round_winner = Some(winner);
    next.round_loser = Some(winner.other());
    next.challenge_result = Some(result);
    for (_, player) in next.players.iter_mut() {
        for die in player.dice.iter_mut() {
            die.revealed = true;
        }
    }
    next.history.push_back(GameEvent::challenge(challenger, bettor, timestamp_ms));
    next.history.push_back(GameEvent::result(challenger, result, timestamp_ms));
    Ok(next)
}

/// Take one die from the round loser, then either end the game or re-roll
/// everyone's dice and let the loser open the next round.
///
/// The loser's last die is the one removed.
pub fn next_round(state: &GameState, rng: &mut GameRng) -> Result<GameState, Rejection> {
    require_phase(state, Phase::Revealing, "next round")?;
    let loser = state.round_loser.ok_or(Rejection::WrongPhase {
        action: "next round",
        phase: state.phase,
    })?;

    let mut next = state.clone();
    next.players[loser].dice.pop();

    if next.players[loser].is_eliminated() {
        next.phase = Phase::Ended;
        next.loser = Some(loser);
        next.winner = Some(loser.other());
        next.recount();
        return Ok(next);
    }

    for player in PlayerId::both() {
        let count = next.players[player].dice_count();
        next.players[player].dice = roll_hand(&next, player, count, rng);
    }
    next.round += 1;
    next.active_player = loser;
    next.previous_player = None;
    next.current_bet = None;
    next.previous_bet = None;
    next.round_winner = None;
    next.round_loser = None;
    next.challenge_result = None;
    next.phase = Phase::Betting;
    next.recount();
    Ok(next)
}
