//! Opponent behaviour: heuristic legality, delegation parsing and fallback,
//! and the turn driver feeding actions back into a game.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use proptest::prelude::*;

use liars_dice::core::{Action, Difficulty, Face, GameConfig, Phase, PlayerId, PlayerMap, SeatConfig};
use liars_dice::opponent::{
    DecisionError, DecisionProvider, DelegatedOpponent, DelegationConfig, HeuristicOpponent,
    Opponent, TurnDriver,
};
use liars_dice::rules::Game;

fn faces(values: &[u8]) -> Vec<Face> {
    values.iter().map(|&v| Face::new(v).unwrap()).collect()
}

/// Human at seat 0, automated seat 1 to act on a 2 x 3 bet.
fn facing_bet(own: &[u8], quantity: u32, value: u8) -> Game {
    let mut game = Game::new(GameConfig::default().with_seed(8));
    let rolls = PlayerMap::new(|p| if p.index() == 0 { faces(&[2, 4, 6]) } else { faces(own) });
    game.start_game_with_rolls(&rolls, PlayerId::new(0), None);
    game.place_bet(quantity, value);
    game
}

/// Replies with a canned string and counts calls.
struct Scripted {
    reply: Result<String, String>,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl Scripted {
    fn ok(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn failing() -> Self {
        Self {
            reply: Err("service unavailable".to_string()),
            ..Self::ok("")
        }
    }

    fn slow(reply: &str, delay: Duration) -> Self {
        Self {
            delay,
            ..Self::ok(reply)
        }
    }
}

impl DecisionProvider for Scripted {
    fn complete<'a>(
        &'a self,
        _system: &'a str,
        prompt: &'a str,
    ) -> BoxFuture<'a, Result<String, DecisionError>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(prompt.contains("Game state:"));
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.reply.clone().map_err(DecisionError::Provider)
        })
    }
}

// === Heuristic ===

#[test]
fn test_heuristic_raises_on_wild_backed_bet() {
    let game = facing_bet(&[1, 1, 3], 2, 3);
    let view = game.view_for(PlayerId::new(1));
    let mut challenges = 0;
    for seed in 0..100 {
        let mut opponent = HeuristicOpponent::seeded(seed);
        let action = opponent.choose_action(&view, Difficulty::Medium);
        if action.is_challenge() {
            challenges += 1;
        } else {
            assert!(action.is_legal(game.state().current_bet()));
        }
    }
    assert_eq!(challenges, 0);
}

#[test]
fn test_heuristic_challenges_unlikely_bet() {
    let game = facing_bet(&[2, 3, 4], 5, 6);
    let view = game.view_for(PlayerId::new(1));
    let mut opponent = HeuristicOpponent::seeded(3);
    assert_eq!(opponent.choose_action(&view, Difficulty::Hard), Action::Challenge);
}

#[test]
fn test_heuristic_ignores_hidden_dice() {
    // Same own dice and bets, different hidden hands: identical decisions
    let decide = |hidden: &[u8]| {
        let mut game = Game::new(GameConfig::default().with_seed(8));
        let rolls = PlayerMap::new(|p| if p.index() == 0 { faces(hidden) } else { faces(&[3, 3, 5]) });
        game.start_game_with_rolls(&rolls, PlayerId::new(0), None);
        game.place_bet(2, 4);
        let view = game.view_for(PlayerId::new(1));
        HeuristicOpponent::seeded(17).choose_action(&view, Difficulty::Medium)
    };
    assert_eq!(decide(&[1, 1, 1]), decide(&[6, 6, 6]));
}

proptest! {
    #[test]
    fn heuristic_actions_always_legal(
        seed in any::<u64>(),
        difficulty in prop_oneof![Just(Difficulty::Easy), Just(Difficulty::Medium), Just(Difficulty::Hard)],
        turns in 1..60usize,
    ) {
        let config = GameConfig::default()
            .with_seed(seed)
            .with_difficulty(difficulty)
            .with_seat(PlayerId::new(0), SeatConfig::automated("North"));
        let mut game = Game::new(config);
        game.start_game();
        let mut opponent = HeuristicOpponent::seeded(seed.wrapping_add(1));

        for _ in 0..turns {
            match game.state().phase() {
                Phase::Betting => {
                    let view = game.view_for(game.state().active_player_id());
                    let action = opponent.choose_action(&view, difficulty);
                    prop_assert!(action.is_legal(view.current_bet.as_ref()), "{action} against {:?}", view.current_bet);
                    prop_assert!(game.apply(action).is_applied());
                }
                Phase::Revealing => {
                    game.next_round();
                }
                _ => break,
            }
        }
    }
}

// === Delegation ===

#[tokio::test]
async fn test_delegated_bet_applied() {
    let reply = r#"Here you go: {"action": "bet", "bet": {"quantity": 3, "value": 5}}"#;
    let provider = Scripted::ok(reply);
    let calls = provider.calls.clone();
    let mut opponent = DelegatedOpponent::new(provider);

    let game = facing_bet(&[5, 5, 1], 2, 3);
    let action = opponent.decide(game.view_for(PlayerId::new(1)), Difficulty::Hard).await;
    assert_eq!(action, Action::bet(3, Face::FIVE));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_delegated_malformed_falls_back_to_challenge() {
    for reply in [
        "I think I'll bet three fives",
        r#"{"action": "raise"}"#,
        r#"{"action": "bet", "bet": {"quantity": -1, "value": 5}}"#,
        r#"{"action": "bet", "bet": {"quantity": 3, "value": 9}}"#,
    ] {
        let mut opponent = DelegatedOpponent::new(Scripted::ok(reply));
        let game = facing_bet(&[5, 5, 1], 2, 3);
        let action = opponent.decide(game.view_for(PlayerId::new(1)), Difficulty::Medium).await;
        assert_eq!(action, Action::Challenge, "reply {reply}");
    }
}

#[tokio::test]
async fn test_delegated_provider_error_falls_back() {
    let mut opponent = DelegatedOpponent::new(Scripted::failing());
    let game = facing_bet(&[2, 2, 2], 2, 3);
    let view = game.view_for(PlayerId::new(1));

    assert!(matches!(
        opponent.request_action(&view, Difficulty::Medium).await,
        Err(DecisionError::Provider(_))
    ));
    assert_eq!(opponent.decide(view, Difficulty::Medium).await, Action::Challenge);
}

#[tokio::test(start_paused = true)]
async fn test_delegated_timeout_falls_back() {
    let provider = Scripted::slow(r#"{"action": "bet", "bet": {"quantity": 9, "value": 6}}"#, Duration::from_secs(60));
    let mut opponent = DelegatedOpponent::new(provider)
        .with_config(DelegationConfig::default().with_timeout(Duration::from_secs(1)));
    let game = facing_bet(&[2, 2, 2], 2, 3);
    let view = game.view_for(PlayerId::new(1));

    assert!(matches!(
        opponent.request_action(&view, Difficulty::Easy).await,
        Err(DecisionError::Timeout(_))
    ));
    assert_eq!(opponent.decide(view, Difficulty::Easy).await, Action::Challenge);
}

// === Turn driver ===

#[tokio::test]
async fn test_driver_plays_automated_seat_only() {
    let mut game = Game::new(GameConfig::default().with_seed(3));
    let rolls = PlayerMap::new(|_| faces(&[2, 3, 4]));
    game.start_game_with_rolls(&rolls, PlayerId::new(1), None);

    let mut driver = TurnDriver::new(HeuristicOpponent::seeded(1));
    let turn = driver.play_automated_turn(&mut game).await.unwrap();
    assert!(turn.transition.is_applied());
    assert!(!turn.action.is_challenge());
    assert_eq!(game.state().active_player_id(), PlayerId::new(0));

    // Human to act now
    assert!(driver.play_automated_turn(&mut game).await.is_none());
}

#[tokio::test]
async fn test_driver_with_delegated_opponent() {
    let mut game = facing_bet(&[4, 4, 4], 2, 3);
    let mut driver = TurnDriver::new(DelegatedOpponent::new(Scripted::ok(r#"{"action":"challenge"}"#)));

    let turn = driver.play_automated_turn(&mut game).await.unwrap();
    assert_eq!(turn.action, Action::Challenge);
    assert_eq!(game.state().phase(), Phase::Revealing);
}

#[tokio::test]
async fn test_boxed_opponents_share_driver() {
    let opponents: Vec<Box<dyn Opponent>> = vec![
        Box::new(HeuristicOpponent::seeded(2)),
        Box::new(DelegatedOpponent::new(Scripted::ok(r#"{"action":"challenge"}"#))),
    ];
    for opponent in opponents {
        let mut game = facing_bet(&[3, 3, 3], 1, 2);
        let mut driver = TurnDriver::new(opponent);
        let turn = driver.play_automated_turn(&mut game).await.unwrap();
        assert!(turn.transition.is_applied());
    }
}
