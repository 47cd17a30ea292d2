//! Opponent backed by an external decision provider.
//!
//! The viewer's observation is summarised into a [`DecisionRequest`],
//! rendered into a prompt and sent to a [`DecisionProvider`]. The reply is
//! free text; the JSON object inside it is validated before it becomes an
//! [`Action`]. Any failure (provider error, timeout, malformed reply) falls
//! back to a challenge.

use std::time::Duration;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::{Action, Bet, Difficulty, Face, Phase, PlayerId, PlayerView};

use super::Opponent;

/// System message sent ahead of every prompt.
pub const SYSTEM_PROMPT: &str = "You are a Liar's Dice bot. Only respond with the correct JSON \
response according to user instructions. Never explain or add extra text.";

/// Default time allowed for one decision.
pub const DEFAULT_DECISION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum DecisionError {
    #[error("decision provider failed: {0}")]
    Provider(String),
    #[error("no decision within {0:?}")]
    Timeout(Duration),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown action {0:?}")]
    UnknownAction(String),
    #[error("malformed bet: {0}")]
    MalformedBet(&'static str),
    #[cfg(feature = "remote")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Source of free-text decisions, typically a language model endpoint.
pub trait DecisionProvider: Send + Sync {
    fn complete<'a>(&'a self, system: &'a str, prompt: &'a str)
        -> BoxFuture<'a, Result<String, DecisionError>>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationConfig {
    pub timeout: Duration,
}

impl Default for DelegationConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_DECISION_TIMEOUT,
        }
    }
}

impl DelegationConfig {
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// === Request ===

/// One seat as described to the provider. Only the viewer's dice values
/// are filled in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatSummary {
    pub id: PlayerId,
    pub name: String,
    pub dice_count: usize,
    pub is_self: bool,
    pub is_current_player: bool,
    pub dice: Vec<Face>,
}

/// Compact game summary sent to the provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    pub current_player_id: PlayerId,
    pub previous_player_id: Option<PlayerId>,
    pub current_bet: Option<Bet>,
    pub previous_bet: Option<Bet>,
    pub phase: Phase,
    pub players: Vec<SeatSummary>,
    pub total_dice_in_game: u32,
    pub round: u32,
    pub difficulty: Difficulty,
}

impl DecisionRequest {
    #[must_use]
    pub fn from_view(view: &PlayerView, difficulty: Difficulty) -> Self {
        let players = PlayerId::both()
            .map(|id| SeatSummary {
                id,
                name: view.names[id].clone(),
                dice_count: view.dice_counts[id],
                is_self: id == view.me,
                is_current_player: id == view.active_player,
                dice: if id == view.me {
                    view.own_dice.clone()
                } else {
                    Vec::new()
                },
            })
            .collect();
        Self {
            current_player_id: view.active_player,
            previous_player_id: view.previous_player,
            current_bet: view.current_bet,
            previous_bet: view.previous_bet,
            phase: view.phase,
            players,
            total_dice_in_game: view.total_dice,
            round: view.round,
            difficulty,
        }
    }

    /// User prompt: rules summary, reply format and the summary as JSON.
    pub fn prompt(&self) -> Result<String, DecisionError> {
        let name = self
            .players
            .iter()
            .find(|seat| seat.is_self)
            .map_or("opponent", |seat| seat.name.as_str());
        let state = serde_json::to_string_pretty(self)?;
        Ok(format!(
            "You are playing Liar's Dice as player \"{name}\". Decide your next move based on the game state below.\n\
             \n\
             Rules summary:\n\
             - You can either \"bet\" (make a higher bet) or \"challenge\" (call bluff).\n\
             - A bet must have higher quantity or same quantity but higher value than the last bet.\n\
             - 1's are wild and count as any value.\n\
             - Respond ONLY with a valid JSON object in the form:\n  \
             {{\"action\": \"bet\", \"bet\": {{\"quantity\": X, \"value\": Y}}}}\n  \
             or\n  \
             {{\"action\": \"challenge\"}}\n\
             \n\
             Game state:\n\
             {state}\n\
             Your decision:\n"
        ))
    }
}

// === Reply ===

#[derive(Deserialize)]
struct RawDecision {
    action: String,
    #[serde(default)]
    bet: Option<RawBet>,
}

#[derive(Deserialize)]
struct RawBet {
    quantity: Value,
    value: Value,
}

/// Extract and validate the action in a provider reply.
///
/// The text between the first `{` and the last `}` must be a JSON object
/// with `action` set to `"bet"` (with a positive integer quantity and a
/// face in 1..=6) or `"challenge"`. A well-formed bet that does not outrank
/// `current` becomes a challenge.
pub fn parse_decision(text: &str, current: Option<&Bet>) -> Result<Action, DecisionError> {
    let json = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    };
    let raw: RawDecision = serde_json::from_str(json)?;

    match raw.action.as_str() {
        "challenge" => Ok(Action::Challenge),
        "bet" => {
            let bet = raw.bet.ok_or(DecisionError::MalformedBet("missing bet"))?;
            let quantity = bet
                .quantity
                .as_u64()
                .and_then(|q| u32::try_from(q).ok())
                .filter(|&q| q > 0)
                .ok_or(DecisionError::MalformedBet("quantity must be a positive integer"))?;
            let value = bet
                .value
                .as_u64()
                .and_then(|v| u8::try_from(v).ok())
                .and_then(Face::new)
                .ok_or(DecisionError::MalformedBet("value must be a face from 1 to 6"))?;

            let action = Action::bet(quantity, value);
            if action.is_legal(current) {
                Ok(action)
            } else {
                debug!(%action, "delegated bet does not outrank the current bet");
                Ok(Action::Challenge)
            }
        }
        other => Err(DecisionError::UnknownAction(other.to_string())),
    }
}

// === Opponent ===

/// Opponent that asks a [`DecisionProvider`] for every move.
pub struct DelegatedOpponent<P> {
    provider: P,
    config: DelegationConfig,
}

impl<P: DecisionProvider> DelegatedOpponent<P> {
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            config: DelegationConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: DelegationConfig) -> Self {
        self.config = config;
        self
    }

    /// Ask the provider, without the challenge fallback.
    ///
    /// Requires a Tokio runtime with the time driver enabled.
    pub async fn request_action(
        &self,
        view: &PlayerView,
        difficulty: Difficulty,
    ) -> Result<Action, DecisionError> {
        let prompt = DecisionRequest::from_view(view, difficulty).prompt()?;
        let reply = tokio::time::timeout(
            self.config.timeout,
            self.provider.complete(SYSTEM_PROMPT, &prompt),
        )
        .await
        .map_err(|_| DecisionError::Timeout(self.config.timeout))??;
        parse_decision(&reply, view.current_bet.as_ref())
    }
}

impl<P: DecisionProvider> Opponent for DelegatedOpponent<P> {
    fn decide(&mut self, view: PlayerView, difficulty: Difficulty) -> BoxFuture<'_, Action> {
        Box::pin(async move {
            match self.request_action(&view, difficulty).await {
                Ok(action) => action,
                Err(e) => {
                    warn!(error = %e, player = %view.me, "delegated decision failed, challenging");
                    Action::Challenge
                }
            }
        })
    }
}
