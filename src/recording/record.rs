//! Records written to persistence sinks.
//!
//! Every record carries the session id and round it belongs to, so one
//! stream can hold many games and still be grouped for analysis.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{Face, GameEvent, GameState, Phase, PlayerId};

/// A seat as recorded at session start.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatRecord {
    pub player: PlayerId,
    pub name: String,
    pub is_automated: bool,
    pub dice: usize,
}

/// Record payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordBody {
    SessionStarted { seats: Vec<SeatRecord> },
    DiceRolled { player: PlayerId, values: Vec<Face> },
    Event { event: GameEvent },
    GameEnded { winner: PlayerId, loser: PlayerId },
}

/// One line of the persistence stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub session_id: Option<Uuid>,
    pub round: u32,
    #[serde(flatten)]
    pub body: RecordBody,
}

impl Record {
    fn new(state: &GameState, body: RecordBody) -> Self {
        Self {
            session_id: state.session_id(),
            round: state.round(),
            body,
        }
    }

    /// Records describing the step from `before` to `after`.
    ///
    /// `dealt` marks a freshly started game, which has no predecessor in
    /// the same session.
    #[must_use]
    pub fn for_transition(before: &GameState, after: &GameState, dealt: bool) -> Vec<Record> {
        let mut out = Vec::new();

        if dealt {
            let seats = after
                .players()
                .iter()
                .map(|(id, p)| SeatRecord {
                    player: id,
                    name: p.name.clone(),
                    is_automated: p.is_automated,
                    dice: p.dice_count(),
                })
                .collect();
            out.push(Record::new(after, RecordBody::SessionStarted { seats }));
            out.extend(Self::dice_rolled(after));
            return out;
        }

        out.extend(
            after
                .history()
                .iter()
                .skip(before.history().len())
                .map(|&event| Record::new(after, RecordBody::Event { event })),
        );

        if after.phase() == Phase::Betting && after.round() > before.round() {
            out.extend(Self::dice_rolled(after));
        }

        if after.phase() == Phase::Ended && before.phase() != Phase::Ended {
            if let (Some(winner), Some(loser)) = (after.winner(), after.loser()) {
                out.push(Record::new(after, RecordBody::GameEnded { winner, loser }));
            }
        }
        out
    }

    fn dice_rolled(state: &GameState) -> impl Iterator<Item = Record> + '_ {
        state.players().iter().map(move |(id, p)| {
            Record::new(
                state,
                RecordBody::DiceRolled {
                    player: id,
                    values: p.dice.iter().map(|d| d.value).collect(),
                },
            )
        })
    }
}
