//! Game Session
//!
//! One game between the user and the computer:
//!
//! 1. A fair round over `{0, 1}` decides who picks a die first (0 = user).
//! 2. The first mover picks any die, the other side picks from the rest.
//! 3. Each side's roll is a fair round over that die's face indices.
//! 4. The higher face wins; equal faces tie.
//!
//! The computer always commits, the user always contributes.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::dice::{require_playable, FaceSet};
use super::probability::best_counter;
use crate::config::FairDiceConfig;
use crate::core::rng::choose_index;
use crate::error::{FairPlayError, Result};
use crate::protocol::counterpart::{Counterpart, CounterpartError};
use crate::protocol::round::{Round, RoundPhase};
use crate::protocol::selector::FairSelector;
use crate::protocol::transcript::RoundTranscript;

/// A player in the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The human.
    User,
    /// The program.
    Computer,
}

impl Side {
    /// The other side.
    pub fn other(self) -> Self {
        match self {
            Self::User => Self::Computer,
            Self::Computer => Self::User,
        }
    }

    /// Map a first-move outcome to the side that moves first.
    pub fn first_mover(outcome: u64) -> Self {
        if outcome == 0 {
            Self::User
        } else {
            Self::Computer
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Computer => f.write_str("computer"),
        }
    }
}

/// Progress notifications for the participant.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// The first-move round finished.
    FirstMoveDecided {
        /// Who picks a die first.
        first: Side,
        /// Audit record of the round.
        transcript: RoundTranscript,
    },
    /// A side picked its die.
    DieChosen {
        /// Who picked.
        side: Side,
        /// Index into the configured dice.
        index: usize,
        /// The die.
        die: FaceSet,
    },
    /// A roll round finished.
    Rolled {
        /// Whose roll.
        side: Side,
        /// Face rolled.
        face: u32,
        /// Audit record of the round.
        transcript: RoundTranscript,
    },
}

/// The human side of a game.
pub trait Participant: Counterpart {
    /// Pick one of `available` (indices into `dice`).
    fn choose_die(
        &mut self,
        dice: &[FaceSet],
        available: &[usize],
    ) -> impl Future<Output = Result<usize, CounterpartError>>;

    /// Called as the game progresses.
    fn observe(&mut self, _event: &SessionEvent) {}
}

impl<P: Participant + ?Sized> Participant for &mut P {
    fn choose_die(
        &mut self,
        dice: &[FaceSet],
        available: &[usize],
    ) -> impl Future<Output = Result<usize, CounterpartError>> {
        (**self).choose_die(dice, available)
    }

    fn observe(&mut self, event: &SessionEvent) {
        (**self).observe(event)
    }
}

/// Result of one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameReport {
    /// Side that picked a die first.
    pub first_mover: Side,
    /// Index of the user's die.
    pub user_die_index: usize,
    /// User's die.
    pub user_die: FaceSet,
    /// Index of the computer's die.
    pub computer_die_index: usize,
    /// Computer's die.
    pub computer_die: FaceSet,
    /// Face the user rolled.
    pub user_roll: u32,
    /// Face the computer rolled.
    pub computer_roll: u32,
    /// Winner, `None` on a tie.
    pub winner: Option<Side>,
    /// Every round played, in order.
    pub rounds: Vec<RoundTranscript>,
}

/// Decide the winner from two rolls.
pub fn decide_winner(user_roll: u32, computer_roll: u32) -> Option<Side> {
    match user_roll.cmp(&computer_roll) {
        std::cmp::Ordering::Greater => Some(Side::User),
        std::cmp::Ordering::Less => Some(Side::Computer),
        std::cmp::Ordering::Equal => None,
    }
}

/// Orchestrates a game over a fixed set of dice.
pub struct GameSession<R> {
    dice: Vec<FaceSet>,
    selector: FairSelector<R>,
    first_move_range: u64,
}

impl<R: RngCore + CryptoRng> GameSession<R> {
    /// Create a session. Fails if there are fewer than `config.min_dice` dice.
    pub fn new(dice: Vec<FaceSet>, selector: FairSelector<R>, config: &FairDiceConfig) -> Result<Self> {
        require_playable(&dice, config.min_dice.max(2))?;
        if config.first_move_range < 2 {
            return Err(FairPlayError::InvalidRange {
                range: config.first_move_range,
            });
        }
        Ok(Self {
            dice,
            selector,
            first_move_range: config.first_move_range,
        })
    }

    /// Configured dice.
    pub fn dice(&self) -> &[FaceSet] {
        &self.dice
    }

    /// Play one game.
    pub async fn play<P: Participant>(&mut self, participant: &mut P) -> Result<GameReport> {
        let mut rounds = Vec::with_capacity(3);

        let round = self
            .selector
            .run_labeled_round("first move", self.first_move_range, &mut *participant)
            .await?;
        let (outcome, transcript) = finished(&round)?;
        let first = Side::first_mover(outcome);
        info!(first = %first, "First move decided");
        participant.observe(&SessionEvent::FirstMoveDecided {
            first,
            transcript: transcript.clone(),
        });
        rounds.push(transcript);

        let (user_index, computer_index) = match first {
            Side::User => {
                let all: Vec<usize> = (0..self.dice.len()).collect();
                let user = self.user_pick(participant, &all).await?;
                let computer = best_counter(&self.dice, user, &[]).ok_or(
                    FairPlayError::NotEnoughDice {
                        required: 2,
                        provided: self.dice.len(),
                    },
                )?;
                self.announce(participant, Side::Computer, computer);
                (user, computer)
            }
            Side::Computer => {
                let computer = choose_index(self.selector.rng_mut(), self.dice.len()).ok_or(
                    FairPlayError::NotEnoughDice {
                        required: 2,
                        provided: 0,
                    },
                )?;
                self.announce(participant, Side::Computer, computer);
                let rest: Vec<usize> = (0..self.dice.len()).filter(|i| *i != computer).collect();
                let user = self.user_pick(participant, &rest).await?;
                (user, computer)
            }
        };

        let mut user_roll = 0;
        let mut computer_roll = 0;
        for side in [first, first.other()] {
            let index = match side {
                Side::User => user_index,
                Side::Computer => computer_index,
            };
            let (face, transcript) = self.roll(participant, side, index).await?;
            participant.observe(&SessionEvent::Rolled {
                side,
                face,
                transcript: transcript.clone(),
            });
            rounds.push(transcript);
            match side {
                Side::User => user_roll = face,
                Side::Computer => computer_roll = face,
            }
        }

        let winner = decide_winner(user_roll, computer_roll);
        info!(user_roll, computer_roll, winner = ?winner, "Game finished");

        Ok(GameReport {
            first_mover: first,
            user_die_index: user_index,
            user_die: self.dice[user_index].clone(),
            computer_die_index: computer_index,
            computer_die: self.dice[computer_index].clone(),
            user_roll,
            computer_roll,
            winner,
            rounds,
        })
    }

    async fn user_pick<P: Participant>(&self, participant: &mut P, available: &[usize]) -> Result<usize> {
        let choice = with_timeout(
            self.selector.counterpart_timeout(),
            participant.choose_die(&self.dice, available),
        )
        .await?;

        if !available.contains(&choice) {
            return Err(FairPlayError::InvalidSelection {
                index: choice,
                available: available.len(),
            });
        }

        self.announce(participant, Side::User, choice);
        Ok(choice)
    }

    fn announce<P: Participant>(&self, participant: &mut P, side: Side, index: usize) {
        debug!(side = %side, index, die = %self.dice[index], "Die chosen");
        participant.observe(&SessionEvent::DieChosen {
            side,
            index,
            die: self.dice[index].clone(),
        });
    }

    async fn roll<P: Participant>(
        &mut self,
        participant: &mut P,
        side: Side,
        index: usize,
    ) -> Result<(u32, RoundTranscript)> {
        let die = &self.dice[index];
        let range = die.len() as u64;
        let label = format!("{side} roll");

        let round = self
            .selector
            .run_labeled_round(&label, range, &mut *participant)
            .await?;
        let (outcome, transcript) = finished(&round)?;
        let face = die.face(outcome as usize).ok_or(FairPlayError::ValueOutOfRange {
            value: outcome,
            range,
        })?;

        Ok((face, transcript))
    }
}

fn finished(round: &Round) -> Result<(u64, RoundTranscript)> {
    match (round.outcome(), round.transcript()) {
        (Some(outcome), Some(transcript)) => Ok((outcome, transcript)),
        _ => Err(FairPlayError::PhaseViolation {
            expected: RoundPhase::Combined,
            actual: round.phase(),
        }),
    }
}

async fn with_timeout<T, F>(limit: Option<Duration>, answer: F) -> Result<T>
where
    F: Future<Output = Result<T, CounterpartError>>,
{
    match limit {
        Some(limit) => match tokio::time::timeout(limit, answer).await {
            Ok(answer) => answer.map_err(FairPlayError::from),
            Err(_) => Err(FairPlayError::CounterpartTimeout { waited: limit }),
        },
        None => answer.await.map_err(FairPlayError::from),
    }
}

// =============================================================================
// TESTS
// =============================================================================
