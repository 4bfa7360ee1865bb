//! Selection state machine.
//!
//! A session walks through four stages, each gated by the counterpart:
//!
//! 1. DecideFirstMove: fair exchange over `0..2`; result 1 means the program
//!    selects and rolls first.
//! 2. AssignDice: the first mover takes a die, the other side picks from the
//!    rest. The program's pick is a plain uniform draw.
//! 3. RollDie: one fair exchange per side over `0..faces`, first mover first.
//!    The counterpart contributes to both rolls.
//! 4. Resolve: the strictly greater roll wins, equal rolls tie.
//!
//! The counterpart may abandon at any prompt, which ends the session without
//! revealing the exchange in flight.

use super::DieSet;
use crate::counterpart::{Counterpart, Reply, Request};
use crate::crypto::{CryptoError, OsRandom, SecretSource};
use crate::fairness::{ExchangeError, ExchangeResult, FairExchange};
use crate::protocol::{
    resolve, CommitNotice, GameEvent, GameOutcome, Purpose, RevealNotice, SessionId, Side,
};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Fatal errors while running a session
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    #[error("Revealed {purpose} exchange does not match its commitment")]
    VerificationFailed { purpose: Purpose },

    #[error("Random value {value} is outside 0..{range}")]
    OutOfRange { value: u32, range: u32 },
}

/// How a session ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEnd {
    Completed(GameOutcome),
    /// The counterpart walked away; nothing was decided
    Abandoned,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Assignment {
    program: usize,
    counterpart: usize,
}

impl Assignment {
    fn of(&self, side: Side) -> usize {
        match side {
            Side::Program => self.program,
            Side::Counterpart => self.counterpart,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Stage {
    DecideFirstMove,
    AssignDice {
        first_mover: Side,
    },
    RollDie {
        first_mover: Side,
        dice: Assignment,
        first_roll: Option<i64>,
    },
    Resolve {
        first_mover: Side,
        dice: Assignment,
        program_roll: i64,
        counterpart_roll: i64,
    },
    Finished(GameOutcome),
}

/// One game between the program and a counterpart
pub struct Game<S = OsRandom> {
    session: SessionId,
    dice: DieSet,
    source: S,
}

impl Game<OsRandom> {
    /// Create a game drawing from the OS CSPRNG
    pub fn new(dice: DieSet) -> Self {
        Self::with_source(dice, OsRandom)
    }
}

impl<S: SecretSource> Game<S> {
    /// Create a game with an explicit secret source
    pub fn with_source(dice: DieSet, source: S) -> Self {
        Self {
            session: SessionId::new(),
            dice,
            source,
        }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Run the session to completion or abandonment
    pub async fn play<C>(mut self, counterpart: &mut C) -> Result<SessionEnd, GameError>
    where
        C: Counterpart + ?Sized,
    {
        info!(session = %self.session, dice = self.dice.len(), "session started");
        counterpart.observe(&GameEvent::Started {
            session: self.session,
            dice: self.dice.len(),
        });

        let mut stage = Stage::DecideFirstMove;
        loop {
            if let Stage::Finished(outcome) = stage {
                return Ok(SessionEnd::Completed(outcome));
            }
            debug!(session = %self.session, ?stage, "advancing");
            stage = match self.advance(stage, counterpart).await? {
                Some(next) => next,
                None => {
                    info!(session = %self.session, "counterpart abandoned the session");
                    return Ok(SessionEnd::Abandoned);
                }
            };
        }
    }

    /// Run one stage. `None` means the counterpart abandoned.
    async fn advance<C>(
        &mut self,
        stage: Stage,
        counterpart: &mut C,
    ) -> Result<Option<Stage>, GameError>
    where
        C: Counterpart + ?Sized,
    {
        let next = match stage {
            Stage::DecideFirstMove => {
                let Some(first_mover) = self.decide_first_move(counterpart).await? else {
                    return Ok(None);
                };
                Stage::AssignDice { first_mover }
            }
            Stage::AssignDice { first_mover } => {
                let Some(dice) = self.assign_dice(first_mover, counterpart).await? else {
                    return Ok(None);
                };
                Stage::RollDie {
                    first_mover,
                    dice,
                    first_roll: None,
                }
            }
            Stage::RollDie {
                first_mover,
                dice,
                first_roll,
            } => {
                let roller = match first_roll {
                    None => first_mover,
                    Some(_) => first_mover.opponent(),
                };
                let Some(value) = self.roll_die(roller, dice.of(roller), counterpart).await?
                else {
                    return Ok(None);
                };
                match first_roll {
                    None => Stage::RollDie {
                        first_mover,
                        dice,
                        first_roll: Some(value),
                    },
                    Some(first) => {
                        let (program_roll, counterpart_roll) = match first_mover {
                            Side::Program => (first, value),
                            Side::Counterpart => (value, first),
                        };
                        Stage::Resolve {
                            first_mover,
                            dice,
                            program_roll,
                            counterpart_roll,
                        }
                    }
                }
            }
            Stage::Resolve {
                first_mover,
                dice,
                program_roll,
                counterpart_roll,
            } => {
                let outcome = GameOutcome {
                    first_mover,
                    program_die: dice.program,
                    counterpart_die: dice.counterpart,
                    program_roll,
                    counterpart_roll,
                    result: resolve(program_roll, counterpart_roll),
                };
                info!(
                    session = %self.session,
                    program_roll,
                    counterpart_roll,
                    result = %outcome.result,
                    "session finished"
                );
                counterpart.observe(&GameEvent::Finished(outcome.clone()));
                Stage::Finished(outcome)
            }
            Stage::Finished(outcome) => Stage::Finished(outcome),
        };
        Ok(Some(next))
    }

    async fn decide_first_move<C>(&mut self, counterpart: &mut C) -> Result<Option<Side>, GameError>
    where
        C: Counterpart + ?Sized,
    {
        counterpart.observe(&GameEvent::DecidingFirstMove);
        let Some(exchange) = self
            .exchange(Purpose::FirstMove, 2, counterpart, |commitment| {
                Request::GuessFirstMove { commitment }
            })
            .await?
        else {
            return Ok(None);
        };

        let first_mover = if exchange.result == 1 {
            Side::Program
        } else {
            Side::Counterpart
        };
        info!(session = %self.session, %first_mover, "first move decided");
        counterpart.observe(&GameEvent::FirstMoveDecided { first_mover });
        Ok(Some(first_mover))
    }

    async fn assign_dice<C>(
        &mut self,
        first_mover: Side,
        counterpart: &mut C,
    ) -> Result<Option<Assignment>, GameError>
    where
        C: Counterpart + ?Sized,
    {
        let assignment = match first_mover {
            Side::Program => {
                let program = self.pick_program_die(None, counterpart)?;
                let Some(chosen) = self.choose_die(Some(program), counterpart).await else {
                    return Ok(None);
                };
                Assignment {
                    program,
                    counterpart: chosen,
                }
            }
            Side::Counterpart => {
                let Some(chosen) = self.choose_die(None, counterpart).await else {
                    return Ok(None);
                };
                let program = self.pick_program_die(Some(chosen), counterpart)?;
                Assignment {
                    program,
                    counterpart: chosen,
                }
            }
        };
        info!(
            session = %self.session,
            program_die = assignment.program,
            counterpart_die = assignment.counterpart,
            "dice assigned"
        );
        Ok(Some(assignment))
    }

    /// Uniform draw among the dice not already taken
    fn pick_program_die<C>(
        &mut self,
        taken: Option<usize>,
        counterpart: &mut C,
    ) -> Result<usize, GameError>
    where
        C: Counterpart + ?Sized,
    {
        let candidates = self.dice.indices_except(taken);
        // a die set holds at most u32::MAX dice
        let range = candidates.len() as u32;
        let pick = self.source.secret(range)?;
        let index = *candidates
            .get(pick as usize)
            .ok_or(GameError::OutOfRange { value: pick, range })?;
        counterpart.observe(&GameEvent::DieChosen {
            side: Side::Program,
            index,
        });
        Ok(index)
    }

    async fn choose_die<C>(&self, taken: Option<usize>, counterpart: &mut C) -> Option<usize>
    where
        C: Counterpart + ?Sized,
    {
        let request = Request::ChooseDie {
            candidates: self.dice.indices_except(taken),
        };
        let index = self.ask(&request, counterpart).await? as usize;
        counterpart.observe(&GameEvent::DieChosen {
            side: Side::Counterpart,
            index,
        });
        Some(index)
    }

    async fn roll_die<C>(
        &mut self,
        roller: Side,
        die_index: usize,
        counterpart: &mut C,
    ) -> Result<Option<i64>, GameError>
    where
        C: Counterpart + ?Sized,
    {
        let die = match self.dice.get(die_index) {
            Some(die) => die.clone(),
            None => {
                return Err(GameError::OutOfRange {
                    value: die_index as u32,
                    range: self.dice.len() as u32,
                })
            }
        };
        counterpart.observe(&GameEvent::RollStarted { roller });

        let Some(exchange) = self
            .exchange(Purpose::Roll(roller), die.size(), counterpart, |commitment| {
                Request::AddToRoll { roller, commitment }
            })
            .await?
        else {
            return Ok(None);
        };

        let value = die.face(exchange.result).ok_or(GameError::OutOfRange {
            value: exchange.result,
            range: die.size(),
        })?;
        info!(session = %self.session, %roller, die = %die, value, "rolled");
        counterpart.observe(&GameEvent::Rolled {
            side: roller,
            face_index: exchange.result,
            value,
        });
        Ok(Some(value))
    }

    /// Commit, wait for the counterpart's number, combine and reveal
    async fn exchange<C, F>(
        &mut self,
        purpose: Purpose,
        range: u32,
        counterpart: &mut C,
        request: F,
    ) -> Result<Option<ExchangeResult>, GameError>
    where
        C: Counterpart + ?Sized,
        F: FnOnce(CommitNotice) -> Request,
    {
        let mut exchange = FairExchange::commit(&mut self.source, range)?;
        let notice = CommitNotice {
            purpose,
            range,
            hmac: *exchange.commitment(),
        };
        debug!(session = %self.session, %purpose, range, hmac = %notice.hmac, "commitment published");
        counterpart.observe(&GameEvent::Committed(notice.clone()));

        let Some(value) = self.ask(&request(notice), counterpart).await else {
            // dropped while still committed: only the HMAC ever left
            return Ok(None);
        };
        exchange.combine(value)?;
        let revealed = exchange.reveal()?;
        if !revealed.verify() {
            return Err(GameError::VerificationFailed { purpose });
        }
        counterpart.observe(&GameEvent::Revealed(RevealNotice::new(purpose, &revealed)));
        Ok(Some(revealed))
    }

    /// Ask until the counterpart gives an acceptable number or abandons
    async fn ask<C>(&self, request: &Request, counterpart: &mut C) -> Option<u32>
    where
        C: Counterpart + ?Sized,
    {
        loop {
            match counterpart.respond(request).await {
                Reply::Number(value) if request.accepts(value) => return Some(value),
                Reply::Number(value) => {
                    warn!(session = %self.session, value, "rejected selection");
                    counterpart.observe(&GameEvent::InvalidSelection { value });
                }
                Reply::Abandon => return None,
            }
        }
    }
}
