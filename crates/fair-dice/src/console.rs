//! Line-oriented terminal counterpart.

use crate::help;
use crate::transcript::Transcript;
use async_trait::async_trait;
use fair_dice_core::{
    Counterpart, DieSet, GameEvent, Purpose, Reply, Request, SessionId, Side,
};
use std::fmt::Display;
use std::io::{ErrorKind, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::warn;

/// What a line of input means
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Answer {
    Number(u32),
    Exit,
    Help,
    Invalid,
}

fn parse_answer(line: &str) -> Answer {
    let line = line.trim();
    if line.eq_ignore_ascii_case("x") {
        Answer::Exit
    } else if line == "?" {
        Answer::Help
    } else {
        line.parse().map_or(Answer::Invalid, Answer::Number)
    }
}

/// Prompts on `out` and reads answers from `input`
pub struct Console<R, W> {
    dice: DieSet,
    lines: Lines<R>,
    out: W,
    transcript: Option<Transcript>,
    session: Option<SessionId>,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    pub fn new(dice: DieSet, input: R, out: W) -> Self {
        Self {
            dice,
            lines: input.lines(),
            out,
            transcript: None,
            session: None,
        }
    }

    pub fn with_transcript(mut self, transcript: Transcript) -> Self {
        self.transcript = Some(transcript);
        self
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    fn say(&mut self, text: impl Display) {
        if let Err(err) = writeln!(self.out, "{}", text) {
            warn!(%err, "failed to write to terminal");
        }
    }

    fn die(&self, index: usize) -> String {
        self.dice
            .get(index)
            .map_or_else(|| format!("#{}", index), |die| die.to_string())
    }

    fn show_choices(&mut self, request: &Request) {
        match request {
            Request::GuessFirstMove { commitment } => {
                self.say("Try to guess my selection.");
                for value in 0..commitment.range {
                    self.say(format_args!("{} - {}", value, value));
                }
            }
            Request::ChooseDie { candidates } => {
                self.say("Choose your dice:");
                for index in candidates {
                    let die = self.die(*index);
                    self.say(format_args!("{} - {}", index, die));
                }
            }
            Request::AddToRoll { commitment, .. } => {
                self.say(format_args!("Add your number modulo {}.", commitment.range));
                for value in 0..commitment.range {
                    self.say(format_args!("{} - {}", value, value));
                }
            }
        }
        self.say("X - exit");
        self.say("? - help");
        let prompt = write!(self.out, "Your selection: ").and_then(|_| self.out.flush());
        if let Err(err) = prompt {
            warn!(%err, "failed to write to terminal");
        }
    }

    fn record(&mut self, event: &GameEvent) {
        if !Transcript::wants(event) {
            return;
        }
        let session = self.session;
        if let Some(transcript) = self.transcript.as_mut() {
            if let Err(err) = transcript.record(session, event) {
                warn!(%err, "failed to write transcript");
            }
        }
    }
}

#[async_trait]
impl<R, W> Counterpart for Console<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    async fn respond(&mut self, request: &Request) -> Reply {
        loop {
            self.show_choices(request);
            let line = match self.lines.next_line().await {
                Ok(Some(line)) => line,
                // end of input counts as leaving
                Ok(None) => return Reply::Abandon,
                // not UTF-8; the line is already consumed
                Err(err) if err.kind() == ErrorKind::InvalidData => {
                    self.say("Invalid selection. Try again.");
                    continue;
                }
                Err(err) => {
                    warn!(%err, "failed to read from terminal");
                    return Reply::Abandon;
                }
            };
            match parse_answer(&line) {
                Answer::Number(value) => return Reply::Number(value),
                Answer::Exit => return Reply::Abandon,
                Answer::Help => {
                    let table = help::render(&self.dice);
                    self.say(table);
                }
                Answer::Invalid => self.say("Invalid selection. Try again."),
            }
        }
    }

    fn observe(&mut self, event: &GameEvent) {
        self.record(event);
        match event {
            GameEvent::Started { session, .. } => self.session = Some(*session),
            GameEvent::DecidingFirstMove => self.say("Let's determine who makes the first move."),
            GameEvent::Committed(commit) => self.say(format_args!(
                "I selected a random value in the range 0..{} (HMAC={}).",
                commit.range - 1,
                commit.hmac
            )),
            GameEvent::Revealed(reveal) => match reveal.purpose {
                Purpose::FirstMove => self.say(format_args!(
                    "My selection: {} (KEY={}).",
                    reveal.secret, reveal.key
                )),
                Purpose::Roll(_) => {
                    self.say(format_args!(
                        "My number is {} (KEY={}).",
                        reveal.secret, reveal.key
                    ));
                    self.say(format_args!(
                        "The fair number generation result is {} + {} = {} (mod {}).",
                        reveal.secret, reveal.counterpart_value, reveal.result, reveal.range
                    ));
                }
            },
            GameEvent::FirstMoveDecided { first_mover } => match first_mover {
                Side::Program => self.say("I make the first move."),
                Side::Counterpart => self.say("You make the first move."),
            },
            GameEvent::DieChosen { side, index } => {
                let die = self.die(*index);
                match side {
                    Side::Program => self.say(format_args!("I choose the {} dice.", die)),
                    Side::Counterpart => self.say(format_args!("You choose the {} dice.", die)),
                }
            }
            GameEvent::RollStarted { roller } => match roller {
                Side::Program => self.say("It's time for my roll."),
                Side::Counterpart => self.say("It's time for your roll."),
            },
            GameEvent::Rolled { side, value, .. } => match side {
                Side::Program => self.say(format_args!("My roll result is {}.", value)),
                Side::Counterpart => self.say(format_args!("Your roll result is {}.", value)),
            },
            GameEvent::InvalidSelection { .. } => self.say("Invalid selection. Try again."),
            GameEvent::Finished(outcome) => {
                let (mine, yours) = (outcome.program_roll, outcome.counterpart_roll);
                match outcome.result.winner() {
                    Some(Side::Counterpart) => {
                        self.say(format_args!("You win ({} > {})!", yours, mine))
                    }
                    Some(Side::Program) => self.say(format_args!("I win ({} > {})!", mine, yours)),
                    None => self.say(format_args!("It's a tie ({} = {})!", yours, mine)),
                }
            }
        }
    }
}
