//! Interactive player on a line-oriented console.

use std::future::Future;
use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::warn;

use super::input::LineSource;
use crate::game::dice::FaceSet;
use crate::game::session::{Participant, SessionEvent, Side};
use crate::protocol::counterpart::{Counterpart, CounterpartError};
use crate::protocol::round::CommitmentOffer;
use crate::protocol::transcript::RoundTranscript;

/// The user at a console.
///
/// Reads answers from a [`LineSource`] and writes prompts to `W`. Each
/// commitment is shown before the user is asked for a value, and each
/// opening is shown once the round completes so the user can check it.
pub struct ConsolePlayer<L, W> {
    lines: L,
    out: W,
}

impl<R, W> ConsolePlayer<Lines<R>, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    /// Create a player reading lines from an async reader.
    pub fn from_reader(reader: R, out: W) -> Self {
        Self::new(reader.lines(), out)
    }
}

impl<L, W> ConsolePlayer<L, W>
where
    L: LineSource,
    W: Write,
{
    /// Create a player over `lines` and `out`.
    pub fn new(lines: L, out: W) -> Self {
        Self { lines, out }
    }

    /// Print one line.
    pub fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    /// Ask a yes/no question. An empty answer means no.
    pub async fn confirm(&mut self, prompt: &str) -> Result<bool, CounterpartError> {
        write!(self.out, "{prompt} [y/N]: ")?;
        self.out.flush()?;

        let answer = self.read_line().await?;
        match answer.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => Ok(true),
            "" | "n" | "no" => Ok(false),
            _ => Err(CounterpartError::Malformed { input: answer }),
        }
    }

    /// Give back the writer.
    pub fn into_output(self) -> W {
        self.out
    }

    async fn read_line(&mut self) -> Result<String, CounterpartError> {
        match self.lines.next_line().await? {
            Some(line) => Ok(line),
            None => Err(CounterpartError::Closed),
        }
    }

    async fn ask_number(&mut self, offer: &CommitmentOffer) -> Result<u64, CounterpartError> {
        let max = offer.range.saturating_sub(1);
        writeln!(
            self.out,
            "[{}] I selected a random value in the range 0..{max}.",
            offer.label
        )?;
        writeln!(self.out, "HMAC ({}): {}", offer.algorithm, offer.tag_hex())?;
        write!(self.out, "Select a number (0 to {max}): ")?;
        self.out.flush()?;

        let answer = self.read_line().await?;
        parse_answer(&answer)
    }

    async fn ask_die(
        &mut self,
        dice: &[FaceSet],
        available: &[usize],
    ) -> Result<usize, CounterpartError> {
        writeln!(self.out, "Choose your dice:")?;
        for &index in available {
            if let Some(die) = dice.get(index) {
                writeln!(self.out, "{index} - {die}")?;
            }
        }
        write!(self.out, "Your selection: ")?;
        self.out.flush()?;

        let answer = self.read_line().await?;
        parse_answer(&answer)
    }

    fn narrate(&mut self, event: &SessionEvent) -> io::Result<()> {
        match event {
            SessionEvent::FirstMoveDecided { first, transcript } => {
                reveal(&mut self.out, transcript)?;
                match first {
                    Side::User => writeln!(self.out, "You make the first move.")?,
                    Side::Computer => writeln!(self.out, "I make the first move.")?,
                }
            }
            SessionEvent::DieChosen { side, die, .. } => match side {
                Side::User => writeln!(self.out, "You choose the [{die}] dice.")?,
                Side::Computer => writeln!(self.out, "I choose the [{die}] dice.")?,
            },
            SessionEvent::Rolled {
                side,
                face,
                transcript,
            } => {
                reveal(&mut self.out, transcript)?;
                match side {
                    Side::User => writeln!(self.out, "Your roll: {face}.")?,
                    Side::Computer => writeln!(self.out, "My roll: {face}.")?,
                }
            }
        }
        self.out.flush()
    }
}

fn reveal<W: Write>(out: &mut W, transcript: &RoundTranscript) -> io::Result<()> {
    writeln!(
        out,
        "My number is {} (KEY={}).",
        transcript.committed_value, transcript.secret_key
    )?;
    writeln!(
        out,
        "The result is {} + {} = {} (mod {}).",
        transcript.committed_value, transcript.counterpart_value, transcript.outcome, transcript.range
    )
}

fn parse_answer<T: std::str::FromStr>(answer: &str) -> Result<T, CounterpartError> {
    answer
        .trim()
        .parse()
        .map_err(|_| CounterpartError::Malformed {
            input: answer.to_string(),
        })
}

impl<L, W> Counterpart for ConsolePlayer<L, W>
where
    L: LineSource,
    W: Write,
{
    fn contribute(
        &mut self,
        offer: &CommitmentOffer,
    ) -> impl Future<Output = Result<u64, CounterpartError>> {
        self.ask_number(offer)
    }
}

impl<L, W> Participant for ConsolePlayer<L, W>
where
    L: LineSource,
    W: Write,
{
    fn choose_die(
        &mut self,
        dice: &[FaceSet],
        available: &[usize],
    ) -> impl Future<Output = Result<usize, CounterpartError>> {
        self.ask_die(dice, available)
    }

    fn observe(&mut self, event: &SessionEvent) {
        if let Err(e) = self.narrate(event) {
            warn!(error = %e, "Failed to write to console");
        }
    }
}
