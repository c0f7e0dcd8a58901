//! Line sources for the console player.
//!
//! Stdin is read on its own OS thread and lines are forwarded over a
//! channel. A pending read then never holds up runtime shutdown: when a
//! wait times out, dropping the receiver is all it takes to walk away.

use std::future::Future;
use std::io::{self, BufRead};
use std::thread;

use tokio::io::{AsyncBufRead, Lines};
use tokio::sync::mpsc;
use tracing::debug;

/// Lines buffered between the reader thread and the player.
const LINE_BUFFER: usize = 16;

/// Source of answer lines. `Ok(None)` means the input is closed.
pub trait LineSource {
    /// Next line without its terminator.
    fn next_line(&mut self) -> impl Future<Output = io::Result<Option<String>>>;
}

impl<R: AsyncBufRead + Unpin> LineSource for Lines<R> {
    fn next_line(&mut self) -> impl Future<Output = io::Result<Option<String>>> {
        Lines::next_line(self)
    }
}

/// Lines delivered over a channel.
#[derive(Debug)]
pub struct ChannelLines {
    rx: mpsc::Receiver<io::Result<String>>,
}

impl ChannelLines {
    /// Wrap the receiving half of a line channel.
    pub fn new(rx: mpsc::Receiver<io::Result<String>>) -> Self {
        Self { rx }
    }
}

impl LineSource for ChannelLines {
    fn next_line(&mut self) -> impl Future<Output = io::Result<Option<String>>> {
        async move { self.rx.recv().await.transpose() }
    }
}

/// Read stdin on a dedicated thread.
///
/// The thread is detached. It exits on EOF, on a read error, or once the
/// returned source is dropped and the next line arrives.
pub fn stdin_lines() -> io::Result<ChannelLines> {
    let (tx, rx) = mpsc::channel(LINE_BUFFER);
    thread::Builder::new()
        .name("stdin-reader".into())
        .spawn(move || forward_lines(io::stdin().lock(), tx))?;
    Ok(ChannelLines::new(rx))
}

fn forward_lines<B: BufRead>(reader: B, tx: mpsc::Sender<io::Result<String>>) {
    for line in reader.lines() {
        let failed = line.is_err();
        if tx.blocking_send(line).is_err() {
            debug!("Line receiver dropped, stopping reader");
            return;
        }
        if failed {
            return;
        }
    }
}
