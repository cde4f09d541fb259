//! Session input
//!
//! Sources of prompt lines for a query session. `LineInput` reads a
//! `BufRead` directly; `InterruptibleInput` reads on a background thread so
//! an interrupt can end the session while a read is still blocked.

use std::io::{self, BufRead};
use std::thread;

use crossbeam::channel::{self, Receiver};

/// One event from the interactive front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A line of input, decoded lossily, without its line terminator
    Line(String),

    /// The input stream ended
    End,

    /// The user interrupted the session
    Interrupt,
}

/// A source of prompt input
pub trait SessionInput {
    /// Block until the next line, end of input or interrupt
    fn next_event(&mut self) -> io::Result<InputEvent>;
}

/// Reads lines from any `BufRead`; never reports an interrupt
pub struct LineInput<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> SessionInput for LineInput<R> {
    fn next_event(&mut self) -> io::Result<InputEvent> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(InputEvent::End);
        }
        Ok(InputEvent::Line(decode_line(&self.buf)))
    }
}

/// Lines from a reader thread, raced against an interrupt channel
pub struct InterruptibleInput {
    lines: Receiver<io::Result<String>>,
    interrupts: Receiver<()>,
}

impl InterruptibleInput {
    /// Build from already-connected channels
    ///
    /// A disconnected `lines` channel means end of input.
    pub fn new(lines: Receiver<io::Result<String>>, interrupts: Receiver<()>) -> Self {
        Self { lines, interrupts }
    }

    /// Read `reader` on a background thread
    ///
    /// The thread stops at end of input or on the first read error. If the
    /// session ends first, the thread is left blocked on its read.
    pub fn spawn<R>(mut reader: R, interrupts: Receiver<()>) -> Self
    where
        R: BufRead + Send + 'static,
    {
        let (tx, lines) = channel::bounded(1);

        thread::spawn(move || {
            let mut buf = Vec::new();
            loop {
                buf.clear();
                let event = match reader.read_until(b'\n', &mut buf) {
                    Ok(0) => break,
                    Ok(_) => Ok(decode_line(&buf)),
                    Err(e) => Err(e),
                };
                let failed = event.is_err();
                if tx.send(event).is_err() || failed {
                    break;
                }
            }
        });

        Self::new(lines, interrupts)
    }
}

impl SessionInput for InterruptibleInput {
    fn next_event(&mut self) -> io::Result<InputEvent> {
        crossbeam::select! {
            recv(self.interrupts) -> signal => match signal {
                Ok(()) => Ok(InputEvent::Interrupt),
                // Handler gone: keep waiting on lines only
                Err(_) => match self.lines.recv() {
                    Ok(line) => line.map(InputEvent::Line),
                    Err(_) => Ok(InputEvent::End),
                },
            },
            recv(self.lines) -> line => match line {
                Ok(line) => line.map(InputEvent::Line),
                Err(_) => Ok(InputEvent::End),
            },
        }
    }
}

/// Lossy UTF-8 decode with the trailing `\n` / `\r\n` removed
fn decode_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_end_matches(['\n', '\r'])
        .to_string()
}
