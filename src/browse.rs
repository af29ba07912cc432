//! Interactive terminal front end for a [`Session`].
//!
//! Lines read from the input become session events: free text is a query,
//! lines starting with `:` are controls. Decoding runs on tokio's blocking
//! pool and reports back through the same channel, so every state change
//! happens on the loop below in arrival order.

use std::{io::Write, sync::Arc, time::Instant};

use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::mpsc,
};

use crate::{
    decoder::DocumentDecoder,
    error::{self, Result},
    session::{self, Effect, Session, SessionEvent},
};

pub const HELP: &str = "\
Type to search. Controls:
  :open N     open the Nth listed script
  :next       next page            :prev     previous page
  :zoom+      zoom in              :zoom-    zoom out
  :resize W   set viewport width   :back     back to the list
  :voice      start/stop voice     :quit     exit";

/// A parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Event(SessionEvent),
    Open(usize),
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    let Some(control) = trimmed.strip_prefix(':') else {
        return Command::Event(SessionEvent::QueryChanged(line.to_string()));
    };

    let mut parts = control.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();

    match (name, arg) {
        ("open" | "o", Some(n)) => match n.parse() {
            Ok(n) => Command::Open(n),
            Err(_) => Command::Unknown(trimmed.to_string()),
        },
        ("next" | "n", None) => Command::Event(SessionEvent::NextPage),
        ("prev" | "p", None) => Command::Event(SessionEvent::PreviousPage),
        ("zoom+" | "+", None) => Command::Event(SessionEvent::ZoomIn),
        ("zoom-" | "-", None) => Command::Event(SessionEvent::ZoomOut),
        ("resize", Some(w)) => match w.parse() {
            Ok(w) => Command::Event(SessionEvent::Resize(w)),
            Err(_) => Command::Unknown(trimmed.to_string()),
        },
        ("back" | "b", None) => Command::Event(SessionEvent::Back),
        ("voice" | "v", None) => Command::Event(SessionEvent::ToggleVoice),
        ("help" | "h", None) => Command::Help,
        ("quit" | "q", None) => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

enum Message {
    Line(String),
    Eof,
    Decoded(SessionEvent),
}

fn spawn_decode(
    decoder: Arc<dyn DocumentDecoder>,
    tx: mpsc::UnboundedSender<Message>,
    generation: u64,
    locator: String,
) {
    tokio::spawn(async move {
        let task_locator = locator.clone();
        let decoded = tokio::task::spawn_blocking(move || {
            decoder.page_count(&task_locator)
        })
        .await;

        // Every decode reports back exactly once, even if the decoder
        // panicked, so the loop never waits on it forever.
        let event = match decoded {
            Ok(Ok(pages)) => SessionEvent::DocumentReady {
                generation,
                page_count: i64::from(pages),
            },
            Ok(Err(e)) => {
                tracing::warn!(locator, error = %e, "decode failed");
                SessionEvent::DocumentFailed {
                    generation,
                    reason: session::failure_reason(&e),
                }
            }
            Err(e) => {
                tracing::error!(locator, error = %e, "decoder task aborted");
                SessionEvent::DocumentFailed {
                    generation,
                    reason: "The file could not be read.".into(),
                }
            }
        };
        let _ = tx.send(Message::Decoded(event));
    });
}

/// Drive `session` from `input` until `:quit` or end of input, writing each
/// rendered screen to `out`. At end of input, outstanding decodes are
/// awaited so their results are shown.
pub async fn run_session<R, W>(
    mut session: Session,
    decoder: Arc<dyn DocumentDecoder>,
    input: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin + Send + 'static,
    W: Write,
{
    let (tx, mut rx) = mpsc::unbounded_channel();

    let reader_tx = tx.clone();
    tokio::spawn(async move {
        let mut lines = input.lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if reader_tx.send(Message::Line(line)).is_err() {
                        return;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "input read failed");
                    break;
                }
            }
        }
        let _ = reader_tx.send(Message::Eof);
    });

    writeln!(out, "{}", session.render(Instant::now()))?;

    let mut pending = 0usize;
    let mut draining = false;

    while let Some(message) = rx.recv().await {
        let event = match message {
            Message::Eof => {
                if pending == 0 {
                    break;
                }
                draining = true;
                continue;
            }
            Message::Decoded(event) => {
                pending = pending.saturating_sub(1);
                event
            }
            Message::Line(line) => match parse_command(&line) {
                Command::Event(event) => event,
                Command::Open(n) => {
                    let entry = session
                        .selection()
                        .filtered()
                        .and_then(|listed| listed.get(n.wrapping_sub(1)))
                        .cloned();
                    match entry {
                        Some(entry) => SessionEvent::Select(entry),
                        None => {
                            writeln!(out, "No script numbered {n}.")?;
                            continue;
                        }
                    }
                }
                Command::Help => {
                    writeln!(out, "{HELP}")?;
                    continue;
                }
                Command::Quit => break,
                Command::Unknown(text) => {
                    writeln!(out, "Unknown command: {text} (try :help)")?;
                    continue;
                }
            },
        };

        for effect in session.handle(event) {
            match effect {
                Effect::Decode {
                    generation,
                    locator,
                } => {
                    pending += 1;
                    spawn_decode(decoder.clone(), tx.clone(), generation, locator);
                }
            }
        }

        writeln!(out, "{}", session.render(Instant::now()))?;
        if session.selection().viewing().is_none() {
            tracing::debug!(
                query = session.query(),
                results = %session::result_summary(&session),
                "list updated"
            );
        }

        if draining && pending == 0 {
            break;
        }
    }

    Ok(())
}

/// Run an interactive session on stdin/stdout.
pub fn run_browse(
    session: Session,
    decoder: Arc<dyn DocumentDecoder>,
) -> error::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| {
            error::Error::Config(format!("failed to start tokio runtime: {e}"))
        })?;

    let result = runtime.block_on(async move {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        run_session(session, decoder, stdin, &mut stdout).await
    });

    // The stdin reader may still be parked in a blocking read after :quit.
    runtime.shutdown_background();
    result
}
