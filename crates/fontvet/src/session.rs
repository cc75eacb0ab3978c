// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Session shim between the display side and the engine.
//!
//! The engine runs on a dedicated worker thread so the display side
//! stays responsive for the seconds-to-minutes a full pass takes.
//! Commands flow in over a channel and are served strictly FIFO: a run
//! requested before warm-up finishes simply queues behind it, and two
//! runs can never interleave. Messages flow back over a second channel
//! and pass through [`EngineSession::recv_event`], which tracks the
//! session state machine:
//!
//! ```text
//! uninitialized -> loading -> ready -> (idle | running) -> ...
//! ```
//!
//! A load failure or run abort moves the session to `errored`, which is
//! terminal: the user restarts with a fresh session.

use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::aggregator::Aggregator;
use crate::engine::CheckEngine;
use crate::error::{Error, Result};
use crate::event::RunRequest;
use crate::message::EngineMessage;

/// Where the session currently is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No warm-up requested yet.
    Uninitialized,
    /// Warm-up queued or underway.
    Loading,
    /// Engine loaded, no run active.
    Idle,
    /// A run is streaming results.
    Running,
    /// Terminal failure; restart with a new session.
    Errored,
}

enum Command {
    Load,
    ListChecks,
    Run(Box<RunRequest>),
    Shutdown,
}

/// Handle to a worker-thread engine.
pub struct EngineSession {
    commands: Sender<Command>,
    events: Receiver<EngineMessage>,
    worker: Option<JoinHandle<()>>,
    state: SessionState,
    version: Option<String>,
    loaded: bool,
    failure: Option<String>,
}

impl EngineSession {
    /// Spawn the worker thread that owns the engine.
    pub fn spawn<E: CheckEngine>(engine: E) -> Self {
        let (commands, command_rx) = unbounded::<Command>();
        let (event_tx, events) = unbounded::<EngineMessage>();
        let worker = std::thread::spawn(move || worker_loop(engine, command_rx, event_tx));
        Self {
            commands,
            events,
            worker: Some(worker),
            state: SessionState::Uninitialized,
            version: None,
            loaded: false,
            failure: None,
        }
    }

    /// Request the one-time warm-up. Idempotent: repeated calls while
    /// loading or after readiness do nothing.
    pub fn load(&mut self) -> Result<()> {
        if self.state != SessionState::Uninitialized {
            return Ok(());
        }
        self.send(Command::Load)?;
        self.state = SessionState::Loading;
        Ok(())
    }

    /// Request the metadata dump; answered with a `Checks` message.
    pub fn list_checks(&mut self) -> Result<()> {
        self.ensure_usable()?;
        self.send(Command::ListChecks)
    }

    /// Queue a run. Runs issued before readiness wait behind the
    /// warm-up; runs issued while another run is active wait behind it.
    pub fn run_checks(&mut self, request: RunRequest) -> Result<()> {
        self.ensure_usable()?;
        self.send(Command::Run(Box::new(request)))
    }

    fn ensure_usable(&self) -> Result<()> {
        if self.state != SessionState::Errored {
            return Ok(());
        }
        let message = self
            .failure
            .clone()
            .unwrap_or_else(|| "session is in a failed state".to_string());
        if self.loaded {
            Err(Error::Engine(message))
        } else {
            Err(Error::EngineLoad(message))
        }
    }

    /// Receive the next engine message, blocking, and advance the
    /// session state machine.
    pub fn recv_event(&mut self) -> Result<EngineMessage> {
        let message = self
            .events
            .recv()
            .map_err(|_| Error::Disconnected("engine worker hung up".to_string()))?;
        self.observe(&message);
        Ok(message)
    }

    /// Receive without blocking; `None` when no message is pending.
    pub fn try_recv_event(&mut self) -> Result<Option<EngineMessage>> {
        match self.events.try_recv() {
            Ok(message) => {
                self.observe(&message);
                Ok(Some(message))
            }
            Err(crossbeam_channel::TryRecvError::Empty) => Ok(None),
            Err(crossbeam_channel::TryRecvError::Disconnected) => {
                Err(Error::Disconnected("engine worker hung up".to_string()))
            }
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Engine version, once a run has reported it.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// The error that put the session in its terminal state.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    fn observe(&mut self, message: &EngineMessage) {
        match message {
            EngineMessage::Ready => {
                self.loaded = true;
                self.state = SessionState::Idle;
            }
            EngineMessage::Version(version) => {
                self.version = Some(version.clone());
                self.state = SessionState::Running;
            }
            EngineMessage::Progress(_) | EngineMessage::Result(_) => {
                self.state = SessionState::Running;
            }
            EngineMessage::Done => self.state = SessionState::Idle,
            EngineMessage::Error(message) => {
                tracing::warn!("session entered failed state: {}", message);
                self.failure = Some(message.clone());
                self.state = SessionState::Errored;
            }
            EngineMessage::Checks(_) => {}
        }
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| Error::Disconnected("engine worker hung up".to_string()))
    }
}

impl Drop for EngineSession {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn worker_loop<E: CheckEngine>(
    mut engine: E,
    commands: Receiver<Command>,
    events: Sender<EngineMessage>,
) {
    let mut loaded = false;
    let mut load_error: Option<String> = None;

    for command in commands.iter() {
        if matches!(command, Command::Shutdown) {
            break;
        }

        // Every command waits for the warm-up; the first one to arrive
        // performs it.
        if !loaded {
            if let Some(message) = &load_error {
                // The session is dead; keep answering so queued requests
                // observe the failure instead of hanging.
                if events.send(EngineMessage::Error(message.clone())).is_err() {
                    return;
                }
                continue;
            }
            match engine.load() {
                Ok(()) => {
                    loaded = true;
                    if events.send(EngineMessage::Ready).is_err() {
                        return;
                    }
                }
                Err(message) => {
                    tracing::warn!("engine warm-up failed: {}", message);
                    load_error = Some(message.clone());
                    if events.send(EngineMessage::Error(message)).is_err() {
                        return;
                    }
                    continue;
                }
            }
        }

        let outcome = match command {
            Command::Load | Command::Shutdown => continue,
            Command::ListChecks => match engine.list_checks() {
                Ok(checks) => events.send(EngineMessage::Checks(checks)),
                Err(message) => events.send(EngineMessage::Error(message)),
            },
            Command::Run(request) => {
                let run_outcome = run_one(&mut engine, &request, &events);
                match run_outcome {
                    Ok(()) => events.send(EngineMessage::Done),
                    Err(message) => events.send(EngineMessage::Error(message)),
                }
            }
        };
        if outcome.is_err() {
            return;
        }
    }
}

fn run_one<E: CheckEngine>(
    engine: &mut E,
    request: &RunRequest,
    events: &Sender<EngineMessage>,
) -> std::result::Result<(), String> {
    let version = engine.version()?;
    if events.send(EngineMessage::Version(version)).is_err() {
        return Ok(());
    }
    let mut emit = |message: EngineMessage| {
        let _ = events.send(message);
    };
    engine.run(request, &mut emit)
}

/// Pump one complete run through an aggregator.
///
/// Starts the aggregator, queues the run, then applies the message
/// stream until the run terminates: progress updates feed
/// [`Aggregator::update_percent`], results feed
/// [`Aggregator::ingest`], `Done` finishes the aggregate and `Error`
/// fails both the aggregate and this call.
pub fn drive_run(
    session: &mut EngineSession,
    request: RunRequest,
    aggregator: &mut Aggregator,
) -> Result<()> {
    aggregator.start(request.profile.clone())?;
    session.run_checks(request)?;

    loop {
        match session.recv_event()? {
            EngineMessage::Ready => {
                tracing::debug!("engine ready; run dequeued");
            }
            EngineMessage::Version(version) => {
                tracing::debug!("engine version {}", version);
            }
            EngineMessage::Checks(_) => {
                // Metadata answer to an earlier list request; not part
                // of this run.
            }
            EngineMessage::Progress(update) => aggregator.update_percent(update.percent)?,
            EngineMessage::Result(event) => aggregator.ingest(*event)?,
            EngineMessage::Done => {
                aggregator.finish()?;
                return Ok(());
            }
            EngineMessage::Error(message) => {
                aggregator.fail(message.clone())?;
                return Err(Error::Engine(message));
            }
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
