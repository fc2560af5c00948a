//! Interrupt watchdog
//!
//! A single background worker that cuts a cancellable wait short when a
//! condition changes. Arming snapshots the predicate's value; the worker
//! re-evaluates it every poll interval and cancels the armed token the moment
//! the value differs, then goes idle until armed again.
//!
//! The worker owns the armament. Callers talk to it over a channel and every
//! command is acknowledged, so `set` and `reset` return only after the worker
//! applied them. While idle the worker blocks on the channel.
//!
//! ```text
//!   set(pred, token) ──► [Idle] ──► [Armed] ──flip──► cancel(token) ──► [Idle]
//!                                      │
//!                       reset() ───────┴──► cancel(token) ──► [Idle]
//! ```

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;

use crate::cancel::CancelToken;
use crate::config::WatchdogConfig;
use crate::error::{NavError, Result};

/// Condition watched while armed
pub type InterruptPredicate = Box<dyn Fn() -> bool + Send>;

struct Armament {
    predicate: InterruptPredicate,
    cancel: CancelToken,
    initial: bool,
}

enum Command {
    Set { armament: Armament, ack: Sender<()> },
    Reset { ack: Sender<()> },
    Shutdown,
}

pub struct InterruptWatchdog {
    commands: Sender<Command>,
    running: Arc<AtomicBool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl InterruptWatchdog {
    /// Spawn the worker thread
    pub fn start(config: WatchdogConfig) -> Result<Self> {
        let (commands, inbox) = unbounded();
        let running = Arc::new(AtomicBool::new(true));

        let worker_running = Arc::clone(&running);
        let poll = config.poll_interval();
        let handle = thread::Builder::new()
            .name("interrupt-watchdog".to_string())
            .spawn(move || {
                log::debug!("Interrupt watchdog started");
                Self::worker_loop(inbox, poll);
                worker_running.store(false, Ordering::SeqCst);
                log::debug!("Interrupt watchdog stopped");
            })
            .map_err(|e| {
                log::error!("Failed to start interrupt watchdog thread: {}", e);
                NavError::WatchdogStopped
            })?;

        Ok(Self {
            commands,
            running,
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Arm with `predicate` and `cancel`, replacing any previous armament.
    ///
    /// The predicate is evaluated once on the calling thread for the initial
    /// value. A replaced armament gets a final evaluation first; it is not
    /// cancelled by the replacement itself.
    pub fn set(&self, predicate: InterruptPredicate, cancel: CancelToken) -> Result<()> {
        let initial = predicate();
        let armament = Armament {
            predicate,
            cancel,
            initial,
        };

        let (ack, done) = bounded(1);
        self.commands
            .send(Command::Set { armament, ack })
            .map_err(|_| NavError::WatchdogStopped)?;
        done.recv().map_err(|_| NavError::WatchdogStopped)
    }

    /// Disarm, cancelling the armed token if it is not cancelled yet.
    /// Idempotent; a no-op once the worker has stopped.
    pub fn reset(&self) {
        let (ack, done) = bounded(1);
        if self.commands.send(Command::Reset { ack }).is_err() || done.recv().is_err() {
            log::trace!("Interrupt watchdog reset after shutdown");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stop the worker permanently and wait for it to exit
    pub fn dispose(&self) {
        let Some(handle) = self.handle.lock().take() else {
            return;
        };

        let _ = self.commands.send(Command::Shutdown);
        if handle.join().is_err() {
            log::error!("Interrupt watchdog thread panicked");
        }
    }

    fn worker_loop(inbox: Receiver<Command>, poll: Duration) {
        let mut armed: Option<Armament> = None;

        loop {
            if let Some(armament) = armed.take() {
                armed = Self::evaluate(armament);
            }

            let command = if armed.is_some() {
                match inbox.recv_timeout(poll) {
                    Ok(command) => command,
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            } else {
                match inbox.recv() {
                    Ok(command) => command,
                    Err(_) => break,
                }
            };

            match command {
                Command::Set { armament, ack } => {
                    if let Some(previous) = armed.take() {
                        Self::evaluate(previous);
                    }
                    armed = Some(armament);
                    let _ = ack.send(());
                }
                Command::Reset { ack } => {
                    if let Some(previous) = armed.take() {
                        previous.cancel.cancel();
                    }
                    let _ = ack.send(());
                }
                Command::Shutdown => {
                    if let Some(previous) = armed.take() {
                        Self::evaluate(previous);
                    }
                    break;
                }
            }
        }
    }

    /// One evaluation; returns the armament if it stays armed
    fn evaluate(armament: Armament) -> Option<Armament> {
        if armament.cancel.is_cancelled() {
            log::trace!("Armed token cancelled elsewhere, going idle");
            return None;
        }

        match panic::catch_unwind(AssertUnwindSafe(|| (armament.predicate)())) {
            Ok(value) if value != armament.initial => {
                log::debug!("Interrupted: condition changed to {}", value);
                armament.cancel.cancel();
                None
            }
            Ok(_) => Some(armament),
            Err(_) => {
                log::error!("Interrupt predicate panicked, watchdog disarmed");
                None
            }
        }
    }
}

impl Drop for InterruptWatchdog {
    fn drop(&mut self) {
        self.dispose();
    }
}
