use anyhow::Result;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::process;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

// Cross-platform signal handling
#[cfg(unix)]
use signal_hook::{consts::SIGINT, consts::SIGTERM, iterator::Signals};

#[cfg(windows)]
use signal_hook::{consts::SIGINT, flag};

/// Standard Unix exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidUsage = 2,
    SignalInt = 130,  // 128 + SIGINT (2)
    SignalTerm = 143, // 128 + SIGTERM (15)
}

impl ExitCode {
    pub fn exit(self) -> ! {
        process::exit(self as i32)
    }
}

/// Which signal, if any, asked the run to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    None = 0,
    Int = 1,
    Term = 2,
}

static LAST_INTERRUPT: AtomicU8 = AtomicU8::new(Interrupt::None as u8);

pub fn last_interrupt() -> Interrupt {
    match LAST_INTERRUPT.load(Ordering::Relaxed) {
        1 => Interrupt::Int,
        2 => Interrupt::Term,
        _ => Interrupt::None,
    }
}

fn record_interrupt(kind: Interrupt) {
    LAST_INTERRUPT.store(kind as u8, Ordering::Relaxed);
}

/// Cooperative cancellation flag shared by the caller and every worker.
///
/// Cloning shares the same state. `cancel` sets the flag and closes the
/// notification channel, so every thread blocked in a `select!` on
/// [`CancellationToken::notified`] wakes up at once.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    inner: Arc<TokenInner>,
}

#[derive(Debug)]
struct TokenInner {
    cancelled: AtomicBool,
    // Dropped on cancel; never used to send
    notify_tx: Mutex<Option<Sender<()>>>,
    notify_rx: Receiver<()>,
}

impl CancellationToken {
    pub fn new() -> Self {
        let (tx, rx) = bounded(0);
        Self {
            inner: Arc::new(TokenInner {
                cancelled: AtomicBool::new(false),
                notify_tx: Mutex::new(Some(tx)),
                notify_rx: rx,
            }),
        }
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        let mut guard = match self.inner.notify_tx.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.take();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Receiver that becomes disconnected once the token is cancelled
    pub fn notified(&self) -> Receiver<()> {
        self.inner.notify_rx.clone()
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Signal handler for graceful shutdown.
///
/// The first SIGINT/SIGTERM cancels the token so ingestion drains and a
/// partial report is written; a second one exits immediately.
pub struct SignalHandler {
    _handle: thread::JoinHandle<()>,
}

impl SignalHandler {
    /// Initialize signal handling - cross-platform
    pub fn new(token: CancellationToken) -> Result<Self> {
        #[cfg(unix)]
        {
            let mut signals = Signals::new([SIGINT, SIGTERM])?;

            let handle = thread::spawn(move || {
                let mut shutdown_count = 0;
                for sig in signals.forever() {
                    let (kind, code) = match sig {
                        SIGINT => (Interrupt::Int, ExitCode::SignalInt),
                        SIGTERM => (Interrupt::Term, ExitCode::SignalTerm),
                        _ => continue,
                    };
                    shutdown_count += 1;
                    record_interrupt(kind);
                    if shutdown_count > 1 {
                        code.exit();
                    }
                    tracing::warn!(
                        signal = sig,
                        "shutdown signal received, finishing in-flight files and saving partial results"
                    );
                    token.cancel();
                }
            });

            Ok(SignalHandler { _handle: handle })
        }

        #[cfg(windows)]
        {
            // Windows signal handling using flag-based approach
            let term_flag = Arc::new(AtomicBool::new(false));
            flag::register(SIGINT, Arc::clone(&term_flag))?;

            let handle = thread::spawn(move || {
                let mut shutdown_count = 0;
                loop {
                    thread::sleep(std::time::Duration::from_millis(100));
                    if term_flag.swap(false, Ordering::Relaxed) {
                        shutdown_count += 1;
                        record_interrupt(Interrupt::Int);
                        if shutdown_count > 1 {
                            ExitCode::SignalInt.exit();
                        }
                        tracing::warn!("interrupt received, saving partial results");
                        token.cancel();
                    }
                }
            });

            Ok(SignalHandler { _handle: handle })
        }
    }
}

/// Exit code for a signal that stopped the run
pub fn exit_code_for_interrupt(interrupt: Interrupt) -> ExitCode {
    match interrupt {
        Interrupt::None => ExitCode::Success,
        Interrupt::Int => ExitCode::SignalInt,
        Interrupt::Term => ExitCode::SignalTerm,
    }
}

/// Exit code for a run that wrote its report. A signal that arrived after
/// every file was read cut nothing short, so it does not change the code.
pub fn exit_code_for_run(partial: bool, interrupt: Interrupt) -> ExitCode {
    if partial {
        exit_code_for_interrupt(interrupt)
    } else {
        ExitCode::Success
    }
}
