use std::io::IsTerminal;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use netsweep_common::config::Config;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Cancels the token when `q` or Ctrl-C is pressed while the terminal is in
/// raw mode. Raw mode is left again when the handle is dropped.
pub struct InputHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl InputHandle {
    pub fn start(cancel: CancellationToken) -> Option<Self> {
        if let Err(err) = enable_raw_mode() {
            debug!("keyboard listener disabled: {err}");
            return None;
        }

        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        let thread = thread::spawn(move || {
            while !thread_stop.load(Ordering::Relaxed) && !cancel.is_cancelled() {
                if !event::poll(POLL_INTERVAL).unwrap_or(false) {
                    continue;
                }

                if let Ok(Event::Key(key_event)) = event::read() {
                    let is_q = key_event.code == KeyCode::Char('q');
                    let is_ctrl_c = key_event.code == KeyCode::Char('c')
                        && key_event.modifiers.contains(KeyModifiers::CONTROL);

                    if (is_q || is_ctrl_c) && key_event.kind == KeyEventKind::Press {
                        cancel.cancel();
                        break;
                    }
                }
            }
            let _ = disable_raw_mode();
        });

        Some(Self {
            stop,
            thread: Some(thread),
        })
    }
}

impl Drop for InputHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        let _ = disable_raw_mode();
    }
}

/// Wires up the ways a running operation can be stopped: Ctrl-C always, the
/// `q` key when stdin is a terminal and input is not disabled.
pub fn cancellation(cfg: &Config) -> (CancellationToken, Option<InputHandle>) {
    let cancel = CancellationToken::new();

    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_cancel.cancel();
        }
    });

    let input = if !cfg.disable_input && std::io::stdin().is_terminal() {
        InputHandle::start(cancel.clone())
    } else {
        None
    };

    (cancel, input)
}
