use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::warn;

use crate::error::{AppError, AppResult};

/// Cooperative interrupt flag shared across a run.
///
/// Workflows call [`CancelToken::checkpoint`] between top-level steps. An
/// in-flight external call is never killed; the interrupt takes effect at
/// the next step boundary.
#[derive(Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a token wired to Ctrl-C. Must be called inside a tokio runtime.
    pub fn install() -> Self {
        let token = Self::new();
        let handle = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received, stopping after the current step");
                handle.cancel();
            }
        });
        token
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub fn checkpoint(&self) -> AppResult<()> {
        if self.is_cancelled() {
            Err(AppError::Interrupted)
        } else {
            Ok(())
        }
    }
}
