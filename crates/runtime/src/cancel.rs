//! Per-conversation cancellation tokens.
//!
//! Each running turn gets a `CancelToken`. Calling `cancel()` on it signals
//! the turn loop to stop cleanly at the next checkpoint: before the next
//! completion request, between stream events, and before each tool dispatch.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// A cancellation token that can be checked by the turn loop.
#[derive(Clone)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Signal cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Check if cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks active cancellation tokens per conversation.
pub struct CancelMap {
    tokens: Mutex<HashMap<String, CancelToken>>,
}

impl Default for CancelMap {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelMap {
    pub fn new() -> Self {
        Self {
            tokens: Mutex::new(HashMap::new()),
        }
    }

    /// Create and register a new cancel token for a conversation.
    ///
    /// Registering again for the same conversation replaces the old token;
    /// a turn still holding the old one keeps its own clone.
    pub fn register(&self, conversation_id: &str) -> CancelToken {
        let token = CancelToken::new();
        self.tokens
            .lock()
            .insert(conversation_id.to_owned(), token.clone());
        token
    }

    /// Cancel the running turn for a conversation. Returns true if a token
    /// was found.
    pub fn cancel(&self, conversation_id: &str) -> bool {
        if let Some(token) = self.tokens.lock().get(conversation_id) {
            token.cancel();
            true
        } else {
            false
        }
    }

    /// Remove the token for a conversation (called when a turn completes).
    pub fn remove(&self, conversation_id: &str) {
        self.tokens.lock().remove(conversation_id);
    }

    /// Check if a conversation has an active (running) turn.
    pub fn is_running(&self, conversation_id: &str) -> bool {
        self.tokens.lock().contains_key(conversation_id)
    }
}
