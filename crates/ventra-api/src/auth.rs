// SPDX-FileCopyrightText: 2026 Ventra Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide re-authentication signal.
//!
//! Any REST call that comes back 401 raises the signal instead of failing
//! silently; an external UI collaborator (the re-auth dialog) observes it
//! and starts the login flow. The signal is a monotonic counter so late
//! subscribers still see that a raise happened.

use std::sync::Arc;

use tokio::sync::watch;

/// Shared handle used to raise and observe the re-authentication signal.
#[derive(Debug, Clone)]
pub struct AuthSignal {
    tx: Arc<watch::Sender<u64>>,
}

impl AuthSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    /// Raise the signal. Every live listener wakes up.
    pub fn raise(&self) {
        self.tx.send_modify(|n| *n += 1);
    }

    /// Number of times the signal has been raised so far.
    pub fn raised(&self) -> u64 {
        *self.tx.subscribe().borrow()
    }

    /// Subscribe for future raises.
    pub fn subscribe(&self) -> AuthSignalListener {
        AuthSignalListener {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for AuthSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// One observer of the re-authentication signal.
pub struct AuthSignalListener {
    rx: watch::Receiver<u64>,
}

impl AuthSignalListener {
    /// Wait until the signal is raised again. Returns `false` if the signal
    /// handle was dropped.
    pub async fn triggered(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn raise_wakes_listener() {
        let signal = AuthSignal::new();
        let mut listener = signal.subscribe();

        signal.raise();
        assert!(listener.triggered().await);
        assert_eq!(signal.raised(), 1);
    }

    #[tokio::test]
    async fn raises_accumulate() {
        let signal = AuthSignal::new();
        signal.raise();
        signal.raise();
        assert_eq!(signal.raised(), 2);
    }
}
