// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Network reachability as seen by the sync queue.

use std::sync::Arc;

use tokio::sync::watch;

/// A reachability snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NetworkState {
    pub is_connected: bool,
}

impl NetworkState {
    pub fn online() -> Self {
        NetworkState { is_connected: true }
    }

    pub fn offline() -> Self {
        NetworkState {
            is_connected: false,
        }
    }
}

/// Source of connectivity state and change notifications.
///
/// Rapid changes may be coalesced; subscribers always see the latest state.
pub trait ConnectivityObserver: Send + Sync {
    fn current_state(&self) -> NetworkState;

    fn subscribe(&self) -> watch::Receiver<NetworkState>;
}

/// A connectivity source driven by the embedding application.
#[derive(Debug, Clone)]
pub struct ConnectivityMonitor {
    state: Arc<watch::Sender<NetworkState>>,
}

impl ConnectivityMonitor {
    pub fn new(initial: NetworkState) -> Self {
        let (state, _) = watch::channel(initial);
        ConnectivityMonitor {
            state: Arc::new(state),
        }
    }

    /// Publishes a new state. Unchanged states are not broadcast.
    pub fn set_connected(&self, is_connected: bool) {
        self.state.send_if_modified(|state| {
            let changed = state.is_connected != is_connected;
            state.is_connected = is_connected;
            changed
        });
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        ConnectivityMonitor::new(NetworkState::offline())
    }
}

impl ConnectivityObserver for ConnectivityMonitor {
    fn current_state(&self) -> NetworkState {
        *self.state.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<NetworkState> {
        self.state.subscribe()
    }
}

#[cfg(test)]
#[path = "connectivity_tests.rs"]
mod tests;
