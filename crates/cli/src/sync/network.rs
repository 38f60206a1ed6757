// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Network state sources.
//!
//! The engine only needs to know whether the remote can be reached right
//! now, and to hear about transitions. [`ManualNetwork`] is fed by the
//! embedding application; [`ProbeNetwork`] derives the state by resolving
//! and connecting to the remote host.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Connectivity as reported by a [`NetworkMonitor`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NetworkState {
    /// A network link is up.
    pub connected: bool,
    /// The remote can actually be reached over it.
    pub reachable: bool,
}

impl NetworkState {
    pub const ONLINE: NetworkState = NetworkState {
        connected: true,
        reachable: true,
    };

    pub const OFFLINE: NetworkState = NetworkState {
        connected: false,
        reachable: false,
    };

    /// Both connected and reachable.
    pub fn is_online(&self) -> bool {
        self.connected && self.reachable
    }
}

impl std::fmt::Display for NetworkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match (self.connected, self.reachable) {
            (true, true) => "online",
            (true, false) => "connected, remote unreachable",
            _ => "offline",
        };
        f.write_str(label)
    }
}

/// Source of connectivity information.
pub trait NetworkMonitor: Send + Sync {
    /// Query the state now.
    fn current_state(&self) -> Pin<Box<dyn Future<Output = NetworkState> + Send + '_>>;

    /// Receiver notified on every transition.
    fn subscribe(&self) -> watch::Receiver<NetworkState>;

    /// Last known state, without querying.
    fn snapshot(&self) -> NetworkState {
        *self.subscribe().borrow()
    }
}

impl<N: NetworkMonitor + ?Sized> NetworkMonitor for Arc<N> {
    fn current_state(&self) -> Pin<Box<dyn Future<Output = NetworkState> + Send + '_>> {
        (**self).current_state()
    }

    fn subscribe(&self) -> watch::Receiver<NetworkState> {
        (**self).subscribe()
    }

    fn snapshot(&self) -> NetworkState {
        (**self).snapshot()
    }
}

/// Store `state` and notify receivers, only if it differs from the last one.
fn publish(tx: &watch::Sender<NetworkState>, state: NetworkState) -> bool {
    tx.send_if_modified(|current| {
        if *current == state {
            false
        } else {
            *current = state;
            true
        }
    })
}

/// Network state pushed in from outside, e.g. from OS connectivity callbacks.
pub struct ManualNetwork {
    tx: watch::Sender<NetworkState>,
}

impl ManualNetwork {
    pub fn new(initial: NetworkState) -> Self {
        let (tx, _) = watch::channel(initial);
        ManualNetwork { tx }
    }

    pub fn online() -> Self {
        Self::new(NetworkState::ONLINE)
    }

    pub fn offline() -> Self {
        Self::new(NetworkState::OFFLINE)
    }

    /// Record a new state. Returns true if it was a transition.
    pub fn set_state(&self, state: NetworkState) -> bool {
        publish(&self.tx, state)
    }

    pub fn set_online(&self, online: bool) -> bool {
        let state = if online {
            NetworkState::ONLINE
        } else {
            NetworkState::OFFLINE
        };
        self.set_state(state)
    }
}

impl NetworkMonitor for ManualNetwork {
    fn current_state(&self) -> Pin<Box<dyn Future<Output = NetworkState> + Send + '_>> {
        let state = *self.tx.borrow();
        Box::pin(std::future::ready(state))
    }

    fn subscribe(&self) -> watch::Receiver<NetworkState> {
        self.tx.subscribe()
    }

    fn snapshot(&self) -> NetworkState {
        *self.tx.borrow()
    }
}

/// Network state derived by probing a remote host.
///
/// `connected` means the host name resolves; `reachable` means a TCP
/// connection to one of its addresses succeeds within the timeout.
pub struct ProbeNetwork {
    host: String,
    port: u16,
    timeout: Duration,
    tx: watch::Sender<NetworkState>,
}

impl ProbeNetwork {
    /// Starts out offline until the first probe.
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        let (tx, _) = watch::channel(NetworkState::OFFLINE);
        ProbeNetwork {
            host: host.into(),
            port,
            timeout,
            tx,
        }
    }

    /// Probe the host and port of an `http(s)` URL.
    pub fn for_url(url: &str, timeout: Duration) -> Result<Self> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|e| Error::Config(format!("invalid remote url '{url}': {e}")))?;
        let host = parsed
            .host_str()
            .ok_or_else(|| Error::Config(format!("remote url '{url}' has no host")))?;
        let port = parsed
            .port_or_known_default()
            .ok_or_else(|| Error::Config(format!("remote url '{url}' has no port")))?;
        Ok(Self::new(host.trim_matches(['[', ']']), port, timeout))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Probe once without publishing.
    pub async fn probe(&self) -> NetworkState {
        let lookup = tokio::net::lookup_host((self.host.as_str(), self.port));
        let addrs: Vec<_> = match tokio::time::timeout(self.timeout, lookup).await {
            Ok(Ok(addrs)) => addrs.collect(),
            Ok(Err(e)) => {
                tracing::debug!(host = %self.host, "name resolution failed: {e}");
                return NetworkState::OFFLINE;
            }
            Err(_) => {
                tracing::debug!(host = %self.host, "name resolution timed out");
                return NetworkState::OFFLINE;
            }
        };
        if addrs.is_empty() {
            return NetworkState::OFFLINE;
        }

        for addr in addrs {
            match tokio::time::timeout(self.timeout, TcpStream::connect(addr)).await {
                Ok(Ok(_)) => return NetworkState::ONLINE,
                Ok(Err(e)) => tracing::debug!(%addr, "connect failed: {e}"),
                Err(_) => tracing::debug!(%addr, "connect timed out"),
            }
        }
        NetworkState {
            connected: true,
            reachable: false,
        }
    }

    /// Probe once and publish the result.
    pub async fn refresh(&self) -> NetworkState {
        let state = self.probe().await;
        if publish(&self.tx, state) {
            tracing::info!(host = %self.host, port = self.port, "network {state}");
        }
        state
    }

    /// Refresh every `interval` until `cancel` fires. The first probe runs
    /// immediately.
    pub fn spawn_probe_loop(
        self: &Arc<Self>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let monitor = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        monitor.refresh().await;
                    }
                }
            }
        })
    }
}

impl NetworkMonitor for ProbeNetwork {
    fn current_state(&self) -> Pin<Box<dyn Future<Output = NetworkState> + Send + '_>> {
        Box::pin(self.refresh())
    }

    fn subscribe(&self) -> watch::Receiver<NetworkState> {
        self.tx.subscribe()
    }

    fn snapshot(&self) -> NetworkState {
        *self.tx.borrow()
    }
}
