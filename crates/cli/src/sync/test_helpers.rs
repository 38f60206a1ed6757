// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use outbox_core::{Method, OperationKind, SqliteStore};
use serde_json::{json, Value};

use super::engine::SyncEngine;
use super::network::ManualNetwork;
use super::transport::{Transport, TransportError, TransportResult};

/// One call seen by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub endpoint: String,
    pub method: Method,
    pub body: Option<Value>,
}

#[derive(Default)]
struct MockState {
    calls: Mutex<Vec<RecordedCall>>,
    fail_all: AtomicBool,
    failing: Mutex<HashSet<String>>,
    delay: Mutex<Option<Duration>>,
}

/// Mock transport for testing without real sockets.
///
/// Clones share state, so a test can keep one handle while the engine owns
/// another. Every call yields to the scheduler before answering so that
/// concurrent cycles actually interleave.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<MockState>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail (or succeed again).
    pub fn fail_all(&self, fail: bool) {
        self.state.fail_all.store(fail, Ordering::SeqCst);
    }

    /// Make calls to one endpoint fail.
    pub fn fail_endpoint(&self, endpoint: &str) {
        self.state.failing.lock().unwrap().insert(endpoint.to_string());
    }

    /// Sleep this long inside every call.
    pub fn set_delay(&self, delay: Duration) {
        *self.state.delay.lock().unwrap() = Some(delay);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn endpoints(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.endpoint).collect()
    }

    pub fn call_count(&self) -> usize {
        self.state.calls.lock().unwrap().len()
    }
}

impl Transport for MockTransport {
    fn call<'a>(
        &'a self,
        endpoint: &'a str,
        method: Method,
        body: Option<&'a Value>,
    ) -> Pin<Box<dyn Future<Output = TransportResult<Option<Value>>> + Send + 'a>> {
        Box::pin(async move {
            self.state.calls.lock().unwrap().push(RecordedCall {
                endpoint: endpoint.to_string(),
                method,
                body: body.cloned(),
            });

            tokio::task::yield_now().await;
            let delay = *self.state.delay.lock().unwrap();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            let fail = self.state.fail_all.load(Ordering::SeqCst)
                || self.state.failing.lock().unwrap().contains(endpoint);
            if fail {
                Err(TransportError::Status {
                    status: 503,
                    body: format!("{endpoint} unavailable"),
                })
            } else {
                Ok(Some(json!({ "ok": true })))
            }
        })
    }
}

pub type TestEngine = SyncEngine<SqliteStore, MockTransport, Arc<ManualNetwork>>;

/// Engine over an in-memory store, a mock transport and a manual network.
pub fn make_engine(online: bool) -> (TestEngine, MockTransport, Arc<ManualNetwork>) {
    let transport = MockTransport::new();
    let network = Arc::new(if online {
        ManualNetwork::online()
    } else {
        ManualNetwork::offline()
    });
    let engine = SyncEngine::new(
        SqliteStore::open_in_memory().unwrap(),
        transport.clone(),
        Arc::clone(&network),
    );
    (engine, transport, network)
}

/// Queue a create against `endpoint` and return its id.
pub fn queue_create(engine: &TestEngine, endpoint: &str) -> String {
    engine
        .queue_operation(
            OperationKind::Create,
            endpoint,
            Method::Post,
            Some(json!({ "endpoint": endpoint })),
        )
        .unwrap()
}

/// Queue `endpoints` while offline, then bring the network back without
/// triggering anything.
pub fn queue_offline(engine: &TestEngine, network: &ManualNetwork, endpoints: &[&str]) -> Vec<String> {
    network.set_online(false);
    let ids = endpoints.iter().map(|e| queue_create(engine, e)).collect();
    network.set_online(true);
    ids
}
