// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pending operations: remote mutations waiting to be replayed.
//!
//! A [`NewOperation`] is what a caller hands to the queue. The queue turns it
//! into a [`PendingOperation`] by assigning an id, a creation timestamp and a
//! zero retry counter. Operations are ordered by `created_at`, which is the
//! order they are replayed in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Semantic tag describing what the mutation does to the remote resource.
///
/// Not used by the queue mechanics; carried so callers can describe
/// pending work (and evicted work) to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Create,
    Update,
    Delete,
}

impl OperationKind {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Create => "create",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "create" => Ok(OperationKind::Create),
            "update" => Ok(OperationKind::Update),
            "delete" => Ok(OperationKind::Delete),
            _ => Err(Error::InvalidKind(s.to_string())),
        }
    }
}

/// Verb used when the operation is replayed against the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Returns the canonical (uppercase) verb.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            _ => Err(Error::InvalidMethod(s.to_string())),
        }
    }
}

/// A mutation as submitted by a caller, before it has been queued.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOperation {
    pub kind: OperationKind,
    pub endpoint: String,
    pub method: Method,
    pub payload: Option<Value>,
}

impl NewOperation {
    /// Creates a new operation without a body.
    pub fn new(kind: OperationKind, endpoint: impl Into<String>, method: Method) -> Self {
        NewOperation {
            kind,
            endpoint: endpoint.into(),
            method,
            payload: None,
        }
    }

    /// Attaches a JSON body to the operation.
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// A queued mutation awaiting replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingOperation {
    /// Unique identifier assigned at enqueue time.
    pub id: String,
    pub kind: OperationKind,
    /// Logical remote resource path.
    pub endpoint: String,
    pub method: Method,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    /// Number of failed replay attempts so far. Only ever increases.
    #[serde(default)]
    pub retry_count: u32,
    /// When the operation was queued. Defines replay order.
    pub created_at: DateTime<Utc>,
}

impl PendingOperation {
    /// Builds a freshly queued entry from a caller's operation.
    pub fn from_new(id: String, op: NewOperation, created_at: DateTime<Utc>) -> Self {
        PendingOperation {
            id,
            kind: op.kind,
            endpoint: op.endpoint,
            method: op.method,
            payload: op.payload,
            retry_count: 0,
            created_at,
        }
    }
}

/// Sorts operations into replay order.
///
/// The sort is stable, so entries sharing a timestamp keep the order they
/// were given in (storage order).
pub fn sort_fifo(ops: &mut [PendingOperation]) {
    ops.sort_by_key(|op| op.created_at);
}

#[cfg(test)]
#[path = "op_tests.rs"]
mod tests;
