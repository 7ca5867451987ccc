//! Store HTTP Protocol
//!
//! Defines the public endpoints and the JSON bodies returned by the key-value API.
//! Every route is a `GET`; parameters travel in the query string.

use serde::{Deserialize, Serialize};

// --- API Endpoints ---

/// Insert or overwrite an entry (`?key=..&value=..`).
pub const ENDPOINT_SET: &str = "/set";
/// Read the value stored under a key (`?key=..`).
pub const ENDPOINT_GET: &str = "/get";
/// Remove an entry (`?key=..`).
pub const ENDPOINT_DELETE: &str = "/delete";
/// List every key currently present.
pub const ENDPOINT_KEYS: &str = "/keys";
/// Liveness probe.
pub const ENDPOINT_HEALTH: &str = "/health";

// --- Response messages ---

pub const MSG_SET_OK: &str = "key set successfully";
pub const MSG_DELETE_OK: &str = "key deleted successfully";
pub const MSG_HEALTH_OK: &str = "OK";

pub const ERR_KEY_AND_VALUE_REQUIRED: &str = "key and value are required";
pub const ERR_KEY_REQUIRED: &str = "key is required";
pub const ERR_MALFORMED_QUERY: &str = "malformed query string";

// --- Query parameters ---

/// First value of `name` in the query, ignoring later repeats (`?key=a&key=b` yields `a`).
pub fn first_value(pairs: &[(String, String)], name: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.clone())
}

/// Query string of `/set`.
///
/// Both fields are optional so that a missing parameter and an empty one are rejected the
/// same way, with the JSON error body.
#[derive(Debug, Default, PartialEq)]
pub struct SetParams {
    pub key: Option<String>,
    pub value: Option<String>,
}

impl SetParams {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            key: first_value(pairs, "key"),
            value: first_value(pairs, "value"),
        }
    }
}

/// Query string of `/get` and `/delete`.
#[derive(Debug, Default, PartialEq)]
pub struct KeyParams {
    pub key: Option<String>,
}

impl KeyParams {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        Self {
            key: first_value(pairs, "key"),
        }
    }
}

// --- Data Transfer Objects ---

/// Acknowledgment for set, delete and health.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ValueResponse {
    pub value: String,
}

/// Key listing. Order is unspecified; an empty store yields an empty list.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct KeysResponse {
    pub keys: Vec<String>,
}

/// Body of every 4xx response.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}
