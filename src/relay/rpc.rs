//! JSON-RPC response wire types.
//!
//! Only the response side is modelled: the request body is forwarded to the
//! target untouched, so the crate never needs to understand it beyond the
//! batch sniffing done in [`super::classify`].
use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A JSON-RPC identifier.
///
/// The wire type is preserved: a numeric id re-serializes as a number and a
/// string id as a string. Any other JSON type is rejected during parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RpcId {
    Number(i64),
    String(String),
}

impl fmt::Display for RpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcId::Number(value) => write!(f, "{value}"),
            RpcId::String(value) => f.write_str(value),
        }
    }
}

impl From<i64> for RpcId {
    fn from(value: i64) -> Self {
        RpcId::Number(value)
    }
}

impl From<&str> for RpcId {
    fn from(value: &str) -> Self {
        RpcId::String(value.to_owned())
    }
}

impl Serialize for RpcId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            RpcId::Number(value) => serializer.serialize_i64(*value),
            RpcId::String(value) => serializer.serialize_str(value),
        }
    }
}

struct RpcIdVisitor;

impl Visitor<'_> for RpcIdVisitor {
    type Value = RpcId;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a JSON-RPC id (string or integer)")
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(RpcId::Number(value))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        i64::try_from(value)
            .map(RpcId::Number)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(value), &self))
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(RpcId::String(value.to_owned()))
    }

    fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(RpcId::String(value))
    }
}

impl<'de> Deserialize<'de> for RpcId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RpcIdVisitor)
    }
}

/// The `error` member of a JSON-RPC response.
///
/// Upstreams disagree on the shape: most send `{"code": .., "message": ..}`
/// but some reply with a bare string. Anything else fails the parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcError {
    Structured {
        #[serde(default)]
        code: i64,
        #[serde(default)]
        message: String,
    },
    Message(String),
}

impl RpcError {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            RpcError::Structured { message, .. } | RpcError::Message(message) => message,
        }
    }

    /// An error object with an empty message is treated as "no error".
    #[must_use]
    pub fn is_failure(&self) -> bool {
        !self.message().is_empty()
    }

    /// Reason text used as the error histogram key.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            RpcError::Structured { code, message } => {
                format!("code: {code}, message: {message}")
            }
            RpcError::Message(message) => format!("message: {message}"),
        }
    }
}

/// One JSON-RPC response object, either standalone or as a batch item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<RpcId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    /// The error carried by this response, if it counts as a failure.
    #[must_use]
    pub fn failure(&self) -> Option<&RpcError> {
        self.error.as_ref().filter(|error| error.is_failure())
    }
}
