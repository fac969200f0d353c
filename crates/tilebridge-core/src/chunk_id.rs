//! Chunk identifiers: the two addressing schemes a bridge can run under.
//!
//! A chunk is either named by an opaque token (legacy flat index) or by
//! axial hex coordinates. The file stem of a chunk in the store is exactly
//! the identifier's `Display` form:
//!
//!   Token("17")              -> "17.json"
//!   Axial { q: 3, r: -2 }    -> "(3, -2).json"
//!
//! The axial form is matched byte-for-byte against the store's file names.
//! Changing the spacing or punctuation here guarantees a miss.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which identifier variant a bridge instance decodes. Never mixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Addressing {
    /// `(q, r)` coordinates, always answered.
    #[default]
    Axial,
    /// Single token, legacy contract: failures are not answered.
    Index,
}

impl fmt::Display for Addressing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Addressing::Axial => f.write_str("axial"),
            Addressing::Index => f.write_str("index"),
        }
    }
}

impl std::str::FromStr for Addressing {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "axial" => Ok(Addressing::Axial),
            "index" => Ok(Addressing::Index),
            other => Err(IdError::UnknownAddressing(other.to_string())),
        }
    }
}

/// Identifies one chunk for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChunkId {
    Token(String),
    Axial { q: i32, r: i32 },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IdError {
    #[error("chunk token is empty")]
    EmptyToken,
    #[error("chunk token {0:?} is not a single path segment")]
    InvalidToken(String),
    #[error("expected a [q, r] pair or {{\"q\", \"r\"}} object, got {0}")]
    MalformedAxial(String),
    #[error("expected a string or integer token, got {0}")]
    MalformedToken(String),
    #[error("unknown addressing {0:?} (expected \"axial\" or \"index\")")]
    UnknownAddressing(String),
}

impl ChunkId {
    /// Build a token identifier, rejecting anything that is not exactly one
    /// path segment.
    pub fn token(token: impl Into<String>) -> Result<Self, IdError> {
        let token = token.into();
        validate_segment(&token)?;
        Ok(ChunkId::Token(token))
    }

    pub fn axial(q: i32, r: i32) -> Self {
        ChunkId::Axial { q, r }
    }

    /// File name of this chunk inside the store's chunk directory.
    pub fn file_name(&self) -> String {
        format!("{self}.json")
    }

    /// Decode an inbound request payload under the given addressing.
    pub fn decode(addressing: Addressing, payload: &Value) -> Result<Self, IdError> {
        match addressing {
            Addressing::Axial => decode_axial(payload),
            Addressing::Index => decode_token(payload),
        }
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkId::Token(token) => f.write_str(token),
            ChunkId::Axial { q, r } => write!(f, "({q}, {r})"),
        }
    }
}

/// A path segment must be non-empty, not a dot segment, and free of
/// separators or URL delimiters.
pub fn validate_segment(segment: &str) -> Result<(), IdError> {
    if segment.is_empty() {
        return Err(IdError::EmptyToken);
    }
    if segment == "." || segment == ".." || segment.contains(['/', '\\', '?', '#']) {
        return Err(IdError::InvalidToken(segment.to_string()));
    }
    Ok(())
}

fn decode_axial(payload: &Value) -> Result<ChunkId, IdError> {
    let malformed = || IdError::MalformedAxial(payload.to_string());

    let (q, r) = match payload {
        Value::Array(items) if items.len() == 2 => (&items[0], &items[1]),
        Value::Object(map) if map.len() == 2 => (
            map.get("q").ok_or_else(malformed)?,
            map.get("r").ok_or_else(malformed)?,
        ),
        _ => return Err(malformed()),
    };

    let coord = |v: &Value| {
        v.as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(malformed)
    };

    Ok(ChunkId::axial(coord(q)?, coord(r)?))
}

fn decode_token(payload: &Value) -> Result<ChunkId, IdError> {
    match payload {
        Value::String(s) => ChunkId::token(s.as_str()),
        Value::Number(n) if n.is_i64() || n.is_u64() => ChunkId::token(n.to_string()),
        other => Err(IdError::MalformedToken(other.to_string())),
    }
}
