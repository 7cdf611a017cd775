//! Backend model identifiers.
//!
//! The set of models a request can be routed to is closed: every routing
//! decision yields one of the [`ModelId`] variants, and any string coming in
//! from configuration must parse into one of them or be rejected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::HeimdallError;

/// One of the backend model variants a request can be routed to.
///
/// Serializes as the backend wire id (e.g. `"compound-beta"`) so it works both
/// as a JSON value and as a JSON object key in `BTreeMap<ModelId, _>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModelId {
    /// Fast, cheap default for simple requests.
    #[default]
    Fast,
    /// General capability model for structurally complex requests, and for
    /// web-search requests that also carry tools.
    General,
    /// Web-search-capable model. Does not support caller-supplied tools.
    WebSearch,
    /// Lightweight specialized reasoning model (coding, math, science).
    SpecialistLight,
    /// High-capability specialized reasoning model for heavy domain work.
    SpecialistHeavy,
}

impl ModelId {
    /// Every model variant.
    pub const ALL: [ModelId; 5] = [
        Self::Fast,
        Self::General,
        Self::WebSearch,
        Self::SpecialistLight,
        Self::SpecialistHeavy,
    ];

    /// Backend wire id, passed verbatim as the model parameter of the remote API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "llama-3.1-8b-instant",
            Self::General => "llama-3.3-70b-versatile",
            Self::WebSearch => "compound-beta",
            Self::SpecialistLight => "qwen/qwen3-32b",
            Self::SpecialistHeavy => "deepseek-r1-distill-llama-70b",
        }
    }

    /// Whether this model accepts caller-supplied tools alongside the request.
    pub fn supports_tools(&self) -> bool {
        !matches!(self, Self::WebSearch)
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = HeimdallError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| HeimdallError::UnknownModel(s.to_string()))
    }
}

impl Serialize for ModelId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ModelId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
