//! Tool descriptors

use serde::{Deserialize, Serialize};

/// A tool the caller intends to make available to the model.
///
/// Only the name is inspected (to spot search/browsing tools during routing);
/// heimdall never invokes tools.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl From<&str> for ToolDescriptor {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ToolDescriptor {
    fn from(name: String) -> Self {
        Self { name }
    }
}
