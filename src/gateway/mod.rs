//! Gateway composition

mod builder;
mod service;

pub use builder::{Heimdall, HeimdallBuilder};
pub use service::Gateway;
