//! Request routing.
//!
//! [`Router`] picks a [`ModelId`](crate::ModelId) for each request from the
//! lexical and structural features of its text, plus the names of the tools
//! the caller wants to use. The indicator tables live in [`indicators`].

pub mod indicators;
mod router;

pub use indicators::{Category, IndicatorSet, Indicators};
pub use router::{Domain, DomainMatch, RouteDecision, RouteRule, Router};
