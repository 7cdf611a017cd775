//! Public types for the Heimdall API.

mod model;
mod response;
mod tool;

pub use model::ModelId;
pub use response::{BackendRequest, BackendResponse, GatewayReply};
pub use tool::ToolDescriptor;
