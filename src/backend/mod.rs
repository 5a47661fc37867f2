//! Backend registry and backend value types.

pub mod registry;
pub mod types;

pub use registry::BackendRegistry;
pub use types::{Arguments, BackendDescriptor, BackendStatus, ToolCall};
