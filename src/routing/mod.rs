//! Tool routing — explicit tool → backend mappings with capability inference.

pub mod capability;
pub mod router;

pub use capability::{CapabilityCategory, CapabilityTable};
pub use router::ToolRouter;
