pub mod types;

pub use types::{Attachment, GroundingCitation, Message, Role, ToolResult};
