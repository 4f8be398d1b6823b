//! Simulated tool surface
//!
//! Function declarations offered to the model and the executor that runs
//! the calls it makes: URL reader, profile memory, canvas/3D artifacts,
//! calendar and drive intent links, a fake remote shell, webhook relay,
//! and image generation.

pub mod declarations;
pub mod executor;
pub mod links;
pub mod ssh;

pub use declarations::declarations_for;
pub use executor::{ToolExecutor, ToolOutcome};
