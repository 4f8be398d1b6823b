//! Response orchestration over the upstream generative API
//!
//! `backend` is the capability port, `client` the HTTP implementation,
//! `orchestrator` the exchange logic, `prompts` the persona texts and
//! prompt assembly helpers.

pub mod backend;
pub mod client;
pub mod orchestrator;
pub mod prompts;

pub use backend::{
    Content, FunctionCall, GeneratedImage, GenerateRequest, GenerateResponse, GenerativeBackend,
    Part,
};
pub use client::GeminiClient;
pub use orchestrator::Orchestrator;
