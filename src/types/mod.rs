//! Type definitions for both sides of the adapter.
//!
//! `content`, `tools` and `llm` model the agent framework's generic request
//! and response shapes. `completions` models SambaNova's chat-completions
//! wire schema.

pub mod completions;
pub mod content;
pub mod llm;
pub mod tools;
