//! Service implementations for the SambaNova API.

mod completions;

pub use completions::CompletionsService;
