//! Ask a chat model to describe a text passage, flag the tokens it was least
//! sure about, and have it reflect on them.

pub mod llm;
pub mod tools;
pub mod uncertainty;
pub mod reflection;
pub mod report;
pub mod message;
pub mod config;
pub mod error;
pub mod prelude;
