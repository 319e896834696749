//! Toolbelt: a typed tool registry and invocation layer for LLM agents.
//!
//! Tools are registered explicitly against the [`tools::Tool`] trait and
//! invoked by name with a raw JSON argument map. The registry validates and
//! coerces arguments, runs the tool and returns a typed result together with
//! a display string ready for the conversation.

pub mod cache;
pub mod config;
pub mod error;
pub mod registry;
pub mod tools;
pub mod types;
pub mod upstream;

pub use error::{BuildError, ToolError};
pub use registry::{RegistryBuilder, ToolRegistry};
pub use types::{ToolDescriptor, ToolInvocation, ToolOutput};
