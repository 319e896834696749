//! Tool trait definition.
//!
//! A tool is three static steps: `decode` the validated arguments into its own
//! argument type, `execute` them, and `format` the typed result for the
//! conversation. The registry only ever sees the erased form.

use crate::error::ToolError;
use crate::types::{Arguments, ToolDescriptor, ToolOutput};
use async_trait::async_trait;

/// A named, schema-described operation the agent can invoke.
#[async_trait]
pub trait Tool: Send + Sync + 'static {
    /// Typed argument bundle produced by [`Tool::decode`].
    type Args: Send;

    /// Typed result produced by [`Tool::execute`].
    type Output: Into<ToolOutput> + Send;

    /// Name, description and parameter schema.
    fn descriptor(&self) -> ToolDescriptor;

    /// Build the argument bundle, applying defaults for absent optional
    /// parameters and validating enum-like values.
    fn decode(&self, args: &Arguments) -> Result<Self::Args, ToolError>;

    /// Execute the tool. May perform network I/O.
    async fn execute(&self, args: Self::Args) -> Result<Self::Output, ToolError>;

    /// Render the result for insertion into an LLM conversation.
    fn format(&self, output: &Self::Output) -> String;
}

/// Object-safe form of [`Tool`] stored by the registry.
#[async_trait]
pub(crate) trait ErasedTool: Send + Sync {
    async fn run(&self, args: &Arguments) -> Result<(ToolOutput, String), ToolError>;
}

#[async_trait]
impl<T: Tool> ErasedTool for T {
    async fn run(&self, args: &Arguments) -> Result<(ToolOutput, String), ToolError> {
        let decoded = self.decode(args)?;
        let output = self.execute(decoded).await?;
        let display = self.format(&output);
        Ok((output.into(), display))
    }
}
