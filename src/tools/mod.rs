//! Tool adapters exposed to the agent.
//!
//! Every tool implements [`Tool`] and is registered explicitly by the
//! registry builder; there is no discovery at runtime.

pub mod encoding;
pub mod format;
pub mod math;
pub mod news;
pub mod text;
pub mod traits;
pub mod utility;
pub mod weather;

pub use encoding::{Base64EncoderTool, UuidGeneratorTool};
pub use math::{ArithmeticTool, CalculatorTool};
pub use news::{SearchNewsTool, TopHeadlinesTool};
pub use text::{AnalyzeCharacterTypesTool, AnalyzeTextTool, AnalyzeUrlTool, ExtractPatternsTool};
pub use traits::Tool;
pub use utility::{EchoTool, TimeTool};
pub use weather::{GetWeatherTool, WeatherAdviceTool};

pub(crate) use traits::ErasedTool;

use crate::error::ToolError;

/// Match `value` case-insensitively against `choices`.
pub(crate) fn parse_choice<T: Copy>(
    tool: &str,
    param: &str,
    value: &str,
    choices: &[(&str, T)],
) -> Result<T, ToolError> {
    let wanted = value.trim();
    choices
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(wanted))
        .map(|(_, choice)| *choice)
        .ok_or_else(|| ToolError::invalid_enum(tool, param, value))
}

/// Clamp a requested item count into `min..=max`.
pub(crate) fn clamp_count(requested: i64, min: u32, max: u32) -> u32 {
    requested.clamp(i64::from(min), i64::from(max)) as u32
}
