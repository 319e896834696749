//! Echo and clock tools.

use super::{parse_choice, Tool};
use crate::error::ToolError;
use crate::types::{Arguments, ParameterDescriptor, ToolDescriptor, ToolOutput};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::info;

// ---------------------------------------------------------------------------
// echo
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EchoOutput {
    pub message: String,
}

impl From<EchoOutput> for ToolOutput {
    fn from(output: EchoOutput) -> Self {
        ToolOutput::Echo(output)
    }
}

/// Returns its message unchanged.
pub struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    type Args = String;
    type Output = EchoOutput;

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new("echo", "Echo a message back to the caller.")
            .required(ParameterDescriptor::string("message", "The message to echo"))
    }

    fn decode(&self, args: &Arguments) -> Result<String, ToolError> {
        Ok(args.require_string("message")?.to_string())
    }

    async fn execute(&self, message: String) -> Result<EchoOutput, ToolError> {
        info!("Echo: {}", message);
        Ok(EchoOutput { message })
    }

    fn format(&self, output: &EchoOutput) -> String {
        format!("Echo: {}", output.message)
    }
}

// ---------------------------------------------------------------------------
// time
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFormat {
    Iso,
    Unix,
    Millis,
}

const TIME_FORMATS: &[(&str, TimeFormat)] = &[
    ("iso", TimeFormat::Iso),
    ("unix", TimeFormat::Unix),
    ("millis", TimeFormat::Millis),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeOutput {
    pub format: TimeFormat,
    pub timestamp: DateTime<Utc>,
    pub value: String,
}

impl TimeOutput {
    pub fn at(format: TimeFormat, timestamp: DateTime<Utc>) -> Self {
        let value = match format {
            TimeFormat::Iso => timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            TimeFormat::Unix => timestamp.timestamp().to_string(),
            TimeFormat::Millis => timestamp.timestamp_millis().to_string(),
        };
        Self {
            format,
            timestamp,
            value,
        }
    }
}

impl From<TimeOutput> for ToolOutput {
    fn from(output: TimeOutput) -> Self {
        ToolOutput::Time(output)
    }
}

/// Reports the current UTC time.
pub struct TimeTool;

#[async_trait]
impl Tool for TimeTool {
    type Args = TimeFormat;
    type Output = TimeOutput;

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new("time", "Get the current time.").optional(ParameterDescriptor::string(
            "format",
            "Output format: iso, unix or millis (default iso)",
        ))
    }

    fn decode(&self, args: &Arguments) -> Result<TimeFormat, ToolError> {
        match args.string("format") {
            Some(format) => parse_choice(args.tool(), "format", format, TIME_FORMATS),
            None => Ok(TimeFormat::Iso),
        }
    }

    async fn execute(&self, format: TimeFormat) -> Result<TimeOutput, ToolError> {
        Ok(TimeOutput::at(format, Utc::now()))
    }

    fn format(&self, output: &TimeOutput) -> String {
        let label = match output.format {
            TimeFormat::Iso => "ISO format",
            TimeFormat::Unix => "Unix timestamp",
            TimeFormat::Millis => "Milliseconds",
        };
        format!("Current time ({label}): {}", output.value)
    }
}
