//! Base64 and UUID utilities.

use super::{clamp_count, parse_choice, Tool};
use crate::error::ToolError;
use crate::types::{Arguments, ParameterDescriptor, ToolDescriptor, ToolOutput};
use async_trait::async_trait;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;
use serde::Serialize;
use std::fmt::Write;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// base64_encoder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Base64Operation {
    Encode,
    Decode,
}

const BASE64_OPERATIONS: &[(&str, Base64Operation)] = &[
    ("encode", Base64Operation::Encode),
    ("decode", Base64Operation::Decode),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Base64Args {
    pub text: String,
    pub operation: Base64Operation,
    pub url_safe: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Base64Output {
    pub operation: Base64Operation,
    pub url_safe: bool,
    pub input: String,
    pub output: String,
}

impl From<Base64Output> for ToolOutput {
    fn from(output: Base64Output) -> Self {
        ToolOutput::Base64(output)
    }
}

/// Encode `text` as padded Base64.
pub fn encode(text: &str, url_safe: bool) -> String {
    if url_safe {
        URL_SAFE.encode(text)
    } else {
        STANDARD.encode(text)
    }
}

/// Decode padded Base64 back into UTF-8 text.
pub fn decode(encoded: &str, url_safe: bool) -> Result<String, String> {
    let bytes = if url_safe {
        URL_SAFE.decode(encoded)
    } else {
        STANDARD.decode(encoded)
    }
    .map_err(|e| format!("invalid Base64 input: {e}"))?;

    String::from_utf8(bytes).map_err(|_| "decoded bytes are not valid UTF-8".to_string())
}

/// Base64 encode/decode with standard or URL-safe alphabet.
pub struct Base64EncoderTool;

#[async_trait]
impl Tool for Base64EncoderTool {
    type Args = Base64Args;
    type Output = Base64Output;

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new("base64_encoder", "Encode or decode text as Base64.")
            .required(ParameterDescriptor::string("text", "Text to process"))
            .optional(ParameterDescriptor::string(
                "operation",
                "encode or decode (default encode)",
            ))
            .optional(ParameterDescriptor::boolean(
                "urlSafe",
                "Use the URL-safe alphabet (default false)",
            ))
    }

    fn decode(&self, args: &Arguments) -> Result<Base64Args, ToolError> {
        let operation = match args.string("operation") {
            Some(op) => parse_choice(args.tool(), "operation", op, BASE64_OPERATIONS)?,
            None => Base64Operation::Encode,
        };
        Ok(Base64Args {
            text: args.require_string("text")?.to_string(),
            operation,
            url_safe: args.boolean("urlSafe").unwrap_or(false),
        })
    }

    async fn execute(&self, args: Base64Args) -> Result<Base64Output, ToolError> {
        let output = match args.operation {
            Base64Operation::Encode => encode(&args.text, args.url_safe),
            Base64Operation::Decode => decode(&args.text, args.url_safe)
                .map_err(|message| ToolError::execution("base64_encoder", message))?,
        };
        Ok(Base64Output {
            operation: args.operation,
            url_safe: args.url_safe,
            input: args.text,
            output,
        })
    }

    fn format(&self, output: &Base64Output) -> String {
        let (verb, from, to) = match output.operation {
            Base64Operation::Encode => ("encoded", "Original", "Encoded"),
            Base64Operation::Decode => ("decoded", "Encoded", "Decoded"),
        };
        let alphabet = if output.url_safe { "URL-safe" } else { "standard" };

        format!(
            "Base64 {verb} ({alphabet} alphabet)\n\
             {from} ({} chars): {}\n\
             {to} ({} chars): {}",
            output.input.chars().count(),
            output.input,
            output.output.chars().count(),
            output.output,
        )
    }
}

// ---------------------------------------------------------------------------
// uuid_generator
// ---------------------------------------------------------------------------

pub const MAX_UUIDS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UuidFormat {
    Standard,
    Compact,
    Uppercase,
}

const UUID_FORMATS: &[(&str, UuidFormat)] = &[
    ("standard", UuidFormat::Standard),
    ("compact", UuidFormat::Compact),
    ("uppercase", UuidFormat::Uppercase),
];

impl UuidFormat {
    pub fn render(self, id: Uuid) -> String {
        match self {
            Self::Standard => id.hyphenated().to_string(),
            Self::Compact => id.simple().to_string(),
            Self::Uppercase => id.hyphenated().to_string().to_uppercase(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UuidArgs {
    pub count: u32,
    pub format: UuidFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UuidBatch {
    pub format: UuidFormat,
    pub uuids: Vec<String>,
}

impl From<UuidBatch> for ToolOutput {
    fn from(output: UuidBatch) -> Self {
        ToolOutput::Uuids(output)
    }
}

/// Random (v4) UUID generator; `count` is clamped to 1..=10.
pub struct UuidGeneratorTool;

#[async_trait]
impl Tool for UuidGeneratorTool {
    type Args = UuidArgs;
    type Output = UuidBatch;

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new("uuid_generator", "Generate random UUIDs.")
            .optional(ParameterDescriptor::integer(
                "count",
                "How many UUIDs to generate, 1 to 10 (default 1)",
            ))
            .optional(ParameterDescriptor::string(
                "format",
                "standard, compact (no hyphens) or uppercase (default standard)",
            ))
    }

    fn decode(&self, args: &Arguments) -> Result<UuidArgs, ToolError> {
        let format = match args.string("format") {
            Some(format) => parse_choice(args.tool(), "format", format, UUID_FORMATS)?,
            None => UuidFormat::Standard,
        };
        Ok(UuidArgs {
            count: clamp_count(args.integer("count").unwrap_or(1), 1, MAX_UUIDS),
            format,
        })
    }

    async fn execute(&self, args: UuidArgs) -> Result<UuidBatch, ToolError> {
        let uuids = (0..args.count)
            .map(|_| args.format.render(Uuid::new_v4()))
            .collect();
        Ok(UuidBatch {
            format: args.format,
            uuids,
        })
    }

    fn format(&self, output: &UuidBatch) -> String {
        let mut out = format!("Generated {} UUID(s):", output.uuids.len());
        for (i, id) in output.uuids.iter().enumerate() {
            let _ = write!(out, "\n{}. {}", i + 1, id);
        }
        out
    }
}
