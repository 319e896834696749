//! Tool registry: an immutable name → tool table with a uniform invocation
//! pipeline.
//!
//! `invoke` runs, in order: lookup, required-parameter check, unknown-key
//! policy, type coercion, then the tool's own decode/execute/format steps.
//! Caller-input errors are therefore reported before any tool code runs.

mod coerce;

use crate::config::ToolbeltConfig;
use crate::error::{BuildError, ToolError};
use crate::tools::{
    AnalyzeCharacterTypesTool, AnalyzeTextTool, AnalyzeUrlTool, ArithmeticTool, Base64EncoderTool,
    CalculatorTool, EchoTool, ErasedTool, ExtractPatternsTool, GetWeatherTool, SearchNewsTool, TimeTool,
    Tool, TopHeadlinesTool, UuidGeneratorTool, WeatherAdviceTool,
};
use crate::types::{Arguments, ToolDescriptor, ToolInvocation};
use crate::upstream::{Fetch, NewsClient, WeatherClient};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

struct Entry {
    descriptor: ToolDescriptor,
    tool: Box<dyn ErasedTool>,
}

/// Read-only table of registered tools, safe to share across tasks.
pub struct ToolRegistry {
    entries: IndexMap<String, Entry>,
    strict: bool,
}

impl ToolRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Descriptors in registration order. Each call starts a fresh pass.
    pub fn list_tools(&self) -> impl Iterator<Item = &ToolDescriptor> + '_ {
        self.entries.values().map(|e| &e.descriptor)
    }

    pub fn descriptor(&self, name: &str) -> Option<&ToolDescriptor> {
        self.entries.get(name).map(|e| &e.descriptor)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Invoke `name` with a raw JSON argument object.
    pub async fn invoke(&self, name: &str, raw: &Map<String, Value>) -> Result<ToolInvocation, ToolError> {
        let entry = self.entries.get(name).ok_or_else(|| ToolError::UnknownTool { name: name.into() })?;

        debug!("Invoking tool: {}", name);
        let result = match decode_arguments(&entry.descriptor, raw, self.strict) {
            Ok(args) => entry.tool.run(&args).await,
            Err(e) => Err(e),
        };

        match result {
            Ok((raw, display)) => {
                info!("Tool {} completed", name);
                Ok(ToolInvocation {
                    tool_name: name.to_string(),
                    raw,
                    display,
                })
            }
            Err(e) => {
                warn!("Tool {} failed: {}", name, e);
                Err(e)
            }
        }
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.entries.keys().collect::<Vec<_>>())
            .field("strict", &self.strict)
            .finish()
    }
}

/// Check required parameters, apply the unknown-key policy and coerce every
/// declared argument to its declared type.
fn decode_arguments(
    descriptor: &ToolDescriptor,
    raw: &Map<String, Value>,
    strict: bool,
) -> Result<Arguments, ToolError> {
    let tool = descriptor.name.as_str();

    if let Some(missing) = descriptor
        .required_parameters
        .iter()
        .find(|p| raw.get(&p.name).map_or(true, Value::is_null))
    {
        return Err(ToolError::MissingRequiredParameter {
            tool: tool.into(),
            param: missing.name.clone(),
        });
    }

    let mut args = Arguments::new(tool);
    for (key, value) in raw {
        let Some((param, _)) = descriptor.parameter(key) else {
            if strict {
                return Err(ToolError::UnexpectedParameter {
                    tool: tool.into(),
                    param: key.clone(),
                });
            }
            debug!("Ignoring undeclared argument '{}' for tool {}", key, tool);
            continue;
        };
        if value.is_null() {
            continue;
        }

        let coerced = coerce::coerce(value, param.param_type).map_err(|actual| ToolError::TypeMismatch {
            tool: tool.into(),
            param: key.clone(),
            expected: param.param_type,
            actual,
        })?;
        args.insert(key, coerced);
    }
    Ok(args)
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Assembles a [`ToolRegistry`]; registration is only possible here.
#[derive(Default)]
pub struct RegistryBuilder {
    entries: IndexMap<String, Entry>,
    strict: bool,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject arguments that no parameter declares.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn register<T: Tool>(mut self, tool: T) -> Result<Self, BuildError> {
        let descriptor = tool.descriptor();

        {
            let mut seen = HashSet::new();
            if let Some(dup) = descriptor.parameters().find(|p| !seen.insert(p.name.as_str())) {
                return Err(BuildError::DuplicateParameter {
                    tool: descriptor.name.clone(),
                    param: dup.name.clone(),
                });
            }
        }
        if self.entries.contains_key(&descriptor.name) {
            return Err(BuildError::DuplicateTool(descriptor.name));
        }

        debug!("Registered tool: {}", descriptor.name);
        self.entries.insert(
            descriptor.name.clone(),
            Entry {
                descriptor,
                tool: Box::new(tool),
            },
        );
        Ok(self)
    }

    /// Tools that need no network access.
    pub fn with_local_tools(self) -> Result<Self, BuildError> {
        self.register(EchoTool)?
            .register(TimeTool)?
            .register(CalculatorTool)?
            .register(ArithmeticTool)?
            .register(Base64EncoderTool)?
            .register(UuidGeneratorTool)?
            .register(AnalyzeTextTool)?
            .register(ExtractPatternsTool)?
            .register(AnalyzeCharacterTypesTool)
    }

    /// Tools that fetch arbitrary public pages.
    pub fn with_web_tools(self, fetch: Arc<dyn Fetch>) -> Result<Self, BuildError> {
        self.register(AnalyzeUrlTool::new(fetch))
    }

    /// Weather and news tools. Both credentials are checked before anything
    /// is registered.
    pub fn with_provider_tools(self, config: &ToolbeltConfig, fetch: Arc<dyn Fetch>) -> Result<Self, BuildError> {
        config.validate_api_keys()?;

        let weather = Arc::new(WeatherClient::new(&config.weather, fetch.clone()));
        let news = Arc::new(NewsClient::new(&config.news, fetch));

        self.register(GetWeatherTool::new(weather.clone()))?
            .register(WeatherAdviceTool::new(weather))?
            .register(SearchNewsTool::new(news.clone()))?
            .register(TopHeadlinesTool::new(news, &config.news.default_country))
    }

    pub fn build(self) -> ToolRegistry {
        info!("Tool registry ready with {} tools", self.entries.len());
        ToolRegistry {
            entries: self.entries,
            strict: self.strict,
        }
    }
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("tools", &self.entries.keys().collect::<Vec<_>>())
            .field("strict", &self.strict)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ParamType, ParameterDescriptor, ToolOutput};
    use crate::upstream::testing::ScriptedFetch;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    /// Records the arguments it was decoded with.
    struct Sample {
        params: Vec<ParameterDescriptor>,
    }

    #[async_trait]
    impl Tool for Sample {
        type Args = String;
        type Output = crate::tools::utility::EchoOutput;

        fn descriptor(&self) -> ToolDescriptor {
            let mut desc = ToolDescriptor::new("sample", "test tool");
            for p in &self.params {
                desc = desc.required(p.clone());
            }
            desc
        }

        fn decode(&self, args: &Arguments) -> Result<String, ToolError> {
            Ok(format!("{} args", args.len()))
        }

        async fn execute(&self, message: String) -> Result<Self::Output, ToolError> {
            Ok(crate::tools::utility::EchoOutput { message })
        }

        fn format(&self, output: &Self::Output) -> String {
            output.message.clone()
        }
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn local(strict: bool) -> ToolRegistry {
        RegistryBuilder::new().strict(strict).with_local_tools().unwrap().build()
    }

    #[test]
    fn lists_tools_in_registration_order() {
        let registry = local(false);
        let names: Vec<_> = registry.list_tools().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "echo",
                "time",
                "calculator",
                "arithmetic",
                "base64_encoder",
                "uuid_generator",
                "analyze_text",
                "extract_patterns",
                "analyze_character_types",
            ]
        );
        assert_eq!(registry.list_tools().count(), registry.len());
    }

    #[test]
    fn duplicate_tool_name_is_rejected() {
        let err = RegistryBuilder::new().register(EchoTool).unwrap().register(EchoTool).unwrap_err();
        assert_eq!(err, BuildError::DuplicateTool("echo".into()));
    }

    #[test]
    fn duplicate_parameter_is_rejected() {
        let sample = Sample {
            params: vec![
                ParameterDescriptor::string("x", "first"),
                ParameterDescriptor::integer("x", "again"),
            ],
        };
        let err = RegistryBuilder::new().register(sample).unwrap_err();
        assert_eq!(
            err,
            BuildError::DuplicateParameter {
                tool: "sample".into(),
                param: "x".into(),
            }
        );
    }

    #[test]
    fn provider_tools_require_credentials() {
        let fetch: Arc<dyn Fetch> = Arc::new(ScriptedFetch::new());
        let err = RegistryBuilder::new()
            .with_provider_tools(&ToolbeltConfig::default(), fetch)
            .err();
        assert_matches!(err, Some(BuildError::MissingCredential { provider: "OpenWeather", .. }));
    }

    #[test]
    fn provider_tools_register_with_credentials() {
        let mut config = ToolbeltConfig::default();
        config.weather.api_key = "w".into();
        config.news.api_key = "n".into();
        let fetch: Arc<dyn Fetch> = Arc::new(ScriptedFetch::new());

        let registry = RegistryBuilder::new()
            .with_provider_tools(&config, fetch)
            .unwrap()
            .build();
        assert!(registry.contains("get_weather"));
        assert!(registry.contains("get_weather_with_advice"));
        assert!(registry.contains("search_news"));
        assert!(registry.contains("get_top_headlines"));
    }

    #[tokio::test]
    async fn unknown_tool_is_reported() {
        let err = local(false).invoke("nonexistent_tool", &Map::new()).await.unwrap_err();
        assert_eq!(err, ToolError::UnknownTool { name: "nonexistent_tool".into() });
    }

    #[tokio::test]
    async fn first_missing_required_parameter_is_named() {
        let registry = local(false);
        let err = registry.invoke("calculator", &object(json!({"b": 1}))).await.unwrap_err();
        assert_eq!(
            err,
            ToolError::MissingRequiredParameter {
                tool: "calculator".into(),
                param: "a".into(),
            }
        );

        let err = registry
            .invoke("calculator", &object(json!({"a": null, "b": 1})))
            .await
            .unwrap_err();
        assert_matches!(err, ToolError::MissingRequiredParameter { ref param, .. } if param == "a");
    }

    #[tokio::test]
    async fn coerces_strings_and_reports_type_mismatch() {
        let registry = local(false);
        let ok = registry
            .invoke("calculator", &object(json!({"a": "42", "b": 58, "operation": "ADD"})))
            .await
            .unwrap();
        assert_matches!(ok.raw, ToolOutput::Calculation(ref c) if c.result == 100.0);

        let err = registry
            .invoke("calculator", &object(json!({"a": "forty", "b": 1})))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ToolError::TypeMismatch {
                tool: "calculator".into(),
                param: "a".into(),
                expected: ParamType::Double,
                actual: "\"forty\"".into(),
            }
        );
    }

    #[tokio::test]
    async fn unknown_keys_are_ignored_unless_strict() {
        let args = object(json!({"message": "hi", "volume": 11}));

        let lenient = local(false).invoke("echo", &args).await.unwrap();
        assert_eq!(lenient.display, "Echo: hi");

        let err = local(true).invoke("echo", &args).await.unwrap_err();
        assert_eq!(
            err,
            ToolError::UnexpectedParameter {
                tool: "echo".into(),
                param: "volume".into(),
            }
        );
    }

    #[tokio::test]
    async fn undeclared_keys_never_reach_the_tool() {
        let registry = RegistryBuilder::new()
            .register(Sample {
                params: vec![ParameterDescriptor::string("x", "only")],
            })
            .unwrap()
            .build();

        let out = registry
            .invoke("sample", &object(json!({"x": "1", "y": 2, "z": null})))
            .await
            .unwrap();
        assert_eq!(out.display, "1 args");
        assert_eq!(out.tool_name, "sample");
    }

    #[tokio::test]
    async fn caller_errors_precede_any_fetch() {
        let fetch = Arc::new(ScriptedFetch::new());
        let registry = RegistryBuilder::new()
            .with_web_tools(fetch.clone())
            .unwrap()
            .build();

        let err = registry.invoke("analyze_url", &Map::new()).await.unwrap_err();
        assert!(err.is_caller_error());
        let err = registry
            .invoke("analyze_url", &object(json!({"url": "file:///etc/passwd"})))
            .await
            .unwrap_err();
        assert!(err.is_caller_error());
        assert_eq!(fetch.request_count(), 0);
    }
}
