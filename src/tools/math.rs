//! Two-operand arithmetic tools.
//!
//! `calculator` and `arithmetic` deliberately disagree on unrecognized
//! operators: `calculator` falls back to addition, `arithmetic` yields NaN.
//! Both behaviours are kept for compatibility and pinned by tests.

use super::Tool;
use crate::error::ToolError;
use crate::types::{Arguments, ParameterDescriptor, ToolDescriptor, ToolOutput};
use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "add" => Some(Self::Add),
            "subtract" => Some(Self::Subtract),
            "multiply" => Some(Self::Multiply),
            "divide" => Some(Self::Divide),
            _ => None,
        }
    }

    /// Division by zero yields NaN rather than an infinity.
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Multiply => a * b,
            Self::Divide if b == 0.0 => f64::NAN,
            Self::Divide => a / b,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calculation {
    pub a: f64,
    pub b: f64,
    /// Operator as the caller spelled it.
    pub operation: String,
    /// Operator actually applied; `None` when nothing matched.
    pub applied: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    pub result: f64,
}

impl From<Calculation> for ToolOutput {
    fn from(output: Calculation) -> Self {
        ToolOutput::Calculation(output)
    }
}

fn render(calc: &Calculation) -> String {
    match &calc.expression {
        Some(expression) => format!("{expression} = {}", calc.result),
        None => format!("{} {} {} = {}", calc.a, calc.operation, calc.b, calc.result),
    }
}

/// Operands and operator as decoded from the arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationArgs {
    pub a: f64,
    pub b: f64,
    pub operation: String,
    pub expression: Option<String>,
}

impl CalculationArgs {
    fn operands(args: &Arguments) -> Result<(f64, f64), ToolError> {
        Ok((args.require_double("a")?, args.require_double("b")?))
    }
}

// ---------------------------------------------------------------------------
// calculator
// ---------------------------------------------------------------------------

/// Basic calculator; an unrecognized operator is treated as `add`.
pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    type Args = CalculationArgs;
    type Output = Calculation;

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new("calculator", "Perform a basic calculation on two numbers.")
            .required(ParameterDescriptor::double("a", "First number"))
            .required(ParameterDescriptor::double("b", "Second number"))
            .optional(ParameterDescriptor::string(
                "operation",
                "add, subtract, multiply or divide (default add; unrecognized values add)",
            ))
    }

    fn decode(&self, args: &Arguments) -> Result<CalculationArgs, ToolError> {
        let (a, b) = CalculationArgs::operands(args)?;
        Ok(CalculationArgs {
            a,
            b,
            operation: args.string("operation").unwrap_or("add").to_string(),
            expression: None,
        })
    }

    async fn execute(&self, args: CalculationArgs) -> Result<Calculation, ToolError> {
        let op = Operation::parse(&args.operation).unwrap_or(Operation::Add);
        Ok(Calculation {
            result: op.apply(args.a, args.b),
            a: args.a,
            b: args.b,
            operation: args.operation,
            applied: Some(op),
            expression: None,
        })
    }

    fn format(&self, output: &Calculation) -> String {
        format!("Result: {}", render(output))
    }
}

// ---------------------------------------------------------------------------
// arithmetic
// ---------------------------------------------------------------------------

/// Arithmetic with a mandatory operator; an unrecognized operator yields NaN.
pub struct ArithmeticTool;

#[async_trait]
impl Tool for ArithmeticTool {
    type Args = CalculationArgs;
    type Output = Calculation;

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new("arithmetic", "Apply an arithmetic operator to two numbers.")
            .required(ParameterDescriptor::double("a", "First number"))
            .required(ParameterDescriptor::double("b", "Second number"))
            .required(ParameterDescriptor::string(
                "operation",
                "add, subtract, multiply or divide",
            ))
            .optional(ParameterDescriptor::string(
                "expression",
                "Label shown in place of the operands",
            ))
    }

    fn decode(&self, args: &Arguments) -> Result<CalculationArgs, ToolError> {
        let (a, b) = CalculationArgs::operands(args)?;
        Ok(CalculationArgs {
            a,
            b,
            operation: args.require_string("operation")?.to_string(),
            expression: args.string("expression").map(str::to_string),
        })
    }

    async fn execute(&self, args: CalculationArgs) -> Result<Calculation, ToolError> {
        let op = Operation::parse(&args.operation);
        Ok(Calculation {
            result: op.map_or(f64::NAN, |op| op.apply(args.a, args.b)),
            a: args.a,
            b: args.b,
            operation: args.operation,
            applied: op,
            expression: args.expression,
        })
    }

    fn format(&self, output: &Calculation) -> String {
        format!("Calculation result: {}", render(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ArgValue;
    use pretty_assertions::assert_eq;

    fn args(tool: &str, a: f64, b: f64, op: Option<&str>) -> Arguments {
        let mut args = Arguments::new(tool)
            .with("a", ArgValue::Double(a))
            .with("b", ArgValue::Double(b));
        if let Some(op) = op {
            args.insert("operation", ArgValue::String(op.into()));
        }
        args
    }

    async fn calculate<T: Tool<Output = Calculation>>(tool: &T, args: &Arguments) -> Calculation {
        tool.execute(tool.decode(args).unwrap()).await.unwrap()
    }

    #[test]
    fn operators_parse_case_insensitively() {
        assert_eq!(Operation::parse("Multiply"), Some(Operation::Multiply));
        assert_eq!(Operation::parse("DIVIDE"), Some(Operation::Divide));
        assert_eq!(Operation::parse("modulo"), None);
    }

    #[test]
    fn division_by_zero_is_nan() {
        assert!(Operation::Divide.apply(1.0, 0.0).is_nan());
        assert_eq!(Operation::Divide.apply(9.0, 3.0), 3.0);
    }

    #[tokio::test]
    async fn calculator_adds() {
        let out = calculate(&CalculatorTool, &args("calculator", 42.0, 58.0, Some("add"))).await;
        assert_eq!(out.result, 100.0);
        assert_eq!(CalculatorTool.format(&out), "Result: 42 add 58 = 100");
    }

    #[tokio::test]
    async fn calculator_defaults_to_add() {
        let out = calculate(&CalculatorTool, &args("calculator", 2.0, 3.0, None)).await;
        assert_eq!(out.operation, "add");
        assert_eq!(out.result, 5.0);
    }

    // The two calculators disagree on unknown operators; both are pinned.
    #[tokio::test]
    async fn calculator_falls_back_to_addition_for_unknown_operator() {
        let out = calculate(&CalculatorTool, &args("calculator", 2.0, 3.0, Some("power"))).await;
        assert_eq!(out.applied, Some(Operation::Add));
        assert_eq!(out.result, 5.0);
    }

    #[tokio::test]
    async fn arithmetic_yields_nan_for_unknown_operator() {
        let out = calculate(&ArithmeticTool, &args("arithmetic", 2.0, 3.0, Some("power"))).await;
        assert_eq!(out.applied, None);
        assert!(out.result.is_nan());
        assert_eq!(ArithmeticTool.format(&out), "Calculation result: 2 power 3 = NaN");
    }

    #[tokio::test]
    async fn arithmetic_uses_expression_label() {
        let mut input = args("arithmetic", 10.0, 4.0, Some("subtract"));
        input.insert("expression", ArgValue::String("ten minus four".into()));
        let out = calculate(&ArithmeticTool, &input).await;
        assert_eq!(ArithmeticTool.format(&out), "Calculation result: ten minus four = 6");
    }
}
