//! Invoke command handler

use semkernel::SemkernelApp;
use semkernel_core::{
    ContextValue, ContextVariableTypes, FunctionInvocation, KernelFunctionArguments, Number, Object,
};

use crate::ResultKind;
use crate::error::{CliError, Result};

/// Split a `name=value` argument
pub fn parse_argument(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(CliError::InvalidInput(format!(
            "argument '{raw}' must have the form name=value"
        ))),
    }
}

pub async fn run_invoke(
    app: &SemkernelApp,
    function: &str,
    input: Option<String>,
    raw_arguments: &[String],
    result_kind: ResultKind,
) -> Result<()> {
    let output = invoke_to_string(app, function, input, raw_arguments, result_kind).await?;
    println!("{output}");
    Ok(())
}

/// Invoke `function` and render its result as a prompt string
pub async fn invoke_to_string(
    app: &SemkernelApp,
    function: &str,
    input: Option<String>,
    raw_arguments: &[String],
    result_kind: ResultKind,
) -> Result<String> {
    let mut builder = KernelFunctionArguments::builder();
    if let Some(input) = input {
        builder = builder.with_input(input);
    }
    for raw in raw_arguments {
        let (name, value) = parse_argument(raw)?;
        builder = builder.with_variable(name, value);
    }

    let invocation = app.invoke(function)?.with_arguments(builder.build());
    let types = app.kernel().context_variable_types();

    match result_kind {
        ResultKind::Raw => {
            let result = invocation.await?;
            Ok(result
                .result()
                .map(|value| types.to_prompt_string(value.as_value()))
                .unwrap_or_default())
        }
        ResultKind::String => render_as::<String>(invocation, types).await,
        ResultKind::Int => render_as::<i32>(invocation, types).await,
        ResultKind::Long => render_as::<i64>(invocation, types).await,
        ResultKind::Float => render_as::<f32>(invocation, types).await,
        ResultKind::Double => render_as::<f64>(invocation, types).await,
        ResultKind::Bool => render_as::<bool>(invocation, types).await,
        ResultKind::Number => render_as::<Number>(invocation, types).await,
    }
}

async fn render_as<T: ContextValue + Clone>(
    invocation: FunctionInvocation<Object>,
    types: &ContextVariableTypes,
) -> Result<String> {
    let result_type = ContextVariableTypes::get_global_variable_type::<T>()?;
    let result = invocation.with_result_type(result_type).await?;
    Ok(result.result_variable().to_prompt_string(types))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use semkernel_core::SemkernelError;

    fn app() -> SemkernelApp {
        SemkernelApp::builder("cli-test")
            .with_sample_functions()
            .with_echo_service()
            .build()
            .unwrap()
    }

    #[test]
    fn test_parse_argument() {
        assert_eq!(
            parse_argument("a=1=2").unwrap(),
            ("a".to_string(), "1=2".to_string())
        );
        assert!(parse_argument("novalue").is_err());
        assert!(parse_argument("=x").is_err());
    }

    #[tokio::test]
    async fn test_invoke_typed_results() {
        let app = app();
        let arguments = vec!["a=2".to_string(), "b=40".to_string()];

        let long = invoke_to_string(&app, "math.add", None, &arguments, ResultKind::Long)
            .await
            .unwrap();
        assert_eq!(long, "42");

        let double = invoke_to_string(&app, "math.add", None, &arguments, ResultKind::Double)
            .await
            .unwrap();
        assert_eq!(double, "42");
    }

    #[tokio::test]
    async fn test_invoke_raw_collection() {
        let output = invoke_to_string(
            &app(),
            "text.split",
            Some("x,y".to_string()),
            &["separator=,".to_string()],
            ResultKind::Raw,
        )
        .await
        .unwrap();
        assert_eq!(output, "x,y");
    }

    #[tokio::test]
    async fn test_invoke_conversion_error() {
        let err = invoke_to_string(
            &app(),
            "text.upper",
            Some("abc".to_string()),
            &[],
            ResultKind::Bool,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CliError::Core(SemkernelError::ResultConversion { .. })));
    }
}
