//! Small native functions used by the CLI and as usage examples.

use semkernel_core::{
    ContextValue, ContextVariableTypes, INPUT, InputVariable, InvocationContext,
    KernelFunctionArguments, KernelFunctionMetadata, NativeFunction, SemkernelError,
    SharedKernelFunction,
};

/// `math.add`, `text.upper` and `text.split`
pub fn sample_functions() -> Vec<SharedKernelFunction> {
    vec![add(), upper(), split()]
}

fn required<T: ContextValue + Clone>(
    arguments: &KernelFunctionArguments,
    name: &str,
    types: &ContextVariableTypes,
) -> semkernel_core::Result<T> {
    arguments
        .get_as::<T>(name, types)?
        .ok_or_else(|| SemkernelError::InvalidArgument(format!("missing required argument '{name}'")))
}

/// Adds two integers
pub fn add() -> SharedKernelFunction {
    let metadata = KernelFunctionMetadata::new("add")
        .with_plugin_name("math")
        .with_description("Add two integers")
        .with_parameter(InputVariable::new("a", "i64"))
        .with_parameter(InputVariable::new("b", "i64"))
        .with_return_type("i64");

    NativeFunction::new(
        metadata,
        |arguments: KernelFunctionArguments, context: InvocationContext| async move {
            let types = context.context_variable_types();
            let a = required::<i64>(&arguments, "a", types)?;
            let b = required::<i64>(&arguments, "b", types)?;
            a.checked_add(b)
                .ok_or_else(|| SemkernelError::InvalidArgument(format!("{a} + {b} overflows")))
        },
    )
    .shared()
}

/// Upper-cases the input
pub fn upper() -> SharedKernelFunction {
    let metadata = KernelFunctionMetadata::new("upper")
        .with_plugin_name("text")
        .with_description("Convert the input to upper case")
        .with_parameter(InputVariable::new(INPUT, "String"))
        .with_return_type("String");

    NativeFunction::new(
        metadata,
        |arguments: KernelFunctionArguments, context: InvocationContext| async move {
            let input = required::<String>(&arguments, INPUT, context.context_variable_types())?;
            Ok::<_, SemkernelError>(input.to_uppercase())
        },
    )
    .shared()
}

/// Splits the input on `separator`, or on whitespace when none is given
pub fn split() -> SharedKernelFunction {
    let metadata = KernelFunctionMetadata::new("split")
        .with_plugin_name("text")
        .with_description("Split the input into a list of strings")
        .with_parameter(InputVariable::new(INPUT, "String"))
        .with_parameter(
            InputVariable::new("separator", "String")
                .with_description("Defaults to whitespace")
                .optional(None),
        )
        .with_return_type("Vec<String>");

    NativeFunction::new(
        metadata,
        |arguments: KernelFunctionArguments, context: InvocationContext| async move {
            let types = context.context_variable_types();
            let input = required::<String>(&arguments, INPUT, types)?;
            let separator = arguments.get_as::<String>("separator", types)?;

            let parts: Vec<String> = match separator.as_deref() {
                Some(separator) if !separator.is_empty() => {
                    input.split(separator).map(str::to_string).collect()
                }
                _ => input.split_whitespace().map(str::to_string).collect(),
            };
            Ok::<_, SemkernelError>(parts)
        },
    )
    .shared()
}
