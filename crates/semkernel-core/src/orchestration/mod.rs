//! Function orchestration: arguments, results, execution settings and the
//! fluent invocation builder.

pub mod arguments;
pub mod context;
pub mod function;
pub mod invocation;
pub mod native;
pub mod result;
pub mod settings;
pub mod tool_call;

pub use arguments::{INPUT, KernelFunctionArguments, KernelFunctionArgumentsBuilder};
pub use context::{InvocationContext, InvocationContextBuilder};
pub use function::{InputVariable, KernelFunction, KernelFunctionMetadata, SharedKernelFunction};
pub use invocation::FunctionInvocation;
pub use native::NativeFunction;
pub use result::{CompletionUsage, FunctionResult, FunctionResultMetadata};
pub use settings::{PromptExecutionSettings, ResponseFormat};
pub use tool_call::ToolCallBehavior;
