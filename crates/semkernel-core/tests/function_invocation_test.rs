use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use pretty_assertions::assert_eq;
use semkernel_core::{
    ContextVariableTypeConverter, ContextVariableTypes, FunctionInvokingEvent,
    FunctionInvokingHook, FunctionResultMetadata, InvocationContext, Kernel,
    KernelFunctionArguments, KernelFunctionMetadata, KernelHooks, NativeFunction, Object,
    PromptExecutionSettings, SemkernelError, SharedKernelFunction,
};

/// Function returning its `input` argument, counting calls
fn counting_echo(calls: Arc<AtomicU32>) -> SharedKernelFunction {
    NativeFunction::new(
        KernelFunctionMetadata::new("echo").with_plugin_name("test"),
        move |arguments: KernelFunctionArguments, context: InvocationContext| {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                let input = arguments.get_as::<String>("input", context.context_variable_types())?;
                Ok::<_, SemkernelError>(input.unwrap_or_default())
            }
        },
    )
    .shared()
}

fn suffix_hook(suffix: &'static str) -> FunctionInvokingHook<impl Fn(FunctionInvokingEvent) -> FunctionInvokingEvent + Send + Sync> {
    FunctionInvokingHook::new(move |mut event: FunctionInvokingEvent| {
        let current = event
            .arguments
            .input()
            .map(|input| input.display_string())
            .unwrap_or_default();
        event.arguments.put("input", format!("{}{}", current, suffix));
        event
    })
}

fn input(value: &str) -> KernelFunctionArguments {
    KernelFunctionArguments::builder()
        .with_input(value.to_string())
        .build()
}

fn as_string(result: &semkernel_core::FunctionResult<Object>) -> String {
    result
        .result()
        .and_then(|o| o.downcast_ref::<String>())
        .cloned()
        .unwrap_or_default()
}

#[tokio::test]
async fn test_nothing_runs_until_awaited() {
    let calls = Arc::new(AtomicU32::new(0));
    let kernel = Kernel::new();
    let invocation = kernel
        .invoke(counting_echo(Arc::clone(&calls)))
        .with_arguments(input("a"));

    tokio::task::yield_now().await;
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    invocation.invoke().await.unwrap();
    invocation.invoke().await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_global_hooks_seed_every_invocation() {
    let kernel = Kernel::builder().with_global_hook(suffix_hook("-global")).build();

    let result = kernel
        .invoke(counting_echo(Arc::default()))
        .with_arguments(input("x"))
        .add_kernel_hook(suffix_hook("-local"))
        .await
        .unwrap();

    assert_eq!(as_string(&result), "x-global-local");
}

#[tokio::test]
async fn test_global_hooks_not_duplicated_by_add_kernel_hooks() {
    let mut global = KernelHooks::new();
    global.add_hook(suffix_hook("!"));
    let kernel = Kernel::builder().with_global_hooks(&global).build();

    let result = kernel
        .invoke(counting_echo(Arc::default()))
        .with_arguments(input("hi"))
        .add_kernel_hooks(kernel.global_kernel_hooks())
        .await
        .unwrap();

    assert_eq!(as_string(&result), "hi!");
}

#[tokio::test]
async fn test_later_changes_do_not_affect_started_evaluation() {
    let kernel = Kernel::new();
    let base = kernel
        .invoke(counting_echo(Arc::default()))
        .with_arguments(input("v"));

    let before = base.invoke();
    let base = base.add_kernel_hook(suffix_hook("+hook")).with_arguments(input("w"));
    let after = base.invoke();

    assert_eq!(as_string(&before.await.unwrap()), "v");
    assert_eq!(as_string(&after.await.unwrap()), "w+hook");
}

#[tokio::test]
async fn test_arguments_are_copied_into_builder() {
    let kernel = Kernel::new();
    let mut arguments = input("original");
    let invocation = kernel
        .invoke(counting_echo(Arc::default()))
        .with_arguments(arguments.clone());
    arguments.put("input", "changed".to_string());

    assert_eq!(as_string(&invocation.await.unwrap()), "original");
}

#[tokio::test]
async fn test_typed_result_keeps_metadata() {
    let kernel = Kernel::new();
    let result = kernel
        .invoke(counting_echo(Arc::default()))
        .with_arguments(input("12"))
        .with_result_type(ContextVariableTypes::get_global_variable_type::<i64>().unwrap())
        .await
        .unwrap();

    assert_eq!(result.result(), Some(&12));
    assert!(result.metadata().get(FunctionResultMetadata::ID).is_some());
}

#[tokio::test]
async fn test_with_types_overrides_rendering() {
    let kernel = Kernel::new();
    let mut custom = ContextVariableTypes::new();
    custom.put_converter(
        ContextVariableTypeConverter::<String>::builder()
            .to_prompt_string(|_, s| format!("[{}]", s))
            .from_object(|value| Some(value.display_string()))
            .build(),
    );

    let invocation = kernel
        .invoke(counting_echo(Arc::default()))
        .with_types(&custom);
    let rendered = invocation
        .context_variable_types()
        .to_prompt_string(&"s".to_string());
    assert_eq!(rendered, "[s]");
    assert_eq!(kernel.context_variable_types().to_prompt_string(&"s".to_string()), "s");
}

#[tokio::test]
async fn test_settings_reach_function() {
    let seen = Arc::new(AtomicU32::new(0));
    let observer = Arc::clone(&seen);
    let function = NativeFunction::from_fn("settings", move |_, context: InvocationContext| {
        let observer = Arc::clone(&observer);
        async move {
            let max_tokens = context
                .prompt_execution_settings()
                .map(|s| s.max_tokens)
                .unwrap_or_default();
            observer.store(max_tokens, Ordering::SeqCst);
            Ok::<_, SemkernelError>(())
        }
    })
    .shared();

    Kernel::new()
        .invoke(function)
        .with_prompt_execution_settings(PromptExecutionSettings::new().with_max_tokens(99))
        .await
        .unwrap();
    assert_eq!(seen.load(Ordering::SeqCst), 99);
}

#[tokio::test]
async fn test_function_errors_propagate_unchanged() {
    let function = NativeFunction::from_fn("broken", |_, _| async {
        Err::<(), _>(SemkernelError::ChatCompletion("backend down".to_string()))
    })
    .shared();

    let err = Kernel::new()
        .invoke(function)
        .with_result_type(ContextVariableTypes::get_global_variable_type::<String>().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, SemkernelError::ChatCompletion(ref m) if m == "backend down"));
}

#[tokio::test]
async fn test_dropping_future_cancels_call() {
    let finished = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&finished);
    let function = NativeFunction::from_fn("slow", move |_, _| {
        let flag = Arc::clone(&flag);
        async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            flag.store(true, Ordering::SeqCst);
            Ok::<_, SemkernelError>(())
        }
    })
    .shared();

    let pending = Kernel::new().invoke(function).invoke();
    let outcome = tokio::time::timeout(Duration::from_millis(20), pending).await;
    assert!(outcome.is_err());

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(!finished.load(Ordering::SeqCst));
}
