use async_trait::async_trait;
use semkernel_core::{
    AuthorRole, ChatHistory, ContextVariable, FunctionResult, INPUT, InputVariable,
    InvocationContext, Kernel, KernelFunction, KernelFunctionArguments, KernelFunctionMetadata,
    Object, PostChatCompletionEvent, PreChatCompletionEvent, SemkernelError, TypeTag,
    object_type,
};
use tracing::debug;

use crate::config::ChatConfig;

/// Kernel function that sends one user turn to a chat completion service.
///
/// Arguments: `input` (the user message) and optionally `history`, the
/// conversation so far. The configured system prompt is seeded when the
/// history carries no system message. Hooks see the full request and the
/// raw replies; the last reply's content is the function result.
pub struct ChatFunction {
    metadata: KernelFunctionMetadata,
    config: ChatConfig,
}

impl ChatFunction {
    pub const PLUGIN_NAME: &'static str = "chat";
    pub const FUNCTION_NAME: &'static str = "send";
    pub const HISTORY: &'static str = "history";

    pub fn new(config: ChatConfig) -> Self {
        let metadata = KernelFunctionMetadata::new(Self::FUNCTION_NAME)
            .with_plugin_name(Self::PLUGIN_NAME)
            .with_description("Send a message to the configured chat completion service")
            .with_parameter(InputVariable::new(INPUT, "String").with_description("User message"))
            .with_parameter(
                InputVariable::new(Self::HISTORY, "ChatHistory")
                    .with_description("Conversation so far")
                    .optional(None),
            )
            .with_return_type("String");
        Self { metadata, config }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Request history: system prompt when missing, then prior turns capped by `max_history`
    fn request_history(&self, prior: &ChatHistory) -> ChatHistory {
        let has_system = prior.iter().any(|message| message.role == AuthorRole::System);
        let mut history = match (&self.config.system_prompt, has_system) {
            (Some(prompt), false) => ChatHistory::with_instructions(prompt.as_str()),
            _ => ChatHistory::new(),
        };

        let turns = prior
            .iter()
            .filter(|message| message.role != AuthorRole::System)
            .count();
        let mut skip = self
            .config
            .max_history
            .map_or(0, |max| turns.saturating_sub(max));

        for message in prior {
            if message.role != AuthorRole::System && skip > 0 {
                skip -= 1;
                continue;
            }
            history.add_message_content(message.clone());
        }
        history
    }
}

#[async_trait]
impl KernelFunction for ChatFunction {
    fn metadata(&self) -> &KernelFunctionMetadata {
        &self.metadata
    }

    async fn invoke(
        &self,
        kernel: &Kernel,
        arguments: KernelFunctionArguments,
        _result_type: Option<TypeTag>,
        context: InvocationContext,
    ) -> semkernel_core::Result<FunctionResult<Object>> {
        let name = self.metadata.fully_qualified_name();
        let types = context.context_variable_types();

        let input = arguments
            .get_as::<String>(INPUT, types)?
            .ok_or_else(|| SemkernelError::InvalidArgument(format!("{name} requires an input message")))?;
        let prior = arguments
            .get_as::<ChatHistory>(Self::HISTORY, types)?
            .unwrap_or_default();

        let mut history = self.request_history(&prior);
        history.add_user_message(input);

        let hooks = context.kernel_hooks();
        let request = hooks
            .execute_hooks(
                PreChatCompletionEvent {
                    chat_history: history,
                    settings: context.prompt_execution_settings().cloned(),
                }
                .into(),
            )
            .into_pre_chat_completion()
            .ok_or_else(|| SemkernelError::function(&name, "hook replaced the PreChatCompletion event"))?;

        let service_id = request
            .settings
            .as_ref()
            .and_then(|settings| settings.service_id.clone())
            .or_else(|| self.config.service_id.clone());
        let service = kernel.get_chat_completion_service(service_id.as_deref())?;

        let request_context = match request.settings {
            Some(settings) => InvocationContext::new(
                context.kernel_hooks().clone(),
                Some(settings),
                context.tool_call_behavior().cloned(),
                types.clone(),
            ),
            None => context.clone(),
        };

        debug!(
            function = %name,
            service = service.service_id(),
            messages = request.chat_history.len(),
            "Requesting chat completion"
        );
        let messages = service
            .get_chat_message_contents(&request.chat_history, kernel, &request_context)
            .await?;

        let replies = hooks
            .execute_hooks(PostChatCompletionEvent { messages }.into())
            .into_post_chat_completion()
            .ok_or_else(|| SemkernelError::function(&name, "hook replaced the PostChatCompletion event"))?
            .messages;

        let reply = replies.into_iter().last().ok_or_else(|| {
            SemkernelError::ChatCompletion(format!("service {} returned no messages", service.service_id()))
        })?;
        let metadata = reply.metadata.unwrap_or_default();

        Ok(FunctionResult::new(
            ContextVariable::new(object_type(), Object::new(reply.content)),
            metadata,
        ))
    }
}
