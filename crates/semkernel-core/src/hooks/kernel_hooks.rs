//! Ordered hook collections.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::events::{
    FunctionInvokedEvent, FunctionInvokingEvent, KernelHookEvent, PostChatCompletionEvent,
    PreChatCompletionEvent,
};

/// Identifier assigned to a hook when it is registered
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HookId(String);

impl HookId {
    /// Create a new random HookId
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Create from existing string
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HookId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An interceptor that may observe and rewrite hook events
pub trait KernelHook: Send + Sync {
    /// Whether this hook handles the event
    fn matches(&self, event: &KernelHookEvent) -> bool;

    /// Handle the event, returning it (possibly rewritten)
    fn execute(&self, event: KernelHookEvent) -> KernelHookEvent;
}

macro_rules! closure_hook {
    ($(#[$doc:meta])* $name:ident, $event:ty, $variant:ident) => {
        $(#[$doc])*
        pub struct $name<F>(F);

        impl<F> $name<F>
        where
            F: Fn($event) -> $event + Send + Sync,
        {
            pub fn new(f: F) -> Self {
                Self(f)
            }
        }

        impl<F> KernelHook for $name<F>
        where
            F: Fn($event) -> $event + Send + Sync,
        {
            fn matches(&self, event: &KernelHookEvent) -> bool {
                matches!(event, KernelHookEvent::$variant(_))
            }

            fn execute(&self, event: KernelHookEvent) -> KernelHookEvent {
                match event {
                    KernelHookEvent::$variant(inner) => KernelHookEvent::$variant((self.0)(inner)),
                    other => other,
                }
            }
        }
    };
}

closure_hook!(
    /// Closure hook for [`FunctionInvokingEvent`]
    FunctionInvokingHook,
    FunctionInvokingEvent,
    FunctionInvoking
);
closure_hook!(
    /// Closure hook for [`FunctionInvokedEvent`]
    FunctionInvokedHook,
    FunctionInvokedEvent,
    FunctionInvoked
);
closure_hook!(
    /// Closure hook for [`PreChatCompletionEvent`]
    PreChatCompletionHook,
    PreChatCompletionEvent,
    PreChatCompletion
);
closure_hook!(
    /// Closure hook for [`PostChatCompletionEvent`]
    PostChatCompletionHook,
    PostChatCompletionEvent,
    PostChatCompletion
);

type HookEntry = (HookId, Arc<dyn KernelHook>);

/// Hooks in registration order.
///
/// Storage is copy-on-write: clones share the list until one of them is
/// modified, so a clone handed out earlier never observes later changes.
#[derive(Clone, Default)]
pub struct KernelHooks {
    hooks: Arc<Vec<HookEntry>>,
}

impl KernelHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook, returning its id
    pub fn add_hook(&mut self, hook: impl KernelHook + 'static) -> HookId {
        self.add_shared_hook(Arc::new(hook))
    }

    pub fn add_shared_hook(&mut self, hook: Arc<dyn KernelHook>) -> HookId {
        let id = HookId::new();
        Arc::make_mut(&mut self.hooks).push((id.clone(), hook));
        id
    }

    /// Append all hooks of `other`.
    /// A hook whose id is already present replaces the existing entry in place.
    pub fn add_hooks(&mut self, other: &KernelHooks) -> &mut Self {
        if other.is_empty() {
            return self;
        }
        let hooks = Arc::make_mut(&mut self.hooks);
        for (id, hook) in other.hooks.iter() {
            match hooks.iter_mut().find(|(existing, _)| existing == id) {
                Some(entry) => entry.1 = Arc::clone(hook),
                None => hooks.push((id.clone(), Arc::clone(hook))),
            }
        }
        self
    }

    pub fn remove_hook(&mut self, id: &HookId) -> Option<Arc<dyn KernelHook>> {
        let position = self.hooks.iter().position(|(existing, _)| existing == id)?;
        let (_, hook) = Arc::make_mut(&mut self.hooks).remove(position);
        Some(hook)
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub fn ids(&self) -> Vec<HookId> {
        self.hooks.iter().map(|(id, _)| id.clone()).collect()
    }

    /// Run every matching hook in registration order, threading the event through
    pub fn execute_hooks(&self, event: KernelHookEvent) -> KernelHookEvent {
        self.hooks.iter().fold(event, |event, (id, hook)| {
            if hook.matches(&event) {
                debug!(hook = %id, event = event.kind(), "Executing kernel hook");
                hook.execute(event)
            } else {
                event
            }
        })
    }

    pub fn unmodifiable_clone(&self) -> UnmodifiableKernelHooks {
        UnmodifiableKernelHooks(self.clone())
    }
}

impl fmt::Debug for KernelHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.hooks.iter().map(|(id, _)| id.as_str()))
            .finish()
    }
}

/// Read-only view of a hook collection
#[derive(Clone, Default)]
pub struct UnmodifiableKernelHooks(KernelHooks);

impl UnmodifiableKernelHooks {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ids(&self) -> Vec<HookId> {
        self.0.ids()
    }

    pub fn execute_hooks(&self, event: KernelHookEvent) -> KernelHookEvent {
        self.0.execute_hooks(event)
    }

    /// A modifiable copy; changes to it are not visible through this view
    pub fn to_kernel_hooks(&self) -> KernelHooks {
        self.0.clone()
    }
}

impl From<KernelHooks> for UnmodifiableKernelHooks {
    fn from(hooks: KernelHooks) -> Self {
        Self(hooks)
    }
}

impl fmt::Debug for UnmodifiableKernelHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UnmodifiableKernelHooks").field(&self.0).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatMessageContent;
    use std::sync::Mutex;

    fn post(messages: &[&str]) -> KernelHookEvent {
        KernelHookEvent::PostChatCompletion(PostChatCompletionEvent {
            messages: messages.iter().map(|m| ChatMessageContent::assistant(*m)).collect(),
        })
    }

    fn appender(
        suffix: &'static str,
    ) -> PostChatCompletionHook<impl Fn(PostChatCompletionEvent) -> PostChatCompletionEvent + Send + Sync>
    {
        PostChatCompletionHook::new(move |mut event: PostChatCompletionEvent| {
            event.messages.push(ChatMessageContent::assistant(suffix));
            event
        })
    }

    fn contents(event: KernelHookEvent) -> Vec<String> {
        event
            .into_post_chat_completion()
            .unwrap()
            .messages
            .into_iter()
            .map(|m| m.content)
            .collect()
    }

    #[test]
    fn test_hooks_run_in_registration_order() {
        let mut hooks = KernelHooks::new();
        hooks.add_hook(appender("first"));
        hooks.add_hook(appender("second"));

        let result = hooks.execute_hooks(post(&["start"]));
        assert_eq!(contents(result), vec!["start", "first", "second"]);
    }

    #[test]
    fn test_non_matching_hooks_are_skipped() {
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);
        let mut hooks = KernelHooks::new();
        hooks.add_hook(FunctionInvokingHook::new(move |event: FunctionInvokingEvent| {
            *counter.lock().unwrap() += 1;
            event
        }));

        let result = hooks.execute_hooks(post(&["x"]));
        assert_eq!(contents(result), vec!["x"]);
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_clone_is_isolated() {
        let mut hooks = KernelHooks::new();
        hooks.add_hook(appender("a"));
        let snapshot = hooks.unmodifiable_clone();

        hooks.add_hook(appender("b"));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(hooks.len(), 2);

        let mut copy = snapshot.to_kernel_hooks();
        copy.add_hook(appender("c"));
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_add_hooks_keeps_ids_unique() {
        let mut global = KernelHooks::new();
        let id = global.add_hook(appender("g"));

        let mut combined = KernelHooks::new();
        combined.add_hooks(&global);
        combined.add_hooks(&global);
        assert_eq!(combined.ids(), vec![id.clone()]);

        assert!(combined.remove_hook(&id).is_some());
        assert!(combined.is_empty());
        assert_eq!(global.len(), 1);
    }
}
