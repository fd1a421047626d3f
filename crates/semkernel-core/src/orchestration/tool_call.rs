//! Policy for letting a model call kernel functions.

use std::collections::BTreeSet;

/// Which kernel functions a model may call, and whether calls are invoked automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCallBehavior {
    AllowAll {
        auto_invoke: bool,
    },
    AllowOnly {
        auto_invoke: bool,
        functions: BTreeSet<String>,
    },
    /// The model must call exactly this function, which is invoked once
    Require {
        function: String,
    },
}

impl ToolCallBehavior {
    pub const DEFAULT_MAXIMUM_AUTO_INVOKE_ATTEMPTS: u32 = 5;

    pub fn allow_all_kernel_functions(auto_invoke: bool) -> Self {
        ToolCallBehavior::AllowAll { auto_invoke }
    }

    /// Allow only the named functions, given as `plugin.name`
    pub fn allow_only_kernel_functions<I, S>(auto_invoke: bool, functions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ToolCallBehavior::AllowOnly {
            auto_invoke,
            functions: functions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn require_kernel_function(function: impl Into<String>) -> Self {
        ToolCallBehavior::Require {
            function: function.into(),
        }
    }

    pub fn is_auto_invoke_allowed(&self) -> bool {
        match self {
            ToolCallBehavior::AllowAll { auto_invoke }
            | ToolCallBehavior::AllowOnly { auto_invoke, .. } => *auto_invoke,
            ToolCallBehavior::Require { .. } => true,
        }
    }

    pub fn maximum_auto_invoke_attempts(&self) -> u32 {
        match self {
            ToolCallBehavior::Require { .. } => 1,
            _ if self.is_auto_invoke_allowed() => Self::DEFAULT_MAXIMUM_AUTO_INVOKE_ATTEMPTS,
            _ => 0,
        }
    }

    pub fn is_all_kernel_functions_allowed(&self) -> bool {
        matches!(self, ToolCallBehavior::AllowAll { .. })
    }

    pub fn is_function_allowed(&self, plugin_name: Option<&str>, function_name: &str) -> bool {
        let key = qualified_name(plugin_name, function_name);
        match self {
            ToolCallBehavior::AllowAll { .. } => true,
            ToolCallBehavior::AllowOnly { functions, .. } => functions.contains(&key),
            ToolCallBehavior::Require { function } => *function == key,
        }
    }
}

pub(crate) fn qualified_name(plugin_name: Option<&str>, function_name: &str) -> String {
    match plugin_name {
        Some(plugin) if !plugin.is_empty() => format!("{}.{}", plugin, function_name),
        _ => function_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_only() {
        let behavior = ToolCallBehavior::allow_only_kernel_functions(true, ["math.add"]);
        assert!(behavior.is_function_allowed(Some("math"), "add"));
        assert!(!behavior.is_function_allowed(Some("math"), "sub"));
        assert_eq!(behavior.maximum_auto_invoke_attempts(), 5);
    }

    #[test]
    fn test_auto_invoke_attempts() {
        assert_eq!(
            ToolCallBehavior::allow_all_kernel_functions(false).maximum_auto_invoke_attempts(),
            0
        );
        let required = ToolCallBehavior::require_kernel_function("weather");
        assert_eq!(required.maximum_auto_invoke_attempts(), 1);
        assert!(required.is_function_allowed(None, "weather"));
    }
}
