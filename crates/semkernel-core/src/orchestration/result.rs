//! Function results and their metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::contextvariables::{ContextValue, ContextVariable, Object, object_type};

/// Token usage reported by a model service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl CompletionUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
        }
    }

    pub fn total_tokens(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// Free-form metadata attached to a function result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FunctionResultMetadata {
    values: Map<String, Value>,
}

impl FunctionResultMetadata {
    pub const ID: &'static str = "id";
    pub const USAGE: &'static str = "usage";
    pub const CREATED_AT: &'static str = "createdAt";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.values.insert(Self::ID.to_string(), Value::String(id.into()));
        self
    }

    pub fn with_usage(mut self, usage: CompletionUsage) -> Self {
        self.values.insert(
            Self::USAGE.to_string(),
            serde_json::json!({
                "prompt_tokens": usage.prompt_tokens,
                "completion_tokens": usage.completion_tokens,
            }),
        );
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.values.insert(
            Self::CREATED_AT.to_string(),
            Value::String(created_at.to_rfc3339()),
        );
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn id(&self) -> Option<&str> {
        self.values.get(Self::ID).and_then(Value::as_str)
    }

    pub fn usage(&self) -> Option<CompletionUsage> {
        self.values
            .get(Self::USAGE)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.values
            .get(Self::CREATED_AT)
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }
}

/// The outcome of a function invocation.
#[derive(Debug, Clone)]
pub struct FunctionResult<T> {
    result: ContextVariable<T>,
    metadata: FunctionResultMetadata,
}

impl<T> FunctionResult<T> {
    pub fn new(result: ContextVariable<T>, metadata: FunctionResultMetadata) -> Self {
        Self { result, metadata }
    }

    pub fn result(&self) -> Option<&T> {
        self.result.value()
    }

    pub fn into_result(self) -> Option<T> {
        self.result.into_value()
    }

    pub fn result_variable(&self) -> &ContextVariable<T> {
        &self.result
    }

    pub fn metadata(&self) -> &FunctionResultMetadata {
        &self.metadata
    }

    pub fn into_parts(self) -> (ContextVariable<T>, FunctionResultMetadata) {
        (self.result, self.metadata)
    }

    pub fn with_metadata(mut self, metadata: FunctionResultMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

impl FunctionResult<Object> {
    /// Untyped result holding `value`
    pub fn from_value<V: ContextValue>(value: V) -> Self {
        Self::new(
            ContextVariable::new(object_type(), Object::new(value)),
            FunctionResultMetadata::new(),
        )
    }
}
