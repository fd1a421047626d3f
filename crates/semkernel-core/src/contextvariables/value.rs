//! Runtime values carried by context variables.
//!
//! Rust has no class hierarchy to walk, so every value type declares its
//! supertypes explicitly through [`ContextValue::declared_supertypes`]. The
//! registry uses that declaration as its fallback chain when no converter is
//! registered for the exact type.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::number::Number;
use super::variable::AnyContextVariable;

/// Identity of a semantic type together with its declared supertypes.
#[derive(Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
    supertypes: fn() -> Vec<TypeTag>,
}

impl TypeTag {
    /// Tag for a context value type
    pub fn of<T: ContextValue>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            supertypes: T::declared_supertypes,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified Rust type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name with module paths stripped, e.g. `Vec<Object>`
    pub fn short_name(&self) -> String {
        let mut out = String::with_capacity(self.name.len());
        let mut token = String::new();
        for c in self.name.chars() {
            if c.is_alphanumeric() || c == '_' || c == ':' {
                token.push(c);
            } else {
                out.push_str(last_segment(&token));
                token.clear();
                out.push(c);
            }
        }
        out.push_str(last_segment(&token));
        out
    }

    /// Direct supertypes, most specific first
    pub fn supertypes(&self) -> Vec<TypeTag> {
        (self.supertypes)()
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}

/// A value that can travel through a context variable.
pub trait ContextValue: Any + Send + Sync + fmt::Debug {
    fn as_any(&self) -> &dyn Any;

    /// Runtime type of this value
    fn type_tag(&self) -> TypeTag;

    fn clone_object(&self) -> Object;

    /// Generic stringification, used when no converter applies
    fn display_string(&self) -> String;

    /// Supertypes consulted when no converter matches the exact type
    fn declared_supertypes() -> Vec<TypeTag>
    where
        Self: Sized,
    {
        Vec::new()
    }

    /// Element view for collection-like values
    fn elements(&self) -> Option<Vec<Object>> {
        None
    }

    /// Typed-box view when this value is itself a context variable
    fn as_context_variable(&self) -> Option<&dyn AnyContextVariable> {
        None
    }
}

/// Type-erased, cheaply clonable context value.
///
/// `Object` is transparent: its type tag, `as_any` and element view all
/// delegate to the wrapped value, so downcasting sees the concrete type.
#[derive(Clone)]
pub struct Object(Arc<dyn ContextValue>);

impl Object {
    pub fn new<T: ContextValue>(value: T) -> Self {
        if let Some(object) = (&value as &dyn Any).downcast_ref::<Object>() {
            return object.clone();
        }
        Self(Arc::new(value))
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    pub fn is<T: 'static>(&self) -> bool {
        self.0.as_any().is::<T>()
    }

    pub fn as_value(&self) -> &dyn ContextValue {
        self.0.as_ref()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.0.as_ref(), f)
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.display_string())
    }
}

impl ContextValue for Object {
    fn as_any(&self) -> &dyn Any {
        self.0.as_any()
    }

    fn type_tag(&self) -> TypeTag {
        self.0.type_tag()
    }

    fn clone_object(&self) -> Object {
        self.clone()
    }

    fn display_string(&self) -> String {
        self.0.display_string()
    }

    fn elements(&self) -> Option<Vec<Object>> {
        self.0.elements()
    }

    fn as_context_variable(&self) -> Option<&dyn AnyContextVariable> {
        self.0.as_context_variable()
    }
}

/// Untyped collection: the target type of the collection converter.
pub type Collection = Vec<Object>;

impl<T: ContextValue + Clone> ContextValue for Vec<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_tag(&self) -> TypeTag {
        TypeTag::of::<Self>()
    }

    fn clone_object(&self) -> Object {
        Object::new(self.clone())
    }

    fn display_string(&self) -> String {
        let items: Vec<String> = self.iter().map(ContextValue::display_string).collect();
        format!("[{}]", items.join(", "))
    }

    fn declared_supertypes() -> Vec<TypeTag> {
        vec![TypeTag::of::<Collection>()]
    }

    fn elements(&self) -> Option<Vec<Object>> {
        Some(self.iter().map(ContextValue::clone_object).collect())
    }
}

impl ContextValue for () {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_tag(&self) -> TypeTag {
        TypeTag::of::<Self>()
    }

    fn clone_object(&self) -> Object {
        Object::new(())
    }

    fn display_string(&self) -> String {
        String::new()
    }
}

macro_rules! impl_context_value {
    ($($ty:ty => [$($sup:ty),*]),* $(,)?) => {
        $(
            impl ContextValue for $ty {
                fn as_any(&self) -> &dyn Any {
                    self
                }

                fn type_tag(&self) -> TypeTag {
                    TypeTag::of::<Self>()
                }

                fn clone_object(&self) -> Object {
                    Object::new(self.clone())
                }

                fn display_string(&self) -> String {
                    self.to_string()
                }

                fn declared_supertypes() -> Vec<TypeTag> {
                    vec![$(TypeTag::of::<$sup>()),*]
                }
            }
        )*
    };
}

impl_context_value! {
    String => [],
    bool => [],
    char => [],
    i8 => [Number],
    i16 => [Number],
    i32 => [Number],
    i64 => [Number],
    isize => [Number],
    u8 => [Number],
    u16 => [Number],
    u32 => [Number],
    u64 => [Number],
    usize => [Number],
    f32 => [Number],
    f64 => [Number],
    Number => [],
    DateTime<Utc> => [],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_is_transparent() {
        let object = Object::new(42_i32);
        assert_eq!(object.type_tag(), TypeTag::of::<i32>());
        assert_eq!(object.downcast_ref::<i32>(), Some(&42));
        assert_eq!(object.display_string(), "42");

        let rewrapped = Object::new(object.clone());
        assert!(rewrapped.is::<i32>());
    }

    #[test]
    fn test_short_name_strips_paths() {
        assert_eq!(TypeTag::of::<String>().short_name(), "String");
        assert_eq!(TypeTag::of::<Collection>().short_name(), "Vec<Object>");
    }

    #[test]
    fn test_declared_supertypes() {
        assert_eq!(TypeTag::of::<u16>().supertypes(), vec![TypeTag::of::<Number>()]);
        assert_eq!(
            TypeTag::of::<Vec<String>>().supertypes(),
            vec![TypeTag::of::<Collection>()]
        );
        assert!(TypeTag::of::<String>().supertypes().is_empty());
    }

    #[test]
    fn test_vec_elements() {
        let values = vec!["a".to_string(), "b".to_string()];
        let elements = values.elements().unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[1].downcast_ref::<String>().unwrap(), "b");
        assert_eq!(values.display_string(), "[a, b]");
    }
}
