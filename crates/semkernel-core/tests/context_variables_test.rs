use pretty_assertions::assert_eq;
use proptest::prelude::*;
use semkernel_core::contextvariables::{escape_xml_string, unescape_xml_string};
use semkernel_core::{
    ChatHistory, CollectionConverter, ContextValue, ContextVariable, ContextVariableType,
    ContextVariableTypeConverter, ContextVariableTypes, Number, Object, TypeTag,
};

#[derive(Debug, Clone, PartialEq)]
struct Celsius(f64);

impl ContextValue for Celsius {
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn type_tag(&self) -> TypeTag {
        TypeTag::of::<Self>()
    }

    fn clone_object(&self) -> Object {
        Object::new(self.clone())
    }

    fn display_string(&self) -> String {
        format!("Celsius({})", self.0)
    }

    fn declared_supertypes() -> Vec<TypeTag> {
        vec![TypeTag::of::<Number>()]
    }
}

fn celsius_type() -> ContextVariableType<Celsius> {
    ContextVariableType::new(
        ContextVariableTypeConverter::<Celsius>::builder()
            .to_prompt_string(|_, c| format!("{}°C", c.0))
            .from_object(|value| Number::from_value(value).map(|n| Celsius(n.as_f64())))
            .from_prompt_string(|s| {
                s.trim_end_matches("°C")
                    .parse::<f64>()
                    .map(Celsius)
                    .map_err(|e| semkernel_core::SemkernelError::parse("Celsius", s, e))
            })
            .build(),
    )
}

#[test]
fn test_custom_type_registration() {
    let mut types = ContextVariableTypes::with_defaults();
    assert_eq!(types.to_prompt_string(&Celsius(21.5)), "Celsius(21.5)");

    types.put_variable_type(&celsius_type());
    assert_eq!(types.to_prompt_string(&Celsius(21.5)), "21.5°C");

    let converted = ContextVariable::convert(Some(&"18°C".to_string()), &celsius_type()).unwrap();
    assert_eq!(converted.value(), Some(&Celsius(18.0)));

    let widened = ContextVariable::convert(Some(&30_u8), &celsius_type()).unwrap();
    assert_eq!(widened.value(), Some(&Celsius(30.0)));
}

#[test]
fn test_declared_supertype_used_without_exact_converter() {
    let types = ContextVariableTypes::with_defaults();
    let converter = types
        .get_variable_type_for_value(&Celsius(1.0))
        .unwrap();
    assert_eq!(converter.type_tag(), TypeTag::of::<Number>());
}

#[test]
fn test_collection_of_histories() {
    let mut first = ChatHistory::new();
    first.add_user_message("a");
    let values = vec![first.clone(), ChatHistory::new()];

    let rendered = ContextVariableTypes::with_defaults().to_prompt_string(&values);
    assert_eq!(
        rendered,
        escape_xml_string("<message role=\"user\">a</message>,")
    );
}

proptest! {
    #[test]
    fn prop_escape_round_trip(s in ".*") {
        prop_assert_eq!(unescape_xml_string(&escape_xml_string(&s)), s);
    }

    #[test]
    fn prop_escaped_output_has_no_markup(s in ".*") {
        let escaped = escape_xml_string(&s);
        prop_assert!(!escaped.contains('<'));
        prop_assert!(!escaped.contains('>'));
        prop_assert!(!escaped.contains('"'));
        prop_assert!(!escaped.contains('\''));
    }

    #[test]
    fn prop_collection_renders_escaped_join(
        words in prop::collection::vec("[a-z0-9&<>\"' ]{0,8}", 0..8),
        delimiter in prop::sample::select(vec![",", ";", " & ", "<|>"]),
    ) {
        let types = ContextVariableTypes::with_defaults();
        let elements: Vec<Object> = words.iter().cloned().map(Object::new).collect();
        prop_assert_eq!(
            CollectionConverter::new(delimiter).render(&types, &elements),
            escape_xml_string(&words.join(delimiter))
        );
    }
}
