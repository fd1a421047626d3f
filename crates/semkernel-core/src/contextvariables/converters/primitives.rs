use std::any::type_name;
use std::fmt::Display;
use std::str::FromStr;

use crate::SemkernelError;
use crate::contextvariables::converter::ContextVariableTypeConverter;
use crate::contextvariables::number::Number;
use crate::contextvariables::value::ContextValue;

/// Strings render raw; any value coerces through its display form.
pub fn string_converter() -> ContextVariableTypeConverter<String> {
    ContextVariableTypeConverter::<String>::builder()
        .to_prompt_string(|_, s: &String| s.clone())
        .from_object(|value| Some(value.display_string()))
        .from_prompt_string(|s| Ok(s.to_string()))
        .build()
}

pub fn bool_converter() -> ContextVariableTypeConverter<bool> {
    ContextVariableTypeConverter::<bool>::builder()
        .from_prompt_string(|s| match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(SemkernelError::parse("bool", s, "expected true or false")),
        })
        .build()
}

pub fn char_converter() -> ContextVariableTypeConverter<char> {
    ContextVariableTypeConverter::<char>::builder()
        .from_object(|value| {
            let any = value.as_any();
            any.downcast_ref::<char>()
                .copied()
                .or_else(|| any.downcast_ref::<String>().and_then(|s| single_char(s)))
        })
        .from_prompt_string(|s| {
            single_char(s).ok_or_else(|| SemkernelError::parse("char", s, "expected exactly one character"))
        })
        .build()
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Integers accept any integral number that fits; floats never narrow.
fn integer_converter<T>() -> ContextVariableTypeConverter<T>
where
    T: ContextValue + Clone + FromStr + TryFrom<i64> + TryFrom<u64>,
    <T as FromStr>::Err: Display,
{
    ContextVariableTypeConverter::<T>::builder()
        .from_object(|value| match Number::from_value(value)? {
            Number::Int(i) => <T as TryFrom<i64>>::try_from(i).ok(),
            Number::UInt(u) => <T as TryFrom<u64>>::try_from(u).ok(),
            Number::Float(_) => None,
        })
        .from_prompt_string(|s| {
            s.trim()
                .parse::<T>()
                .map_err(|e| SemkernelError::parse(type_name::<T>(), s, e))
        })
        .build()
}

pub fn i32_converter() -> ContextVariableTypeConverter<i32> {
    integer_converter()
}

pub fn i64_converter() -> ContextVariableTypeConverter<i64> {
    integer_converter()
}

pub fn f32_converter() -> ContextVariableTypeConverter<f32> {
    ContextVariableTypeConverter::<f32>::builder()
        .from_object(|value| {
            let wide = Number::from_value(value)?.as_f64();
            let narrow = wide as f32;
            // finite values beyond f32 range do not fit
            (narrow.is_finite() || !wide.is_finite()).then_some(narrow)
        })
        .from_prompt_string(|s| {
            s.trim()
                .parse::<f32>()
                .map_err(|e| SemkernelError::parse("f32", s, e))
        })
        .build()
}

pub fn f64_converter() -> ContextVariableTypeConverter<f64> {
    ContextVariableTypeConverter::<f64>::builder()
        .from_object(|value| Number::from_value(value).map(|n| n.as_f64()))
        .from_prompt_string(|s| {
            s.trim()
                .parse::<f64>()
                .map_err(|e| SemkernelError::parse("f64", s, e))
        })
        .build()
}

/// The unit type renders as an empty string.
pub fn unit_converter() -> ContextVariableTypeConverter<()> {
    ContextVariableTypeConverter::<()>::builder()
        .to_prompt_string(|_, _| String::new())
        .from_prompt_string(|_| Ok(()))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contextvariables::{ContextVariable, ContextVariableType, ContextVariableTypes};

    #[test]
    fn test_bool_strict_parse() {
        let converter = bool_converter();
        assert!(converter.from_prompt_string(" TRUE ").unwrap());
        assert!(!converter.from_prompt_string("false").unwrap());
        assert!(converter.from_prompt_string("yes").is_err());
    }

    #[test]
    fn test_char() {
        let converter = char_converter();
        assert_eq!(converter.from_prompt_string("x").unwrap(), 'x');
        assert!(converter.from_prompt_string("xy").is_err());
        assert_eq!(converter.from_object(&"é".to_string()), Some('é'));
    }

    #[test]
    fn test_integer_bounds() {
        let converter = i32_converter();
        assert_eq!(converter.from_object(&7_u64), Some(7));
        assert_eq!(converter.from_object(&u64::MAX), None);
        assert_eq!(converter.from_object(&1.0_f64), None);
        assert_eq!(converter.from_prompt_string(" -12 ").unwrap(), -12);
        assert!(converter.from_prompt_string("1.5").is_err());
    }

    #[test]
    fn test_f32_bounds() {
        let converter = f32_converter();
        assert_eq!(converter.from_object(&1.5_f64), Some(1.5));
        assert_eq!(converter.from_object(&f64::MAX), None);
        assert_eq!(converter.from_object(&f64::MIN), None);
        assert_eq!(converter.from_object(&f64::INFINITY), Some(f32::INFINITY));

        let f32_type = ContextVariableType::new(f32_converter());
        let err = ContextVariable::convert(Some(&f64::MAX as &dyn ContextValue), &f32_type).unwrap_err();
        assert!(matches!(err, SemkernelError::Conversion { .. }));
    }

    #[test]
    fn test_string_render_is_raw() {
        let types = ContextVariableTypes::new();
        assert_eq!(string_converter().to_prompt_string(&types, &"<a>".to_string()), "<a>");
        assert_eq!(string_converter().from_object(&12_i64), Some("12".to_string()));
    }
}
