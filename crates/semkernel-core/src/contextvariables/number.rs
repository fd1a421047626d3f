//! Untyped numeric value, the declared supertype of every primitive number.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::value::ContextValue;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl Number {
    /// Extract a number from any primitive numeric value
    pub fn from_value(value: &dyn ContextValue) -> Option<Self> {
        let any = value.as_any();
        macro_rules! try_as {
            ($($ty:ty => $variant:ident as $target:ty),* $(,)?) => {
                $(
                    if let Some(v) = any.downcast_ref::<$ty>() {
                        return Some(Number::$variant(*v as $target));
                    }
                )*
            };
        }
        if let Some(n) = any.downcast_ref::<Number>() {
            return Some(*n);
        }
        try_as! {
            i8 => Int as i64,
            i16 => Int as i64,
            i32 => Int as i64,
            i64 => Int as i64,
            isize => Int as i64,
            u8 => UInt as u64,
            u16 => UInt as u64,
            u32 => UInt as u64,
            u64 => UInt as u64,
            usize => UInt as u64,
            f32 => Float as f64,
            f64 => Float as f64,
        }
        None
    }

    /// Integral value, `None` for floats or when out of range
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Number::Int(i) => Some(i),
            Number::UInt(u) => i64::try_from(u).ok(),
            Number::Float(_) => None,
        }
    }

    /// Unsigned integral value, `None` for floats or negatives
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Number::Int(i) => u64::try_from(i).ok(),
            Number::UInt(u) => Some(u),
            Number::Float(_) => None,
        }
    }

    /// Widening conversion to a float
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Int(i) => i as f64,
            Number::UInt(u) => u as f64,
            Number::Float(f) => f,
        }
    }

    pub fn is_integral(&self) -> bool {
        !matches!(self, Number::Float(_))
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::UInt(u) => write!(f, "{}", u),
            Number::Float(v) => write!(f, "{}", v),
        }
    }
}

impl FromStr for Number {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(i) = s.parse::<i64>() {
            return Ok(Number::Int(i));
        }
        if let Ok(u) = s.parse::<u64>() {
            return Ok(Number::UInt(u));
        }
        s.parse::<f64>()
            .map(Number::Float)
            .map_err(|e| e.to_string())
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Int(value)
    }
}

impl From<u64> for Number {
    fn from(value: u64) -> Self {
        Number::UInt(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_value() {
        assert_eq!(Number::from_value(&7_u8), Some(Number::UInt(7)));
        assert_eq!(Number::from_value(&-3_i16), Some(Number::Int(-3)));
        assert_eq!(Number::from_value(&1.5_f32), Some(Number::Float(1.5)));
        assert_eq!(Number::from_value(&"7".to_string()), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!("42".parse::<Number>(), Ok(Number::Int(42)));
        assert_eq!(
            "18446744073709551615".parse::<Number>(),
            Ok(Number::UInt(u64::MAX))
        );
        assert_eq!(" 2.5 ".parse::<Number>(), Ok(Number::Float(2.5)));
        assert!("abc".parse::<Number>().is_err());
    }

    #[test]
    fn test_narrowing() {
        assert_eq!(Number::UInt(u64::MAX).as_i64(), None);
        assert_eq!(Number::Int(-1).as_u64(), None);
        assert_eq!(Number::Float(2.0).as_i64(), None);
        assert_eq!(Number::Int(2).as_f64(), 2.0);
    }
}
