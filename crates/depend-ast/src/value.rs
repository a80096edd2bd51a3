use serde::{Deserialize, Serialize};

/// A statically known scalar, folded from declarator initialisers.
///
/// `None` means the initialiser is not a plain scalar literal; `Null` is PHP's `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    #[default]
    None,
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl Value {
    pub fn is_known(&self) -> bool {
        !matches!(self, Value::None)
    }

    /// Fold a literal image exactly as it appears in the source.
    pub fn from_literal(image: &str) -> Value {
        match image.to_ascii_lowercase().as_str() {
            "true" => return Value::Bool(true),
            "false" => return Value::Bool(false),
            "null" => return Value::Null,
            _ => {}
        }
        let bytes = image.as_bytes();
        match bytes.first() {
            Some(b'\'') => Value::String(unquote_single(image)),
            Some(b'"') if image.len() >= 2 => Value::String(image[1..image.len() - 1].to_string()),
            Some(b'0'..=b'9') | Some(b'.') => parse_number(image),
            _ => Value::None,
        }
    }

    pub fn negate(self) -> Value {
        match self {
            Value::Int(i) => i.checked_neg().map(Value::Int).unwrap_or(Value::Float(-(i as f64))),
            Value::Float(f) => Value::Float(-f),
            _ => Value::None,
        }
    }
}

fn parse_number(image: &str) -> Value {
    let lower = image.to_ascii_lowercase();
    let (digits, radix) = if let Some(hex) = lower.strip_prefix("0x") {
        (hex, 16)
    } else if let Some(bin) = lower.strip_prefix("0b") {
        (bin, 2)
    } else if lower.len() > 1 && lower.starts_with('0') && lower.bytes().all(|b| b.is_ascii_digit()) {
        (&lower[1..], 8)
    } else if lower.bytes().all(|b| b.is_ascii_digit()) {
        (lower.as_str(), 10)
    } else {
        return lower.parse::<f64>().map(Value::Float).unwrap_or(Value::None);
    };
    match i64::from_str_radix(digits, radix) {
        Ok(i) => Value::Int(i),
        // PHP promotes overflowing integer literals to float
        Err(_) => u128::from_str_radix(digits, radix)
            .map(|u| Value::Float(u as f64))
            .unwrap_or(Value::None),
    }
}

fn unquote_single(image: &str) -> String {
    let inner = image
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(image);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next @ ('\'' | '\\')) => out.push(next),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(Value::from_literal("TRUE"), Value::Bool(true));
        assert_eq!(Value::from_literal("False"), Value::Bool(false));
        assert_eq!(Value::from_literal("null"), Value::Null);
    }

    #[test]
    fn test_integer_radixes() {
        assert_eq!(Value::from_literal("42"), Value::Int(42));
        assert_eq!(Value::from_literal("0"), Value::Int(0));
        assert_eq!(Value::from_literal("00"), Value::Int(0));
        assert_eq!(Value::from_literal("0x1F"), Value::Int(31));
        assert_eq!(Value::from_literal("0b101"), Value::Int(5));
        assert_eq!(Value::from_literal("017"), Value::Int(15));
    }

    #[test]
    fn test_overflow_becomes_float() {
        assert_eq!(
            Value::from_literal("9223372036854775808"),
            Value::Float(9223372036854775808.0)
        );
    }

    #[test]
    fn test_floats() {
        assert_eq!(Value::from_literal("1.5"), Value::Float(1.5));
        assert_eq!(Value::from_literal(".5"), Value::Float(0.5));
        assert_eq!(Value::from_literal("1e3"), Value::Float(1000.0));
    }

    #[test]
    fn test_strings() {
        assert_eq!(Value::from_literal(r"'it\'s'"), Value::String("it's".into()));
        assert_eq!(Value::from_literal(r"'a\n'"), Value::String(r"a\n".into()));
        assert_eq!(Value::from_literal("\"abc\""), Value::String("abc".into()));
    }

    #[test]
    fn test_negate() {
        assert_eq!(Value::Int(3).negate(), Value::Int(-3));
        assert_eq!(Value::Float(1.5).negate(), Value::Float(-1.5));
        assert_eq!(Value::String("x".into()).negate(), Value::None);
        assert!(!Value::None.is_known());
    }
}
