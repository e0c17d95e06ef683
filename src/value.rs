/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use serde::{Deserialize, Serialize};
use std::fmt;

/// A canonical literal value. Literals are interned by their parsed value
/// rather than their textual form, so `13`, `+13` and ` 13` collapse into a
/// single table entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    None,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    // Anything the lightweight canonicaliser does not model, kept verbatim
    // (symbols, patterns, moments, brace-wrapped source blocks).
    Source(String),
}

impl Value {
    pub fn parse(text: &str) -> Value {
        let trimmed = text.trim();
        match trimmed {
            "none" => return Value::None,
            "true" => return Value::Boolean(true),
            "false" => return Value::Boolean(false),
            _ => {}
        }
        if let Ok(integer) = trimmed.parse::<i64>() {
            return Value::Integer(integer);
        }
        if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
            return Value::Text(trimmed[1..trimmed.len() - 1].to_string());
        }
        if let Ok(real) = trimmed.parse::<f64>() {
            return Value::Real(real);
        }
        Value::Source(trimmed.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "none"),
            Value::Boolean(boolean) => write!(f, "{}", boolean),
            Value::Integer(integer) => write!(f, "{}", integer),
            Value::Real(real) => write!(f, "{}", real),
            Value::Text(text) => write!(f, "\"{}\"", text),
            Value::Source(source) => write!(f, "{}", source),
        }
    }
}

// ------------- unit tests -------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keywords() {
        assert_eq!(Value::parse("none"), Value::None);
        assert_eq!(Value::parse("true"), Value::Boolean(true));
        assert_eq!(Value::parse("false"), Value::Boolean(false));
    }

    #[test]
    fn test_equivalent_numbers_collapse() {
        assert_eq!(Value::parse("13"), Value::parse("+13"));
        assert_eq!(Value::parse(" 13 "), Value::Integer(13));
        assert_eq!(Value::parse("2.5"), Value::Real(2.5));
    }

    #[test]
    fn test_quoted_text() {
        assert_eq!(Value::parse("\"hello\""), Value::Text("hello".to_string()));
    }

    #[test]
    fn test_unmodelled_text_kept_verbatim() {
        assert_eq!(
            Value::parse("<https://example.com/>"),
            Value::Source("<https://example.com/>".to_string())
        );
        assert_eq!(
            Value::parse("{ return 1 }"),
            Value::Source("{ return 1 }".to_string())
        );
    }
}
