//! Type registry and the built-in parsers.
//!
//! A type is a name bound to a parser function. Every registry view starts
//! from the same seven built-ins; hosts and plugins extend their own views
//! with additional types.

use std::rc::Rc;

use indexmap::IndexMap;
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::error::{ParseError, TypeError, TypeResult};
use crate::value::Value;

/// A pure conversion from a raw value to a typed one.
///
/// Parsers are idempotent on already-typed input: feeding a parser its own
/// output returns that output unchanged.
pub type ParserFn = Rc<dyn Fn(&Value) -> Result<Value, ParseError>>;

/// Either a registered type name or an ad hoc parser function.
#[derive(Clone)]
pub enum TypeSpec<'a> {
    /// Look the parser up by its registered name.
    Name(&'a str),
    /// Use the given parser directly, without registration.
    Parser(&'a ParserFn),
}

impl<'a> From<&'a str> for TypeSpec<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a ParserFn> for TypeSpec<'a> {
    fn from(parser: &'a ParserFn) -> Self {
        Self::Parser(parser)
    }
}

impl From<BuiltinType> for TypeSpec<'static> {
    fn from(builtin: BuiltinType) -> Self {
        Self::Name(builtin.into())
    }
}

/// The built-in type names every registry view is seeded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum BuiltinType {
    Bool,
    Int,
    Id,
    Float,
    String,
    Array,
    IntArray,
}

impl BuiltinType {
    /// The parser implementing this built-in type.
    pub fn parser(self) -> ParserFn {
        match self {
            Self::Bool => Rc::new(parse_bool),
            Self::Int => Rc::new(parse_int),
            Self::Id => Rc::new(parse_id),
            Self::Float => Rc::new(parse_float),
            Self::String => Rc::new(parse_string),
            Self::Array => Rc::new(parse_array),
            Self::IntArray => Rc::new(parse_int_array),
        }
    }
}

/// A mapping from type name to parser function.
#[derive(Clone, Default)]
pub struct TypeRegistry {
    parsers: IndexMap<String, ParserFn>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-seeded with the built-in types.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for builtin in BuiltinType::iter() {
            registry
                .parsers
                .insert(builtin.to_string(), builtin.parser());
        }
        registry
    }

    /// Register a parser under a new type name.
    ///
    /// Fails if the name already has a parser on this registry.
    pub fn register(&mut self, name: impl Into<String>, parser: ParserFn) -> TypeResult<()> {
        let name = name.into();
        if self.parsers.contains_key(&name) {
            return Err(TypeError::DuplicateType { name });
        }
        self.parsers.insert(name, parser);
        Ok(())
    }

    /// Whether a parser is registered under the name.
    pub fn contains(&self, name: &str) -> bool {
        self.parsers.contains_key(name)
    }

    /// Look up a registered parser.
    pub fn get(&self, name: &str) -> TypeResult<&ParserFn> {
        self.parsers
            .get(name)
            .ok_or_else(|| TypeError::UnknownType {
                name: name.to_string(),
            })
    }

    /// Parse a raw value through a registered type or an ad hoc parser.
    pub fn parse<'a>(&self, raw: &Value, spec: impl Into<TypeSpec<'a>>) -> TypeResult<Value> {
        match spec.into() {
            TypeSpec::Name(name) => Ok(self.get(name)?(raw)?),
            TypeSpec::Parser(parser) => Ok(parser(raw)?),
        }
    }

    /// Registered type names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parsers.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("names", &self.parsers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Numeric coercion shared by the `Int`, `Id` and `Float` parsers.
fn numeric(raw: &Value, type_name: &str) -> Result<f64, ParseError> {
    match raw {
        Value::Int(i) => Ok(*i as f64),
        Value::Float(f) if f.is_finite() => Ok(*f),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .ok_or_else(|| ParseError::new(type_name, raw, "not a number")),
        _ => Err(ParseError::new(type_name, raw, "not a number")),
    }
}

fn parse_bool(raw: &Value) -> Result<Value, ParseError> {
    if let Value::Bool(b) = raw {
        return Ok(Value::Bool(*b));
    }
    const TRUE: &[&str] = &["true", "y", "yes", "on", "1", "enable", "enabled"];
    const FALSE: &[&str] = &["false", "n", "no", "off", "0", "disable", "disabled"];

    let token = raw.to_string().trim().to_lowercase();
    if TRUE.contains(&token.as_str()) {
        Ok(Value::Bool(true))
    } else if FALSE.contains(&token.as_str()) {
        Ok(Value::Bool(false))
    } else {
        Err(ParseError::new("Bool", raw, "unknown boolean token"))
    }
}

// Floor, not round-toward-zero: Int("-1.2") is -2.
fn parse_int(raw: &Value) -> Result<Value, ParseError> {
    if let Value::Int(i) = raw {
        return Ok(Value::Int(*i));
    }
    Ok(Value::Int(numeric(raw, "Int")?.floor() as i64))
}

fn parse_id(raw: &Value) -> Result<Value, ParseError> {
    let id = parse_int(raw)?;
    match id.as_i64() {
        Some(i) if i >= 1 => Ok(id),
        _ => Err(ParseError::new("Id", raw, "must be at least 1")),
    }
}

fn parse_float(raw: &Value) -> Result<Value, ParseError> {
    if let Value::Float(f) = raw {
        if f.is_finite() {
            return Ok(Value::Float(*f));
        }
    }
    Ok(Value::Float(numeric(raw, "Float")?))
}

fn parse_string(raw: &Value) -> Result<Value, ParseError> {
    match raw {
        Value::String(s) => Ok(Value::String(s.clone())),
        other => Ok(Value::String(other.to_string())),
    }
}

// String arrays by default: "a, b ,c" splits into ["a", "b", "c"].
fn parse_array(raw: &Value) -> Result<Value, ParseError> {
    match raw {
        Value::List(items) => Ok(Value::List(items.clone())),
        Value::String(s) => Ok(Value::List(
            s.split(',')
                .map(|part| Value::String(part.trim().to_string()))
                .collect(),
        )),
        _ => Err(ParseError::new("Array", raw, "not a list")),
    }
}

fn parse_int_array(raw: &Value) -> Result<Value, ParseError> {
    let items = match raw {
        Value::List(items) => items.clone(),
        Value::String(s) => s
            .split(',')
            .map(|part| Value::String(part.trim().to_string()))
            .collect(),
        _ => return Err(ParseError::new("IntArray", raw, "not a list")),
    };
    let ints = items
        .iter()
        .map(parse_int)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::List(ints))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtins() -> TypeRegistry {
        TypeRegistry::with_builtins()
    }

    #[test]
    fn test_builtins_are_seeded() {
        let registry = builtins();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(
            names,
            ["Bool", "Int", "Id", "Float", "String", "Array", "IntArray"]
        );
    }

    #[test]
    fn test_bool_token_tables() {
        let registry = builtins();
        for token in ["true", "Y", "yes", "ON", "1", "enable", "Enabled", " yes "] {
            let parsed = registry.parse(&Value::from(token), "Bool").unwrap();
            assert_eq!(parsed, Value::Bool(true), "token {token:?}");
        }
        for token in ["false", "n", "NO", "off", "0", "disable", "DISABLED"] {
            let parsed = registry.parse(&Value::from(token), "Bool").unwrap();
            assert_eq!(parsed, Value::Bool(false), "token {token:?}");
        }
        let err = registry.parse(&Value::from("maybe"), "Bool").unwrap_err();
        assert!(matches!(err, TypeError::Parse(_)));
    }

    #[test]
    fn test_int_uses_floor_semantics() {
        let registry = builtins();
        assert_eq!(
            registry.parse(&Value::from("3.9"), "Int").unwrap(),
            Value::Int(3)
        );
        assert_eq!(
            registry.parse(&Value::from("-1.2"), "Int").unwrap(),
            Value::Int(-2)
        );
        assert_eq!(
            registry.parse(&Value::from("7"), "Int").unwrap(),
            Value::Int(7)
        );
        assert!(registry.parse(&Value::from("notanumber"), "Int").is_err());
    }

    #[test]
    fn test_id_rejects_values_below_one() {
        let registry = builtins();
        assert_eq!(
            registry.parse(&Value::from("1"), "Id").unwrap(),
            Value::Int(1)
        );
        assert!(registry.parse(&Value::from("0"), "Id").is_err());
        assert!(registry.parse(&Value::from("-3"), "Id").is_err());
    }

    #[test]
    fn test_float_coercion() {
        let registry = builtins();
        assert_eq!(
            registry.parse(&Value::from("2.5"), "Float").unwrap(),
            Value::Float(2.5)
        );
        assert_eq!(
            registry.parse(&Value::Int(3), "Float").unwrap(),
            Value::Float(3.0)
        );
        assert!(registry.parse(&Value::from("xyz"), "Float").is_err());
    }

    #[test]
    fn test_string_renders_other_values() {
        let registry = builtins();
        assert_eq!(
            registry.parse(&Value::Int(42), "String").unwrap(),
            Value::from("42")
        );
        assert_eq!(
            registry.parse(&Value::from("as-is"), "String").unwrap(),
            Value::from("as-is")
        );
    }

    #[test]
    fn test_array_splits_on_commas() {
        let registry = builtins();
        let parsed = registry.parse(&Value::from("a, b ,c"), "Array").unwrap();
        assert_eq!(parsed, Value::from(vec!["a", "b", "c"]));
        assert!(registry.parse(&Value::Bool(true), "Array").is_err());
    }

    #[test]
    fn test_int_array_floors_each_element() {
        let registry = builtins();
        let parsed = registry
            .parse(&Value::from("1, 2.9, -1.2"), "IntArray")
            .unwrap();
        assert_eq!(parsed, Value::from(vec![1i64, 2, -2]));
        assert!(registry.parse(&Value::from("1, x"), "IntArray").is_err());
    }

    #[test]
    fn test_parsers_are_idempotent_on_typed_input() {
        let registry = builtins();
        let cases = [
            ("Bool", Value::from("yes")),
            ("Int", Value::from("3.9")),
            ("Id", Value::from("2")),
            ("Float", Value::from("1.25")),
            ("String", Value::Int(9)),
            ("Array", Value::from("a,b")),
            ("IntArray", Value::from("1, 2")),
        ];
        for (name, raw) in cases {
            let once = registry.parse(&raw, name).unwrap();
            let twice = registry.parse(&once, name).unwrap();
            assert_eq!(once, twice, "type {name}");
        }
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = builtins();
        let err = registry
            .register("Bool", BuiltinType::Bool.parser())
            .unwrap_err();
        assert!(matches!(err, TypeError::DuplicateType { name } if name == "Bool"));
    }

    #[test]
    fn test_unknown_type_fails() {
        let registry = builtins();
        let err = registry.parse(&Value::from("x"), "Color").unwrap_err();
        assert!(matches!(err, TypeError::UnknownType { name } if name == "Color"));
    }

    #[test]
    fn test_ad_hoc_parser() {
        let registry = TypeRegistry::new();
        let upper: ParserFn = Rc::new(|raw| {
            Ok(Value::String(raw.to_string().to_uppercase()))
        });
        let parsed = registry.parse(&Value::from("loud"), &upper).unwrap();
        assert_eq!(parsed, Value::from("LOUD"));
    }
}
