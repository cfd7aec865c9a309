//! Annotation member values.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::Name;

/// Marks a property placeholder (`${server.port}`) resolved at run time.
pub const PROPERTY_PLACEHOLDER_PREFIX: &str = "${";

/// Marks an evaluated expression (`#{ env.active }`) compiled separately.
pub const EVALUATED_EXPRESSION_PREFIX: &str = "#{";

/// Member name → value, in declaration order.
pub type MemberMap = IndexMap<Name, Value, FxBuildHasher>;

/// A resolved annotation member value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    /// Integer family (`byte`, `short`, `int`, `long`).
    Int(i64),
    /// Floating family (`float`, `double`).
    Float(f64),
    Char(char),
    Str(String),
    /// Reference to a class by fully qualified name.
    Class(String),
    /// Enum constant.
    Enum { ty: Name, constant: String },
    /// Nested annotation.
    Annotation(Box<NestedAnnotation>),
    Array(Vec<Value>),
    /// Evaluated expression left for a later compilation step.
    Expression(ExpressionRef),
}

impl Value {
    /// String view of this value.
    ///
    /// Class references yield the class name, enum constants the constant
    /// name, arrays their first element.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Class(s) => Some(s),
            Value::Enum { constant, .. } => Some(constant),
            Value::Array(items) => items.first().and_then(Value::as_str),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Str(s) => s.parse().ok(),
            Value::Array(items) => items.first().and_then(Value::as_bool),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Str(s) => s.parse().ok(),
            Value::Array(items) => items.first().and_then(Value::as_int),
            _ => None,
        }
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "annotation integers widened to double, as the host does"
    )]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            Value::Array(items) => items.first().and_then(Value::as_float),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&str> {
        match self {
            Value::Class(s) => Some(s),
            Value::Array(items) => items.first().and_then(Value::as_class),
            _ => None,
        }
    }

    /// Enum constant name; plain strings are accepted as constants.
    pub fn as_enum_constant(&self) -> Option<&str> {
        match self {
            Value::Enum { constant, .. } => Some(constant),
            Value::Str(s) => Some(s),
            Value::Array(items) => items.first().and_then(Value::as_enum_constant),
            _ => None,
        }
    }

    pub fn as_annotation(&self) -> Option<&NestedAnnotation> {
        match self {
            Value::Annotation(nested) => Some(nested),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Whether this value (or any array element) holds a `${...}` placeholder.
    pub fn contains_property_placeholder(&self) -> bool {
        match self {
            Value::Str(s) => s.contains(PROPERTY_PLACEHOLDER_PREFIX),
            Value::Array(items) => items.iter().any(Value::contains_property_placeholder),
            _ => false,
        }
    }

    pub fn is_expression(&self) -> bool {
        matches!(self, Value::Expression(_))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

/// An annotation used as a member value, e.g. each `@Tag` in
/// `@Tags({@Tag("a"), @Tag("b")})`.
#[derive(Clone, Debug, PartialEq)]
pub struct NestedAnnotation {
    pub name: Name,
    pub members: MemberMap,
}

impl NestedAnnotation {
    pub fn new(name: Name) -> Self {
        NestedAnnotation {
            name,
            members: MemberMap::default(),
        }
    }

    #[must_use]
    pub fn with_member(mut self, member: Name, value: impl Into<Value>) -> Self {
        self.members.insert(member, value.into());
        self
    }

    pub fn member(&self, member: Name) -> Option<&Value> {
        self.members.get(&member)
    }
}

/// Placeholder for a `#{...}` member value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExpressionRef {
    /// Annotation the expression was written in.
    pub annotation: Name,
    /// Member the expression was assigned to.
    pub member: Name,
    /// Source text, delimiters included.
    pub expression: String,
}
