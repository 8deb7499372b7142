//! Flattened property types
//!
//! A [`PropertySet`] maps dotted keys (`server.port`) to [`PropertyValue`]
//! leaves. Each set found in a document is tagged with the [`Profile`] it
//! belongs to.

use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::fmt;

use crate::value::{fmt_float, Value};

/// The scope a set of properties applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Profile {
    /// The unnamed scope, inherited by every named profile
    Default,
    /// A named profile such as `prod`
    Named(String),
}

impl Profile {
    /// Create a named profile
    pub fn named(name: impl Into<String>) -> Self {
        Profile::Named(name.into())
    }

    /// The profile name, or `None` for the default scope
    pub fn name(&self) -> Option<&str> {
        match self {
            Profile::Default => None,
            Profile::Named(name) => Some(name),
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Profile::Default)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Default => write!(f, "<default>"),
            Profile::Named(name) => write!(f, "{}", name),
        }
    }
}

/// A flattened leaf value
///
/// Never a mapping: nested mappings are expanded into dotted keys by the
/// flattener. Anything that is neither a scalar nor a mapping is carried
/// verbatim as [`PropertyValue::Opaque`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PropertyValue {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    /// The only variant placeholders are substituted in
    String(String),
    /// Pass-through value such as a sequence
    Opaque(Value),
}

impl PropertyValue {
    /// Get as str if this is a String
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => PropertyValue::Null,
            Value::Bool(b) => PropertyValue::Bool(b),
            Value::Integer(i) => PropertyValue::Integer(i),
            Value::Float(n) => PropertyValue::Float(n),
            Value::String(s) => PropertyValue::String(s),
            other => PropertyValue::Opaque(other),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Integer(i)
    }
}

impl From<i32> for PropertyValue {
    fn from(i: i32) -> Self {
        PropertyValue::Integer(i as i64)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => write!(f, "null"),
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Integer(i) => write!(f, "{}", i),
            PropertyValue::Float(n) => fmt_float(f, *n),
            PropertyValue::String(s) => write!(f, "{}", s),
            PropertyValue::Opaque(v) => write!(f, "{}", v),
        }
    }
}

/// Dotted key to leaf value; later inserts overwrite earlier ones
pub type PropertySet = IndexMap<String, PropertyValue>;

/// One configuration fragment: the properties of a single (sub-)document
#[derive(Debug, Clone, PartialEq)]
pub struct ProfiledProperties {
    pub profile: Profile,
    pub properties: PropertySet,
}

impl ProfiledProperties {
    pub fn new(profile: Profile, properties: PropertySet) -> Self {
        Self {
            profile,
            properties,
        }
    }
}

/// Effective properties per named profile, ordered by profile name
pub type ProfileMap = BTreeMap<String, ProfiledProperties>;

/// Build a [`PropertySet`] from literal pairs
///
/// ```
/// use flatconf_core::property_set;
///
/// let props = property_set! { "server.port" => 8080, "server.host" => "localhost" };
/// assert_eq!(props.len(), 2);
/// ```
#[macro_export]
macro_rules! property_set {
    ($($key:expr => $value:expr),* $(,)?) => {{
        let mut set = $crate::PropertySet::new();
        $(set.insert(($key).to_string(), $crate::PropertyValue::from($value));)*
        set
    }};
}
