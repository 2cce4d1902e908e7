//! Attribute values.
//!
//! A [`Value`] is the payload half of a key/value pair. Its interpretation is
//! deferred to the renderer: each variant names the capability the renderer
//! uses to turn it into text, so there is no type inspection at render time.
//!
//! Most values are built through `From` conversions:
//!
//! ```
//! use std::net::Ipv4Addr;
//!
//! use errctx::Value;
//!
//! assert_eq!(Value::from(101), Value::Int(101));
//! assert_eq!(Value::from("testrun").as_str(), Some("testrun"));
//! assert!(Value::from(None::<&str>).is_null());
//! assert_eq!(Value::display(Ipv4Addr::LOCALHOST).to_string(), "127.0.0.1");
//! ```

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::render;
use crate::{Cause, Error};

/// Capability for values that marshal themselves into text.
///
/// A failed marshal renders as `<ERROR>` instead of aborting the render.
pub trait TextMarshal: Send + Sync {
    /// Produce the textual form of the value.
    fn marshal_text(&self) -> Result<Vec<u8>, Box<dyn StdError + Send + Sync>>;
}

/// The value half of a key/value pair.
#[derive(Clone)]
pub enum Value {
    /// Absence of a value. Renders as `null`.
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(Arc<str>),
    Bytes(Arc<[u8]>),
    /// Rendered through [`TextMarshal::marshal_text`].
    Text(Arc<dyn TextMarshal>),
    /// Rendered through `Display`.
    Display(Arc<dyn fmt::Display + Send + Sync>),
    /// Rendered through the error's own message.
    Error(Cause),
    /// Rendered through a `Debug` dump of the value's structure.
    Debug(Arc<dyn fmt::Debug + Send + Sync>),
}

impl Value {
    /// Wrap a value that marshals itself into text.
    pub fn text(value: impl TextMarshal + 'static) -> Self {
        Value::Text(Arc::new(value))
    }

    /// Wrap a value rendered through its `Display` implementation.
    pub fn display(value: impl fmt::Display + Send + Sync + 'static) -> Self {
        Value::Display(Arc::new(value))
    }

    /// Wrap an error value; it renders as its message.
    pub fn error(err: impl StdError + Send + Sync + 'static) -> Self {
        Value::Error(crate::into_cause(err))
    }

    /// Wrap a value rendered through its `Debug` implementation.
    pub fn debug(value: impl fmt::Debug + Send + Sync + 'static) -> Self {
        Value::Debug(Arc::new(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The string payload, if this is a `Str` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = String::new();
        render::write_value(&mut buf, self);
        f.write_str(&buf)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Value::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Value::Uint(v) => f.debug_tuple("Uint").field(v).finish(),
            Value::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Value::Str(v) => f.debug_tuple("Str").field(v).finish(),
            Value::Bytes(v) => f.debug_tuple("Bytes").field(v).finish(),
            Value::Text(_) => write!(f, "Text(..)"),
            Value::Display(_) => write!(f, "Display(..)"),
            Value::Error(err) => f.debug_tuple("Error").field(&err.to_string()).finish(),
            Value::Debug(v) => f.debug_tuple("Debug").field(v).finish(),
        }
    }
}

/// Data variants compare structurally; capability variants compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Uint(a), Value::Uint(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
            (Value::Display(a), Value::Display(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            (Value::Error(a), Value::Error(b)) => std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
            (Value::Debug(a), Value::Debug(b)) => std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
            _ => false,
        }
    }
}

// -- Conversions --

macro_rules! from_signed {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::Int(i64::from(v))
            }
        })*
    };
}

macro_rules! from_unsigned {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::Uint(u64::from(v))
            }
        })*
    };
}

from_signed!(i8, i16, i32, i64);
from_unsigned!(u8, u16, u32, u64);

impl From<isize> for Value {
    fn from(v: isize) -> Self {
        i64::try_from(v).map_or_else(|_| Value::display(v), Value::Int)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        u64::try_from(v).map_or_else(|_| Value::display(v), Value::Uint)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

// Widening to f64 would print the binary expansion (0.1 -> 0.10000000149011612),
// so f32 keeps its own shortest Display form.
impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::display(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Value::Str(Arc::from(v.to_string()))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(Arc::from(v))
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Str(Arc::from(v.as_str()))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(Arc::from(v))
    }
}

impl From<Cow<'_, str>> for Value {
    fn from(v: Cow<'_, str>) -> Self {
        Value::Str(Arc::from(v.as_ref()))
    }
}

impl From<Arc<str>> for Value {
    fn from(v: Arc<str>) -> Self {
        Value::Str(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(Arc::from(v))
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(Arc::from(v))
    }
}

impl From<Error> for Value {
    fn from(err: Error) -> Self {
        Value::Error(Arc::new(err))
    }
}

impl From<Cause> for Value {
    fn from(err: Cause) -> Self {
        Value::Error(err)
    }
}

/// `None` is how a nil reference reaches the renderer: it becomes `null`.
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
