//! Error values.
//!
//! An [`Error`] is a closed snapshot: a [`Context`] plus one of three shapes.
//!
//! | variant | own message | cause | text |
//! |---|---|---|---|
//! | [`Variant::Plain`] | yes | no | `msg k=v` |
//! | [`Variant::Caused`] | yes | yes | `msg k=v: cause` |
//! | [`Variant::Attached`] | no | yes | `cause k=v` |
//!
//! Errors are never modified after construction. [`Error::with`] returns a new
//! error of the same variant with an extended context.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::{keyvals, render};
use crate::{Context, Key, KeyValue, Keyvals, TextMarshal, Value};

/// Shared handle to any error used as a cause.
pub type Cause = Arc<dyn StdError + Send + Sync + 'static>;

/// The shape of an [`Error`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Variant {
    /// Message and context, no cause.
    Plain,
    /// Message and context wrapping a cause.
    Caused,
    /// Context attached to a cause; the cause supplies the message.
    Attached,
}

/// An error carrying a message, key/value context and an optional cause.
#[derive(Clone)]
pub struct Error {
    pub(crate) ctx: Context,
    pub(crate) repr: Repr,
}

#[derive(Clone)]
pub(crate) enum Repr {
    Plain { message: Arc<str> },
    Caused { message: Arc<str>, cause: Cause },
    Attached { cause: Cause },
}

impl Error {
    pub(crate) fn plain(ctx: Context, message: Arc<str>) -> Self {
        Error {
            ctx,
            repr: Repr::Plain { message },
        }
    }

    pub(crate) fn caused(ctx: Context, message: Arc<str>, cause: Cause) -> Self {
        Error {
            ctx,
            repr: Repr::Caused { message, cause },
        }
    }

    pub(crate) fn attached(ctx: Context, cause: Cause) -> Self {
        Error {
            ctx,
            repr: Repr::Attached { cause },
        }
    }

    pub fn variant(&self) -> Variant {
        match self.repr {
            Repr::Plain { .. } => Variant::Plain,
            Repr::Caused { .. } => Variant::Caused,
            Repr::Attached { .. } => Variant::Attached,
        }
    }

    /// The error's own message. Empty for attached errors.
    pub fn message(&self) -> &str {
        match &self.repr {
            Repr::Plain { message } | Repr::Caused { message, .. } => message,
            Repr::Attached { .. } => "",
        }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// The wrapped cause, if any.
    pub fn cause(&self) -> Option<&Cause> {
        match &self.repr {
            Repr::Plain { .. } => None,
            Repr::Caused { cause, .. } | Repr::Attached { cause } => Some(cause),
        }
    }

    /// Return a copy of this error with one more key/value pair.
    #[must_use]
    pub fn with(&self, key: impl Into<Key>, value: impl Into<Value>) -> Error {
        Error {
            ctx: self.ctx.with(key, value),
            repr: self.repr.clone(),
        }
    }

    /// Return a copy of this error with several more key/value pairs.
    #[must_use]
    pub fn with_pairs<I>(&self, pairs: I) -> Error
    where
        I: IntoIterator,
        I::Item: Into<KeyValue>,
    {
        Error {
            ctx: self.ctx.with_pairs(pairs),
            repr: self.repr.clone(),
        }
    }

    /// Alternating keys and values for structured logging.
    ///
    /// The first key is always `"msg"`. See the crate docs for the full layout.
    pub fn keyvals(&self) -> Keyvals {
        keyvals::extract(self)
    }

    pub(crate) fn with_context(&self, outer: &Context) -> Error {
        Error {
            ctx: self.ctx.merge(outer),
            repr: self.repr.clone(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render::render_error(self))
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Error");
        s.field("variant", &self.variant());
        if !self.message().is_empty() {
            s.field("message", &self.message());
        }
        s.field("context", &self.ctx);
        if let Some(cause) = self.cause() {
            s.field("cause", cause);
        }
        s.finish()
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause().map(|cause| &**cause as &(dyn StdError + 'static))
    }
}

impl TextMarshal for Error {
    fn marshal_text(&self) -> Result<Vec<u8>, Box<dyn StdError + Send + Sync>> {
        Ok(self.to_string().into_bytes())
    }
}

impl From<Error> for Cause {
    fn from(err: Error) -> Self {
        Arc::new(err)
    }
}

/// Convert any error into a [`Cause`].
///
/// A value that already is a `Cause` is unwrapped rather than boxed again, so
/// the capability checks done by [`Context::attach`] still see the original
/// error.
pub fn into_cause<E>(err: E) -> Cause
where
    E: StdError + Send + Sync + 'static,
{
    let cause: Cause = Arc::new(err);
    match cause.downcast_ref::<Cause>() {
        Some(inner) => Arc::clone(inner),
        None => cause,
    }
}

/// Fluent context for errors already held as a [`Cause`].
pub trait ErrorExt {
    /// Attach one key/value pair, with [`Context::attach`] semantics.
    #[must_use]
    fn with(&self, key: impl Into<Key>, value: impl Into<Value>) -> Cause;
}

impl ErrorExt for Cause {
    fn with(&self, key: impl Into<Key>, value: impl Into<Value>) -> Cause {
        Context::new()
            .with(key, value)
            .attach_cause(Arc::clone(self))
    }
}

/// Add context to the error side of a `Result`.
pub trait ResultExt<T> {
    /// Wrap the error with `message` and the pairs of `ctx`.
    fn wrap_err(self, ctx: &Context, message: impl Into<Arc<str>>) -> Result<T, Cause>;

    /// Attach the pairs of `ctx` to the error.
    fn attach_err(self, ctx: &Context) -> Result<T, Cause>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn wrap_err(self, ctx: &Context, message: impl Into<Arc<str>>) -> Result<T, Cause> {
        self.map_err(|err| ctx.wrap_cause(into_cause(err), message.into()))
    }

    fn attach_err(self, ctx: &Context) -> Result<T, Cause> {
        self.map_err(|err| ctx.attach_cause(into_cause(err)))
    }
}
