//! Bridge between errors and structured loggers.
//!
//! A log adapter needs the key/value form of an error without knowing which
//! library produced it. Two ways to get it:
//!
//! - **Injected**: hand the adapter an [`Extractor`] and call
//!   [`keyvals_with`]. Nothing global is involved.
//! - **Registered**: install one extractor at start-up with [`install`]; any
//!   code can then call [`keyvals`] or [`map`]. The registry can be set once
//!   and is read-only afterwards.
//!
//! Either way, an error the extractor does not recognise falls back to a
//! single `msg` pair holding its text.
//!
//! This is an interface for loggers. Do not use it to pull values back out of
//! errors for program logic.

use std::error::Error as StdError;
use std::sync::OnceLock;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::keyvals::MSG_KEY;
use crate::{Cause, Key, KeyValue, Keyvals, Value};

/// `msg` reported when there is no error at all.
pub const NO_ERROR: &str = "(no error)";

/// Strategy for turning an error into key/value pairs.
pub trait Extractor: Send + Sync {
    /// Return the pairs for `err`, or `None` if the error is not recognised.
    ///
    /// Returned sequences must start with the `msg` pair.
    fn keyvals(&self, err: &(dyn StdError + 'static)) -> Option<Keyvals>;
}

impl<F> Extractor for F
where
    F: Fn(&(dyn StdError + 'static)) -> Option<Keyvals> + Send + Sync,
{
    fn keyvals(&self, err: &(dyn StdError + 'static)) -> Option<Keyvals> {
        self(err)
    }
}

/// Recognises [`crate::Error`] values, whether passed directly or as a
/// [`Cause`] handle.
#[derive(Copy, Clone, Default, Debug)]
pub struct Structured;

impl Extractor for Structured {
    fn keyvals(&self, err: &(dyn StdError + 'static)) -> Option<Keyvals> {
        if let Some(cause) = err.downcast_ref::<Cause>() {
            return self.keyvals(&**cause);
        }
        err.downcast_ref::<crate::Error>().map(crate::Error::keyvals)
    }
}

/// Failure to install the process-wide extractor.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum InstallError {
    #[error("a keyval extractor is already installed")]
    AlreadyInstalled,
}

static EXTRACTOR: OnceLock<Box<dyn Extractor>> = OnceLock::new();

/// Install the process-wide extractor. Succeeds once per process.
pub fn install(extractor: impl Extractor + 'static) -> Result<(), InstallError> {
    EXTRACTOR
        .set(Box::new(extractor))
        .map_err(|_| InstallError::AlreadyInstalled)?;
    tracing::debug!("keyval extractor installed");
    Ok(())
}

/// The installed extractor, if any.
pub fn installed() -> Option<&'static dyn Extractor> {
    EXTRACTOR.get().map(|extractor| &**extractor)
}

/// Key/value pairs for `err` using the installed extractor.
///
/// The flag is `true` when the extractor recognised the error. Otherwise the
/// result is just `msg` holding the error text (or `"(no error)"`).
pub fn keyvals(err: Option<&(dyn StdError + 'static)>) -> (Keyvals, bool) {
    match installed() {
        Some(extractor) => keyvals_with(extractor, err),
        None => (fallback(err), false),
    }
}

/// Key/value pairs for `err` using an explicitly supplied extractor.
pub fn keyvals_with(
    extractor: &dyn Extractor,
    err: Option<&(dyn StdError + 'static)>,
) -> (Keyvals, bool) {
    let Some(inner) = err else {
        return (fallback(None), false);
    };
    match extractor.keyvals(inner) {
        Some(keyvals) => (keyvals, true),
        None => (fallback(err), false),
    }
}

/// The pairs of [`keyvals`] as a map. For duplicate keys the last value wins.
pub fn map(err: Option<&(dyn StdError + 'static)>) -> FxHashMap<Key, Value> {
    let (keyvals, _) = keyvals(err);
    keyvals.into_iter().map(|kv| (kv.key, kv.value)).collect()
}

fn fallback(err: Option<&(dyn StdError + 'static)>) -> Keyvals {
    let msg = err.map_or_else(|| NO_ERROR.to_string(), ToString::to_string);
    vec![KeyValue::new(MSG_KEY, msg)]
}
