//! Root-cause lookup.

use std::error::Error as StdError;

/// Return the innermost error in `err`'s cause chain.
///
/// Follows [`source`](StdError::source) until an error without a source is
/// reached. An error with no source is its own root cause, so
/// `cause(cause(e))` is `cause(e)`.
///
/// A missing error has no cause: lift with `Option::map(cause)`.
pub fn cause<'a>(err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    let mut err = err;
    while let Some(next) = err.source() {
        err = next;
    }
    err
}
