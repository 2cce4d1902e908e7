//! Canonical text rendering.
//!
//! Error text is the message, then ` key=value` tokens, then the call site,
//! then `: cause` for wrapped errors. Values that contain a space, a control
//! character, `"`, `\` or `'` are double-quoted, with `\` and `"` escaped.
//!
//! Rendering never fails. A value whose formatting code panics renders as
//! `<PANIC>`, and a value that fails to marshal renders as `<ERROR>`; the rest
//! of the error renders normally either way.

use std::fmt::Write;
use std::panic::{self, AssertUnwindSafe};

use crate::error::Repr;
use crate::{Context, Error, Value};

pub(crate) const NULL_TOKEN: &str = "null";
pub(crate) const PANIC_TOKEN: &str = "<PANIC>";
pub(crate) const ERROR_TOKEN: &str = "<ERROR>";

pub(crate) fn render_error(err: &Error) -> String {
    let mut buf = String::new();
    match &err.repr {
        Repr::Plain { message } | Repr::Caused { message, .. } => buf.push_str(message),
        Repr::Attached { cause } => {
            let _ = write!(buf, "{cause}");
        }
    }
    write_context(&mut buf, &err.ctx);
    if let Repr::Caused { cause, .. } = &err.repr {
        let _ = write!(buf, ": {cause}");
    }
    buf
}

fn write_context(buf: &mut String, ctx: &Context) {
    for kv in ctx.pairs() {
        if !buf.is_empty() {
            buf.push(' ');
        }
        buf.push_str(&kv.key);
        buf.push('=');
        write_value(buf, &kv.value);
    }
    if let Some(caller) = ctx.caller_location() {
        if !buf.is_empty() {
            buf.push(' ');
        }
        buf.push_str(caller);
    }
}

/// Render one value, containing any panic raised by user formatting code.
pub(crate) fn write_value(buf: &mut String, value: &Value) {
    let mark = buf.len();
    let rendered = panic::catch_unwind(AssertUnwindSafe(|| write_value_unguarded(buf, value)));
    if rendered.is_err() {
        buf.truncate(mark);
        buf.push_str(PANIC_TOKEN);
        tracing::warn!(kind = value_kind(value), "attribute value panicked while rendering");
    }
}

fn write_value_unguarded(buf: &mut String, value: &Value) {
    match value {
        Value::Null => buf.push_str(NULL_TOKEN),
        Value::Bool(v) => {
            let _ = write!(buf, "{v}");
        }
        Value::Int(v) => {
            let _ = write!(buf, "{v}");
        }
        Value::Uint(v) => {
            let _ = write!(buf, "{v}");
        }
        Value::Float(v) => {
            let _ = write!(buf, "{v}");
        }
        Value::Str(s) => write_text(buf, s),
        Value::Bytes(b) => write_bytes(buf, b),
        Value::Text(t) => match t.marshal_text() {
            Ok(b) => write_bytes(buf, &b),
            Err(_) => buf.push_str(ERROR_TOKEN),
        },
        Value::Display(d) => write_text(buf, &d.to_string()),
        Value::Error(err) => write_text(buf, &err.to_string()),
        Value::Debug(d) => write_text(buf, &format!("{d:?}")),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Int(_) | Value::Uint(_) => "integer",
        Value::Float(_) => "float",
        Value::Str(_) => "str",
        Value::Bytes(_) => "bytes",
        Value::Text(_) => "text",
        Value::Display(_) => "display",
        Value::Error(_) => "error",
        Value::Debug(_) => "debug",
    }
}

/// Valid UTF-8 follows the text rules. Anything else is quoted, with each
/// invalid byte written as `\xNN`.
fn write_bytes(buf: &mut String, b: &[u8]) {
    if let Ok(s) = std::str::from_utf8(b) {
        write_text(buf, s);
        return;
    }

    buf.push('"');
    let mut rest = b;
    loop {
        match std::str::from_utf8(rest) {
            Ok(s) => {
                push_escaped(buf, s);
                break;
            }
            Err(err) => {
                let (valid, tail) = rest.split_at(err.valid_up_to());
                push_escaped(buf, std::str::from_utf8(valid).unwrap_or_default());
                let invalid = err.error_len().unwrap_or(tail.len());
                for byte in &tail[..invalid] {
                    let _ = write!(buf, "\\x{byte:02x}");
                }
                rest = &tail[invalid..];
            }
        }
    }
    buf.push('"');
}

/// Write `s` raw, or quoted and escaped if it contains a character that
/// needs quoting.
pub(crate) fn write_text(buf: &mut String, s: &str) {
    let Some(index) = s.find(needs_quote) else {
        buf.push_str(s);
        return;
    };

    buf.push('"');
    buf.push_str(&s[..index]);
    push_escaped(buf, &s[index..]);
    buf.push('"');
}

fn push_escaped(buf: &mut String, s: &str) {
    let mut rest = s;
    while let Some(index) = rest.find(needs_backslash) {
        buf.push_str(&rest[..index]);
        buf.push('\\');
        // both escaped characters are ASCII, one byte wide
        buf.push_str(&rest[index..=index]);
        rest = &rest[index + 1..];
    }
    buf.push_str(rest);
}

fn needs_quote(c: char) -> bool {
    c <= ' ' || c == '"' || c == '\\' || c == '\''
}

fn needs_backslash(c: char) -> bool {
    c == '\\' || c == '"'
}

#[cfg(test)]
mod tests;
