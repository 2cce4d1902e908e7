use std::fmt::Write;

use errctx::{KeyValue, Keyvals, Value, Variant, CALLER_KEY, CAUSE_KEY, MSG_KEY};

/// One error, flattened into the pieces of a log event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    /// The `msg` pair; the event's message.
    pub message: String,
    /// Every other pair rendered as space-separated `key=value` tokens.
    pub fields: String,
    /// The captured call site, if any.
    pub caller: Option<String>,
    /// The cause's text, for wrapped errors.
    pub cause: Option<String>,
    /// Whether the extractor recognised the error.
    pub structured: bool,
}

impl Record {
    /// Build a record from extracted pairs.
    ///
    /// A leading `msg` pair becomes the message. Every other pair, whatever
    /// its key, is a field.
    pub fn from_keyvals(keyvals: Keyvals, structured: bool) -> Self {
        Record::assemble(keyvals, structured, None, None)
    }

    /// Build a record from the pairs extracted for `err`.
    ///
    /// The `caller` and `cause` pairs appended after the context are lifted
    /// out, but only when `err` actually carries a call site or a cause.
    /// Context attributes that happen to use those keys stay fields.
    pub fn from_error_keyvals(mut keyvals: Keyvals, err: &errctx::Error) -> Self {
        let cause = if err.variant() == Variant::Caused {
            take_trailing(&mut keyvals, CAUSE_KEY)
        } else {
            None
        };
        let caller = if err.context().caller_location().is_some() {
            take_trailing(&mut keyvals, CALLER_KEY)
        } else {
            None
        };
        Record::assemble(keyvals, true, caller, cause)
    }

    fn assemble(
        keyvals: Keyvals,
        structured: bool,
        caller: Option<String>,
        cause: Option<String>,
    ) -> Self {
        let mut record = Record {
            caller,
            cause,
            structured,
            ..Record::default()
        };

        let mut pairs = keyvals.into_iter().peekable();
        if let Some(msg) = pairs.next_if(|kv| kv.key == MSG_KEY) {
            record.message = plain_text(&msg.value);
        }
        for kv in pairs {
            if !record.fields.is_empty() {
                record.fields.push(' ');
            }
            let _ = write!(record.fields, "{}={}", kv.key, kv.value);
        }
        record
    }
}

fn take_trailing(keyvals: &mut Keyvals, key: &str) -> Option<String> {
    if keyvals.last().is_some_and(|kv: &KeyValue| kv.key == key) {
        keyvals.pop().map(|kv| plain_text(&kv.value))
    } else {
        None
    }
}

/// String payloads unquoted, everything else in its rendered form.
fn plain_text(value: &Value) -> String {
    value.as_str().map_or_else(|| value.to_string(), str::to_string)
}
