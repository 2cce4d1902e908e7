//! The error logger.

use std::error::Error as StdError;

use errctx::bridge::{self, Extractor, Structured};
use errctx::Cause;
use tracing::Level;

use crate::{LoggerConfig, Record};

macro_rules! emit {
    ($level:expr, $label:expr, $record:expr) => {
        tracing::event!(
            $level,
            label = %$label,
            fields = %$record.fields,
            caller = $record.caller.as_deref(),
            error.cause = $record.cause.as_deref(),
            structured = $record.structured,
            "{}",
            $record.message
        )
    };
}

/// Logs errors through `tracing`, using an injected extractor to find their
/// key/value pairs.
#[derive(Clone, Debug, Default)]
pub struct ErrorLogger<X = Structured> {
    extractor: X,
    config: LoggerConfig,
}

impl ErrorLogger<Structured> {
    /// Logger for errctx errors.
    pub fn structured(config: LoggerConfig) -> Self {
        ErrorLogger::new(Structured, config)
    }
}

impl<X: Extractor> ErrorLogger<X> {
    pub fn new(extractor: X, config: LoggerConfig) -> Self {
        ErrorLogger { extractor, config }
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Flatten `err` without emitting anything.
    pub fn record(&self, err: Option<&(dyn StdError + 'static)>) -> Record {
        let (keyvals, structured) = bridge::keyvals_with(&self.extractor, err);
        let mut record = match err.and_then(as_errctx) {
            Some(inner) if structured => Record::from_error_keyvals(keyvals, inner),
            _ => Record::from_keyvals(keyvals, structured),
        };
        if !self.config.include_cause {
            record.cause = None;
        }
        record
    }

    /// Emit one event for `err` at the configured level.
    ///
    /// `None` is logged too, as `"(no error)"`.
    pub fn log(&self, err: Option<&(dyn StdError + 'static)>) {
        let record = self.record(err);
        let label = &self.config.label;
        let level = self.config.level;

        if level == Level::ERROR {
            emit!(Level::ERROR, label, record);
        } else if level == Level::WARN {
            emit!(Level::WARN, label, record);
        } else if level == Level::INFO {
            emit!(Level::INFO, label, record);
        } else if level == Level::DEBUG {
            emit!(Level::DEBUG, label, record);
        } else {
            emit!(Level::TRACE, label, record);
        }
    }

    pub fn log_cause(&self, cause: &Cause) {
        self.log(Some(&**cause));
    }

    /// Log the error side of `result` and pass the result through.
    pub fn inspect<T, E>(&self, result: Result<T, E>) -> Result<T, E>
    where
        E: StdError + 'static,
    {
        if let Err(err) = &result {
            self.log(Some(err));
        }
        result
    }
}

/// The errctx error behind `err`, looking through a `Cause` handle.
fn as_errctx<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a errctx::Error> {
    if let Some(cause) = err.downcast_ref::<Cause>() {
        return as_errctx(&**cause);
    }
    err.downcast_ref::<errctx::Error>()
}
