use std::borrow::Cow;

use tracing::Level;

/// How an [`ErrorLogger`](crate::ErrorLogger) reports errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Level of every emitted event.
    pub level: Level,
    /// Recorded as the `label` field, to tell several loggers apart.
    pub label: Cow<'static, str>,
    /// Emit the cause's text as `error.cause` when the error has one.
    pub include_cause: bool,
}

impl LoggerConfig {
    pub fn new(level: Level) -> Self {
        LoggerConfig {
            level,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub fn with_cause(mut self, include_cause: bool) -> Self {
        self.include_cause = include_cause;
        self
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        LoggerConfig {
            level: Level::ERROR,
            label: Cow::Borrowed("errctx"),
            include_cause: true,
        }
    }
}
