use std::borrow::Cow;

/// Errors raised by the timer loop.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// A drain ran more callbacks than allowed, usually a timer that keeps rescheduling itself.
    #[error("Timer step limit exceeded{}: {message}", format_context(context))]
    StepLimit { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The virtual clock was asked to move backwards.
    #[error("Clock error{}: {message}", format_context(context))]
    Clock { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The tokio runtime could not be built.
    #[error("Runtime build error{}: {source}", format_context(context))]
    Build { source: std::io::Error, context: Option<Cow<'static, str>> },
}

impl From<std::io::Error> for RuntimeError {
    fn from(source: std::io::Error) -> Self {
        Self::Build { source, context: None }
    }
}

pub trait RuntimeErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, RuntimeError>;
}

impl<T> RuntimeErrorExt<T> for Result<T, RuntimeError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                RuntimeError::StepLimit { context: c, .. }
                | RuntimeError::Clock { context: c, .. }
                | RuntimeError::Build { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

impl<T> RuntimeErrorExt<T> for Result<T, std::io::Error> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, RuntimeError> {
        self.map_err(|source| RuntimeError::Build { source, context: Some(context.into()) })
    }
}

#[allow(clippy::ref_option)]
fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
