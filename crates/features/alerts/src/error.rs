use folio_dom::DomError;
use folio_kernel::error::format_context;
use std::borrow::Cow;

/// A specialized [`AlertsError`] enum of this crate.
#[derive(Debug, thiserror::Error)]
pub enum AlertsError {
    /// The configured alert selector is not usable.
    #[error("Alert selector error{}: {source}", format_context(context))]
    Selector { source: DomError, context: Option<Cow<'static, str>> },
}

impl From<DomError> for AlertsError {
    fn from(source: DomError) -> Self {
        Self::Selector { source, context: None }
    }
}

pub trait AlertsErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, AlertsError>;
}

impl<T> AlertsErrorExt<T> for Result<T, DomError> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, AlertsError> {
        self.map_err(|source| AlertsError::Selector { source, context: Some(context.into()) })
    }
}
