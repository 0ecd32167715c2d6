use folio_dom::DomError;
use folio_kernel::error::format_context;
use std::borrow::Cow;

/// A specialized [`FormsError`] enum of this crate.
#[derive(Debug, thiserror::Error)]
pub enum FormsError {
    /// One of the configured selectors is not usable.
    #[error("Form selector error{}: {source}", format_context(context))]
    Selector { source: DomError, context: Option<Cow<'static, str>> },
}

impl From<DomError> for FormsError {
    fn from(source: DomError) -> Self {
        Self::Selector { source, context: None }
    }
}

pub trait FormsErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, FormsError>;
}

impl<T> FormsErrorExt<T> for Result<T, DomError> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, FormsError> {
        self.map_err(|source| FormsError::Selector { source, context: Some(context.into()) })
    }
}
