use folio_alerts::AlertsError;
use folio_forms::FormsError;
use folio_kernel::error::format_context;
use std::borrow::Cow;

/// Errors raised while installing the page behaviors.
#[derive(Debug, thiserror::Error)]
pub enum FolioError {
    #[error("Alert dismisser error{}: {source}", format_context(context))]
    Alerts { source: AlertsError, context: Option<Cow<'static, str>> },

    #[error("Form guard error{}: {source}", format_context(context))]
    Forms { source: FormsError, context: Option<Cow<'static, str>> },
}

impl From<AlertsError> for FolioError {
    fn from(source: AlertsError) -> Self {
        Self::Alerts { source, context: None }
    }
}

impl From<FormsError> for FolioError {
    fn from(source: FormsError) -> Self {
        Self::Forms { source, context: None }
    }
}

pub trait FolioErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, FolioError>;
}

impl<T, E: Into<FolioError>> FolioErrorExt<T> for Result<T, E> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, FolioError> {
        self.map_err(|e| {
            let mut e = e.into();
            match &mut e {
                FolioError::Alerts { context: c, .. } | FolioError::Forms { context: c, .. } => {
                    *c = Some(context.into());
                }
            }
            e
        })
    }
}
