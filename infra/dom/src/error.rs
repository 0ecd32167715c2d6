use std::borrow::Cow;

/// Errors raised by the document model.
///
/// Acting on a removed element is never an error; these cover malformed input
/// and handles that do not belong to the document.
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    /// The selector string could not be parsed or uses unsupported syntax.
    #[error("Invalid selector{}: {message}", format_context(context))]
    Selector { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A node id that does not exist in this document.
    #[error("Unknown node{}: {message}", format_context(context))]
    UnknownNode { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The operation needs a different kind of node (e.g. submitting a non-form).
    #[error("Invalid target{}: {message}", format_context(context))]
    InvalidTarget { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The insertion would break the tree (cycle or non-element parent).
    #[error("Hierarchy request error{}: {message}", format_context(context))]
    HierarchyRequest { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

pub trait DomErrorExt<T> {
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, DomError>;
}

impl<T> DomErrorExt<T> for Result<T, DomError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                DomError::Selector { context: c, .. }
                | DomError::UnknownNode { context: c, .. }
                | DomError::InvalidTarget { context: c, .. }
                | DomError::HierarchyRequest { context: c, .. } => *c = Some(context.into()),
            }
            e
        })
    }
}

#[allow(clippy::ref_option)]
fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
