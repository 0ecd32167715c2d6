use std::borrow::Cow;

/// Renders an optional error context as ` (context)` for `#[error(...)]` strings.
#[must_use]
#[allow(clippy::ref_option)]
pub fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_context_renders_nothing() {
        assert_eq!(format_context(&None), "");
    }

    #[test]
    fn context_is_parenthesized() {
        assert_eq!(format_context(&Some("loading page".into())), " (loading page)");
    }
}
