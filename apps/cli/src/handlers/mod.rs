pub mod dismiss;
pub mod submit;

use anyhow::Context;
use folio::dom::Document;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reads and parses a rendered page. The document is still loading afterwards.
pub(crate) fn load_page(path: &Path) -> anyhow::Result<Document> {
    let markup = fs::read_to_string(path)
        .with_context(|| format!("Failed to read page: {}", path.display()))?;
    debug!(path = %path.display(), bytes = markup.len(), "Page loaded");
    Ok(Document::parse_html(&markup))
}
