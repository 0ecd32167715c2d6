use crate::handlers::load_page;
use anyhow::{Context, anyhow, bail};
use folio::dom::Element;
use folio::domain::config::UiConfig;
use folio::features::forms::MemoryNotifier;
use std::fmt::{self, Write as _};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

/// Exit status of a blocked submission.
pub const BLOCKED_EXIT_CODE: u8 = 2;

/// What happened to one submit attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitReport {
    pub proceeded: bool,
    pub notices: Vec<String>,
    /// Names of the required inputs carrying the invalid class afterwards.
    pub invalid: Vec<String>,
    /// Fields sent by the native submission, if it went through.
    pub fields: Vec<(String, String)>,
}

impl SubmitReport {
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        if self.proceeded { ExitCode::SUCCESS } else { ExitCode::from(BLOCKED_EXIT_CODE) }
    }
}

impl fmt::Display for SubmitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.proceeded { "proceeded" } else { "blocked" };
        writeln!(f, "status: {status}")?;
        for notice in &self.notices {
            writeln!(f, "notice: {notice}")?;
        }
        if !self.invalid.is_empty() {
            writeln!(f, "invalid: {}", self.invalid.join(", "))?;
        }
        let mut sent = String::new();
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                sent.push_str(", ");
            }
            write!(sent, "{name}={value}")?;
        }
        if !sent.is_empty() {
            writeln!(f, "sent: {sent}")?;
        }
        Ok(())
    }
}

/// Loads `page`, sets `assignments` on the chosen guarded form and submits it.
///
/// # Errors
/// Returns an error if the page cannot be read, there is no guarded form at `form_index`
/// or an assignment names a field the form does not have.
pub fn submit(
    page: &Path,
    config: &UiConfig,
    form_index: usize,
    assignments: &[(String, String)],
) -> anyhow::Result<SubmitReport> {
    let document = load_page(page)?;
    let notifier = Arc::new(MemoryNotifier::new());
    let event_loop = folio::event_loop(config);
    let ready = folio::on_ready(&document, &event_loop, config, notifier.clone());
    document.finish_parsing();

    let behaviors = ready
        .behaviors()
        .ok_or_else(|| anyhow!(ready.failure().unwrap_or_default()))
        .context("Failed to install page behaviors")?;

    let forms = behaviors.forms().forms();
    let Some(form) = forms.get(form_index) else {
        bail!("No guarded form at index {form_index} (page has {})", forms.len());
    };

    for (name, value) in assignments {
        field(form, name)?.set_value(value.clone());
    }

    let outcome = document.submit(form)?;
    let invalid = form
        .query_selector_all(&config.forms.required_selector)?
        .iter()
        .filter(|input| input.class_list().contains(&config.forms.invalid_class))
        .filter_map(|input| input.attribute("name"))
        .collect();
    let fields = document.take_submissions().into_iter().flat_map(|s| s.fields).collect();

    let report = SubmitReport {
        proceeded: !outcome.is_prevented(),
        notices: notifier.take(),
        invalid,
        fields,
    };
    info!(proceeded = report.proceeded, invalid = report.invalid.len(), "Form submitted");
    Ok(report)
}

fn field(form: &Element, name: &str) -> anyhow::Result<Element> {
    form.query_selector_all("input, textarea, select")?
        .into_iter()
        .find(|el| el.attribute("name").as_deref() == Some(name))
        .with_context(|| format!("Form has no field named `{name}`"))
}
