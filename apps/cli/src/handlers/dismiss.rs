use crate::handlers::load_page;
use anyhow::{Context, anyhow};
use folio::domain::config::UiConfig;
use folio::features::forms::LogNotifier;
use folio_runtime::build_runtime;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// How the alert timers are driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    /// Move the virtual clock by this much; `None` means delay plus fade.
    Virtual(Option<Duration>),
    /// Sleep on a tokio runtime until the queue is empty.
    Realtime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DismissReport {
    pub html: String,
    pub removed: usize,
    pub remaining: usize,
    pub elapsed: Duration,
}

/// Loads `page`, fires the ready signal and lets the alert timers run.
///
/// # Errors
/// Returns an error if the page cannot be read, the behaviors cannot be installed or the
/// event loop fails.
pub fn dismiss(page: &Path, config: &UiConfig, clock: Clock) -> anyhow::Result<DismissReport> {
    let document = load_page(page)?;
    let event_loop = folio::event_loop(config);
    let ready = folio::on_ready(&document, &event_loop, config, Arc::new(LogNotifier));
    document.finish_parsing();

    let behaviors = ready
        .behaviors()
        .ok_or_else(|| anyhow!(ready.failure().unwrap_or_default()))
        .context("Failed to install page behaviors")?;

    match clock {
        Clock::Virtual(elapse) => {
            event_loop.advance(elapse.unwrap_or_else(|| config.alerts.lifetime()))?;
        }
        Clock::Realtime => {
            let runtime = build_runtime()?;
            runtime.block_on(event_loop.run_realtime())?;
        }
    }

    let tracked = behaviors.alerts().tracked();
    let remaining = tracked.iter().filter(|alert| alert.is_connected()).count();
    let report = DismissReport {
        html: document.to_html(),
        removed: tracked.len() - remaining,
        remaining,
        elapsed: event_loop.now(),
    };

    info!(
        removed = report.removed,
        remaining = report.remaining,
        elapsed_ms = report.elapsed.as_millis(),
        "Alert dismissal finished"
    );
    Ok(report)
}
