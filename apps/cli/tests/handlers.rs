use folio::domain::config::UiConfig;
use folio_cli::handlers::dismiss::{Clock, dismiss};
use folio_cli::handlers::submit::{SubmitReport, submit};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

const PAGE: &str = r#"<html><body>
<div class="alert">One</div><div class="alert">Two</div>
<form class="auth-form"><input name="title" required><textarea name="body"></textarea></form>
<form class="auth-form"><input name="comment" required></form>
</body></html>"#;

fn page(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("post.html");
    fs::write(&path, PAGE).unwrap();
    path
}

fn assignments(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
}

#[test]
fn dismiss_reports_removed_alerts() {
    let dir = TempDir::new().unwrap();
    let config = UiConfig::default();

    let partial = dismiss(&page(&dir), &config, Clock::Virtual(Some(Duration::from_secs(1))))
        .unwrap();
    assert_eq!((partial.removed, partial.remaining), (0, 2));

    let full = dismiss(&page(&dir), &config, Clock::Virtual(None)).unwrap();
    assert_eq!((full.removed, full.remaining), (2, 0));
    assert_eq!(full.elapsed, Duration::from_millis(5_500));
    assert!(!full.html.contains("class=\"alert\""));
}

#[test]
fn submit_targets_the_chosen_form() {
    let dir = TempDir::new().unwrap();
    let config = UiConfig::default();

    let report = submit(&page(&dir), &config, 1, &assignments(&[("comment", "Nice post")]))
        .unwrap();
    assert!(report.proceeded);
    assert_eq!(report.fields, assignments(&[("comment", "Nice post")]));

    let report = submit(&page(&dir), &config, 0, &assignments(&[("body", "text")])).unwrap();
    assert!(!report.proceeded);
    assert_eq!(report.invalid, ["title"]);
    assert_eq!(report.notices, ["Please fill in all required fields."]);
}

#[test]
fn submit_rejects_missing_forms() {
    let dir = TempDir::new().unwrap();
    let err = submit(&page(&dir), &UiConfig::default(), 5, &[]).unwrap_err();
    assert!(err.to_string().contains("No guarded form at index 5 (page has 2)"), "{err}");
}

#[test]
fn report_renders_one_fact_per_line() {
    let report = SubmitReport {
        proceeded: false,
        notices: vec!["Please fill in all required fields.".to_owned()],
        invalid: vec!["title".to_owned(), "summary".to_owned()],
        fields: Vec::new(),
    };
    assert_eq!(
        report.to_string(),
        "status: blocked\nnotice: Please fill in all required fields.\ninvalid: title, summary\n"
    );
}
