use folio_logger::{LevelFilter, Logger};

#[test]
fn console_only_logger_has_no_file_writer() {
    let logger = Logger::builder()
        .name("integration-console-only")
        .level(LevelFilter::WARN)
        .init()
        .expect("logger should initialize");

    assert!(!logger.has_file_output());
    assert!(logger.guard().is_none());
    tracing::warn!("console only");
}
