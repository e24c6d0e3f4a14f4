use jinjautils::logger::LogFacadeSink;
use jinjautils::{OutputRequest, TemplateSession};
use std::fs;
use tempfile::TempDir;

#[test_log::test]
fn test_facade_sink_full_workflow() {
    let templates = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    fs::write(templates.path().join("svc.j2"), "[{{ section }}]\nport = {{ port }}\n").unwrap();

    let mut session = TemplateSession::with_sink(true, LogFacadeSink);
    session.bind_directory(templates.path()).unwrap();
    session.load("svc.j2").unwrap();
    session.render(minijinja::context! { section => "server", port => 8080 }).unwrap();
    let target = session.write(&OutputRequest::new(out.path(), "svc.ini")).unwrap();

    assert_eq!(fs::read_to_string(target).unwrap(), "[server]\nport = 8080");
}

#[test_log::test]
fn test_facade_sink_reports_errors() {
    let mut session = TemplateSession::with_sink(false, LogFacadeSink);
    assert!(session.render(minijinja::context! {}).is_err());
    assert!(session.write(&OutputRequest::default()).is_err());
}
