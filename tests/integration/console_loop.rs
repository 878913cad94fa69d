//! Integration tests for the interactive loop and one-shot mode

use redirect_console::cli::{run_interactive, run_once};
use redirect_console::error::CommandError;
use std::io::Cursor;

use crate::integration::test_utils::{Call, FakeService, TestConsole};

fn drive(console: &mut TestConsole, script: &str) -> String {
    drive_bytes(console, script.as_bytes())
}

fn drive_bytes(console: &mut TestConsole, script: &[u8]) -> String {
    let mut out = Vec::new();
    run_interactive(
        &mut console.session,
        "ops",
        Cursor::new(script.to_vec()),
        &mut out,
        false,
    )
    .unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_banner_prompt_and_exit() {
    let mut console = TestConsole::new(FakeService::new());

    let out = drive(&mut console, "version\nexit\ntype 000413250001\n");

    assert!(out.starts_with("Snom Redirection Server Console Ver. "));
    assert!(out.contains("ops%> Version: "));
    assert!(!out.contains("snom300"), "lines after exit must not run");
}

#[test]
fn test_errors_keep_the_loop_running() {
    let mut console = TestConsole::new(FakeService::new());

    let out = drive(
        &mut console,
        "remove\nfly away\nadd 000413250001 http://x/\n",
    );

    assert!(out.contains("Wrong arguments. Use 'remove mac_address'"));
    assert!(out.contains("*** Unknown syntax: fly"));
    assert!(out.contains("has been successfully registered."));
    assert_eq!(
        console.service().calls().last(),
        Some(&Call::Register("000413250001".into(), "http://x/".into()))
    );
}

#[test]
fn test_end_of_input_ends_loop() {
    let mut console = TestConsole::new(FakeService::new());
    let out = drive(&mut console, "");
    assert!(out.ends_with("ops%> \n"));
}

#[test]
fn test_invalid_utf8_line_does_not_end_loop() {
    let mut console = TestConsole::new(FakeService::new());

    let out = drive_bytes(
        &mut console,
        b"version\n\xff\xfe\nadd 000413250001 http://x/\n",
    );

    assert!(out.contains("*** Unknown syntax"));
    assert!(out.contains("has been successfully registered."));
    assert_eq!(
        console.service().calls().last(),
        Some(&Call::Register("000413250001".into(), "http://x/".into()))
    );
    assert_eq!(console.session.history().len(), 3);
}

#[test]
fn test_one_shot_success_and_failure() {
    let service = FakeService::new().with_phone("000413250001", "acme", "http://a/");
    let mut console = TestConsole::new(service);

    let text = run_once(
        &mut console.session,
        &["check".to_string(), "000413250001".to_string()],
    )
    .unwrap();
    assert!(text.contains("is registered."));

    let err = run_once(
        &mut console.session,
        &["remove".to_string(), "nonsense".to_string()],
    )
    .unwrap_err();
    assert!(matches!(err, CommandError::InvalidIdentifier(_)));
}

#[test]
fn test_one_shot_exit_returns_no_text() {
    let mut console = TestConsole::new(FakeService::new());
    let text = run_once(&mut console.session, &["exit".to_string()]).unwrap();
    assert!(text.is_empty());
}
