//! Integration tests for the startup credential gate

use redirect_console::auth::{authenticate, Credentials, MAX_PASSWORD_ATTEMPTS, PING};
use redirect_console::error::{AuthError, ServiceError};
use redirect_console::session::{Flow, Session};
use redirect_console::settings::{Settings, SettingsFile};
use redirect_console::vars::VariableStore;
use std::cell::RefCell;
use tempfile::TempDir;

use crate::integration::test_utils::{Call, FakeService, ScriptedCredentials};

/// Connector accepting only `good` and remembering every attempt.
fn connector<'a>(
    good: &'a str,
    attempts: &'a RefCell<Vec<Credentials>>,
) -> impl FnMut(&Credentials) -> Result<FakeService, ServiceError> + 'a {
    move |credentials| {
        attempts.borrow_mut().push(credentials.clone());
        if credentials.password == good {
            Ok(FakeService::new())
        } else {
            Ok(FakeService::refusing_login())
        }
    }
}

#[test]
fn test_stored_credentials_skip_prompts() {
    let settings = Settings {
        username: "ops".into(),
        password: "right".into(),
        ..Settings::default()
    };
    let mut source = ScriptedCredentials::new("unused", &[]);
    let attempts = RefCell::new(Vec::new());

    let (credentials, service) =
        authenticate(&settings, &mut source, connector("right", &attempts)).unwrap();

    assert_eq!(credentials, Credentials::new("ops", "right"));
    assert_eq!(service.calls(), vec![Call::Echo(PING.to_string())]);
    assert_eq!(source.username_prompts, 0);
    assert_eq!(source.password_prompts, 0);
}

#[test]
fn test_stored_password_refused_does_not_use_a_prompt() {
    let settings = Settings {
        username: "ops".into(),
        password: "stale".into(),
        ..Settings::default()
    };
    let mut source = ScriptedCredentials::new("unused", &["wrong", "wrong", "right"]);
    let attempts = RefCell::new(Vec::new());

    let (credentials, _) =
        authenticate(&settings, &mut source, connector("right", &attempts)).unwrap();

    assert_eq!(credentials.password, "right");
    assert_eq!(source.password_prompts, 3);
    assert_eq!(attempts.borrow().len(), 4);
    assert_eq!(source.rejections.len(), 3);
}

#[test]
fn test_prompts_for_username_when_not_stored() {
    let mut source = ScriptedCredentials::new("  ops  ", &["right"]);
    let attempts = RefCell::new(Vec::new());

    let (credentials, _) =
        authenticate(&Settings::default(), &mut source, connector("right", &attempts)).unwrap();

    assert_eq!(credentials.username, "ops");
    assert_eq!(source.username_prompts, 1);
}

#[test]
fn test_third_wrong_password_gives_up() {
    let mut source = ScriptedCredentials::new("ops", &["a", "b", "c", "right"]);
    let attempts = RefCell::new(Vec::new());

    let err = authenticate(&Settings::default(), &mut source, connector("right", &attempts))
        .unwrap_err();

    assert!(matches!(err, AuthError::TooManyAttempts));
    assert_eq!(err.to_string(), "Three wrong passwords provided. Exiting.");
    assert_eq!(source.password_prompts, MAX_PASSWORD_ATTEMPTS as usize);
    assert_eq!(source.passwords.len(), 1);
}

#[test]
fn test_empty_password_counts_as_attempt() {
    let mut source = ScriptedCredentials::new("ops", &["", "", ""]);
    let attempts = RefCell::new(Vec::new());

    let err = authenticate(&Settings::default(), &mut source, connector("right", &attempts))
        .unwrap_err();

    assert!(matches!(err, AuthError::TooManyAttempts));
    assert!(attempts.borrow().is_empty());
}

#[test]
fn test_client_setup_failure_is_fatal() {
    let mut source = ScriptedCredentials::new("ops", &["right", "right"]);

    let result = authenticate::<FakeService, _>(&Settings::default(), &mut source, |_| {
        Err(ServiceError::Setup("no runtime".into()))
    });

    assert!(matches!(result, Err(AuthError::Connect(_))));
    assert_eq!(source.password_prompts, 1);
}

#[test]
fn test_prompted_credentials_are_stored_by_defaults_store() {
    let dir = TempDir::new().unwrap();
    let settings_file = SettingsFile::new(dir.path().join("settings"));
    let mut source = ScriptedCredentials::new("ops", &["right"]);
    let attempts = RefCell::new(Vec::new());

    let (credentials, service) =
        authenticate(&Settings::default(), &mut source, connector("right", &attempts)).unwrap();
    let mut session = Session::authenticated(
        service,
        &credentials,
        Settings::default(),
        VariableStore::new(),
        settings_file.clone(),
    );

    assert!(matches!(
        session.execute("defaults store").unwrap(),
        Flow::Continue(_)
    ));

    let (stored, _) = settings_file.load().unwrap();
    assert_eq!(stored.username, "ops");
    assert_eq!(stored.password, "right");
}
