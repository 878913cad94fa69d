//! Shared test utilities for integration tests
//!
//! A stateful, recording [`RedirectionService`] fake, a scripted credential
//! source, and a loopback HTTP responder for exercising the XML-RPC client.

use redirect_console::auth::CredentialSource;
use redirect_console::device::{self, Model};
use redirect_console::error::{AuthError, ServiceError, ServiceFault};
use redirect_console::service::{Redirection, RedirectionService, Reply};
use redirect_console::session::Session;
use redirect_console::settings::{Settings, SettingsFile};
use redirect_console::vars::VariableStore;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use tempfile::TempDir;

/// One recorded procedure call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Echo(String),
    Check(String),
    Register(String, String),
    Deregister(String),
    List(Model, Option<String>),
    GetRedirection(String),
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        matches!(self, Call::Register(..) | Call::Deregister(_))
    }
}

/// In-memory redirection service. Registered phones are owned by `owner`.
#[derive(Debug)]
pub struct FakeService {
    pub owner: String,
    calls: RefCell<Vec<Call>>,
    phones: RefCell<BTreeMap<String, Redirection>>,
    register_fault: RefCell<Option<ServiceFault>>,
    offline: Cell<bool>,
    login_ok: bool,
}

impl Default for FakeService {
    fn default() -> Self {
        Self {
            owner: "acme".to_string(),
            calls: RefCell::new(Vec::new()),
            phones: RefCell::new(BTreeMap::new()),
            register_fault: RefCell::new(None),
            offline: Cell::new(false),
            login_ok: true,
        }
    }
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Service whose echo fails with an authentication error.
    pub fn refusing_login() -> Self {
        Self {
            login_ok: false,
            ..Self::default()
        }
    }

    pub fn with_phone(self, id: &str, owner: &str, target: &str) -> Self {
        self.phones.borrow_mut().insert(
            id.to_string(),
            Redirection {
                owner: owner.to_string(),
                target: target.to_string(),
            },
        );
        self
    }

    pub fn fail_register_with(&self, fault: ServiceFault) {
        *self.register_fault.borrow_mut() = Some(fault);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn redirection(&self, id: &str) -> Option<Redirection> {
        self.phones.borrow().get(id).cloned()
    }

    fn record(&self, call: Call) -> Result<(), ServiceError> {
        self.calls.borrow_mut().push(call);
        if self.offline.get() {
            return Err(ServiceError::Connection("connection refused".to_string()));
        }
        Ok(())
    }
}

impl RedirectionService for FakeService {
    fn echo(&self, message: &str) -> Result<String, ServiceError> {
        self.record(Call::Echo(message.to_string()))?;
        if self.login_ok {
            Ok(message.to_string())
        } else {
            Err(ServiceError::Unauthorized("401 Unauthorized".to_string()))
        }
    }

    fn check(&self, id: &str) -> Result<Reply<()>, ServiceError> {
        self.record(Call::Check(id.to_string()))?;
        if self.phones.borrow().contains_key(id) {
            Ok(Reply::Success(()))
        } else {
            Ok(Reply::Failure(ServiceFault::UnknownIdentifier))
        }
    }

    fn register(&self, id: &str, url: &str) -> Result<Reply<()>, ServiceError> {
        self.record(Call::Register(id.to_string(), url.to_string()))?;
        if let Some(fault) = self.register_fault.borrow().clone() {
            return Ok(Reply::Failure(fault));
        }
        self.phones.borrow_mut().insert(
            id.to_string(),
            Redirection {
                owner: self.owner.clone(),
                target: url.to_string(),
            },
        );
        Ok(Reply::Success(()))
    }

    fn deregister(&self, id: &str) -> Result<Reply<()>, ServiceError> {
        self.record(Call::Deregister(id.to_string()))?;
        match self.phones.borrow_mut().remove(id) {
            Some(_) => Ok(Reply::Success(())),
            None => Ok(Reply::Failure(ServiceFault::UnknownIdentifier)),
        }
    }

    fn list(&self, model: Model, url: Option<&str>) -> Result<Reply<Vec<String>>, ServiceError> {
        self.record(Call::List(model, url.map(str::to_string)))?;
        let ids = self
            .phones
            .borrow()
            .iter()
            .filter(|(id, _)| device::classify(id) == Some(model))
            .filter(|(_, r)| url.map_or(true, |u| r.target == u))
            .map(|(id, _)| id.clone())
            .collect();
        Ok(Reply::Success(ids))
    }

    fn get_redirection(&self, id: &str) -> Result<Reply<Redirection>, ServiceError> {
        self.record(Call::GetRedirection(id.to_string()))?;
        match self.phones.borrow().get(id) {
            Some(r) => Ok(Reply::Success(r.clone())),
            None => Ok(Reply::Failure(ServiceFault::UnknownIdentifier)),
        }
    }
}

/// Session over a fake service with its settings file in a temp dir.
pub struct TestConsole {
    pub session: Session<FakeService>,
    pub settings_file: SettingsFile,
    _dir: TempDir,
}

impl TestConsole {
    pub fn new(service: FakeService) -> Self {
        Self::with_settings(service, Settings::default())
    }

    pub fn with_settings(service: FakeService, settings: Settings) -> Self {
        let dir = TempDir::new().unwrap();
        let settings_file = SettingsFile::new(dir.path().join("settings"));
        let session = Session::new(
            service,
            settings,
            VariableStore::new(),
            settings_file.clone(),
        );
        Self {
            session,
            settings_file,
            _dir: dir,
        }
    }

    pub fn service(&self) -> &FakeService {
        self.session.service()
    }

    /// Run a line and return its text; panics on command errors.
    pub fn run(&mut self, line: &str) -> String {
        match self.session.execute(line) {
            Ok(redirect_console::session::Flow::Continue(text)) => text,
            Ok(redirect_console::session::Flow::Exit) => panic!("{:?} ended the session", line),
            Err(e) => panic!("{:?} failed: {}", line, e),
        }
    }
}

/// Credential source answering from a script.
pub struct ScriptedCredentials {
    pub username: String,
    pub passwords: VecDeque<String>,
    pub username_prompts: usize,
    pub password_prompts: usize,
    pub rejections: Vec<String>,
}

impl ScriptedCredentials {
    pub fn new(username: &str, passwords: &[&str]) -> Self {
        Self {
            username: username.to_string(),
            passwords: passwords.iter().map(|p| p.to_string()).collect(),
            username_prompts: 0,
            password_prompts: 0,
            rejections: Vec::new(),
        }
    }
}

impl CredentialSource for ScriptedCredentials {
    fn username(&mut self) -> Result<String, AuthError> {
        self.username_prompts += 1;
        Ok(self.username.clone())
    }

    fn password(&mut self) -> Result<String, AuthError> {
        self.password_prompts += 1;
        self.passwords
            .pop_front()
            .ok_or_else(|| AuthError::Prompt("script exhausted".to_string()))
    }

    fn rejected(&mut self, reason: &str) {
        self.rejections.push(reason.to_string());
    }
}

/// Canned HTTP response for the loopback responder.
pub struct CannedResponse {
    pub status: u16,
    pub body: String,
}

impl CannedResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
        }
    }
}

/// A request as seen by the loopback responder.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub headers: Vec<String>,
    pub body: String,
}

impl SeenRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        let prefix = format!("{}:", name.to_ascii_lowercase());
        self.headers.iter().find_map(|line| {
            line.to_ascii_lowercase()
                .starts_with(&prefix)
                .then(|| line[prefix.len()..].trim())
        })
    }
}

/// HTTP/1.1 responder on 127.0.0.1 answering one connection per canned response.
pub struct LoopbackServer {
    pub endpoint: String,
    pub requests: Arc<Mutex<Vec<SeenRequest>>>,
    handle: Option<JoinHandle<()>>,
}

impl LoopbackServer {
    pub fn start(responses: Vec<CannedResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);

        let handle = thread::spawn(move || {
            for canned in responses {
                let Ok((stream, _)) = listener.accept() else {
                    return;
                };
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut headers = Vec::new();
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).unwrap_or(0) == 0 {
                        break;
                    }
                    let line = line.trim_end().to_string();
                    if line.is_empty() {
                        break;
                    }
                    headers.push(line);
                }
                let length = headers
                    .iter()
                    .find_map(|h| {
                        let lower = h.to_ascii_lowercase();
                        lower
                            .strip_prefix("content-length:")
                            .and_then(|v| v.trim().parse::<usize>().ok())
                    })
                    .unwrap_or(0);
                let mut body = vec![0u8; length];
                reader.read_exact(&mut body).unwrap();
                seen.lock().unwrap().push(SeenRequest {
                    headers,
                    body: String::from_utf8_lossy(&body).into_owned(),
                });

                let mut stream = stream;
                let response = format!(
                    "HTTP/1.1 {} Canned\r\nContent-Type: text/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    canned.status,
                    canned.body.len(),
                    canned.body
                );
                stream.write_all(response.as_bytes()).unwrap();
                stream.flush().unwrap();
            }
        });

        Self {
            endpoint: format!("http://127.0.0.1:{}/xmlrpc/", port),
            requests,
            handle: Some(handle),
        }
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Wait for every canned response to be served.
    pub fn join(mut self) -> Vec<SeenRequest> {
        if let Some(handle) = self.handle.take() {
            handle.join().unwrap();
        }
        self.requests()
    }
}

/// XML-RPC method response carrying `inner` as its single value.
pub fn method_response(inner: &str) -> String {
    format!(
        "<?xml version=\"1.0\"?>\n<methodResponse><params><param><value>{}</value></param></params></methodResponse>",
        inner
    )
}
