//! Redirection Service Boundary
//!
//! The remote provisioning service is reached through logical procedure calls.
//! Each call either fails in transport ([`ServiceError`]) or returns a tagged
//! [`Reply`]: a success payload, or a failure carrying a [`ServiceFault`] code.
//! The interpreter only sees the [`RedirectionService`] trait; the XML-RPC client
//! is one implementation and tests use a recording fake.

use crate::device::Model;
use crate::error::{ServiceError, ServiceFault};

pub mod client;
pub mod xmlrpc;

pub use client::XmlRpcRedirectionClient;

/// Tagged reply of a remote procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply<T> {
    Success(T),
    Failure(ServiceFault),
}

impl<T> Reply<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Reply::Success(_))
    }

    /// Convert into a `Result`, failures becoming the fault.
    pub fn into_result(self) -> Result<T, ServiceFault> {
        match self {
            Reply::Success(value) => Ok(value),
            Reply::Failure(fault) => Err(fault),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reply<U> {
        match self {
            Reply::Success(value) => Reply::Success(f(value)),
            Reply::Failure(fault) => Reply::Failure(fault),
        }
    }
}

/// Owner and target of a registered identifier. Empty strings mean "none".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Redirection {
    pub owner: String,
    pub target: String,
}

impl Redirection {
    pub fn is_redirected(&self) -> bool {
        !self.target.is_empty()
    }
}

/// Capability set of the remote redirection service.
///
/// Identifiers are passed as normalized uppercase strings. Every call is a live
/// round trip; implementations do not cache.
pub trait RedirectionService {
    /// `network.echo`: used to validate credentials.
    fn echo(&self, message: &str) -> Result<String, ServiceError>;

    /// `redirect.checkPhone`: success means the identifier is registered.
    fn check(&self, id: &str) -> Result<Reply<()>, ServiceError>;

    /// `redirect.registerPhone`
    fn register(&self, id: &str, url: &str) -> Result<Reply<()>, ServiceError>;

    /// `redirect.deregisterPhone`
    fn deregister(&self, id: &str) -> Result<Reply<()>, ServiceError>;

    /// `redirect.listPhones`: identifiers of `model` owned by the caller, optionally
    /// only those pointing at `url`.
    fn list(&self, model: Model, url: Option<&str>) -> Result<Reply<Vec<String>>, ServiceError>;

    /// `redirect.getPhoneRedirection`
    fn get_redirection(&self, id: &str) -> Result<Reply<Redirection>, ServiceError>;
}

impl<S: RedirectionService + ?Sized> RedirectionService for Box<S> {
    fn echo(&self, message: &str) -> Result<String, ServiceError> {
        (**self).echo(message)
    }

    fn check(&self, id: &str) -> Result<Reply<()>, ServiceError> {
        (**self).check(id)
    }

    fn register(&self, id: &str, url: &str) -> Result<Reply<()>, ServiceError> {
        (**self).register(id, url)
    }

    fn deregister(&self, id: &str) -> Result<Reply<()>, ServiceError> {
        (**self).deregister(id)
    }

    fn list(&self, model: Model, url: Option<&str>) -> Result<Reply<Vec<String>>, ServiceError> {
        (**self).list(model, url)
    }

    fn get_redirection(&self, id: &str) -> Result<Reply<Redirection>, ServiceError> {
        (**self).get_redirection(id)
    }
}
