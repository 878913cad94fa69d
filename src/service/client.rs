//! XML-RPC over HTTPS client for the redirection service.

use super::xmlrpc::{decode_response, encode_call, tagged, Value};
use super::{Redirection, RedirectionService, Reply};
use crate::auth::Credentials;
use crate::config::ServiceConfig;
use crate::device::Model;
use crate::error::ServiceError;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, instrument};

// Map HTTP errors to ServiceError
fn map_http_error(error: reqwest::Error) -> ServiceError {
    if error.is_timeout() {
        ServiceError::Connection(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        ServiceError::Connection(format!("Connection error: {}", error))
    } else {
        ServiceError::Connection(format!("HTTP error: {}", error))
    }
}

fn build_http_client(config: &ServiceConfig) -> Result<Client, ServiceError> {
    Client::builder()
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .map_err(|e| ServiceError::Setup(format!("Failed to create HTTP client: {}", e)))
}

/// Blocking client: each call runs the async request to completion on a private
/// runtime before returning.
pub struct XmlRpcRedirectionClient {
    runtime: Runtime,
    client: Client,
    endpoint: String,
    credentials: Credentials,
}

impl XmlRpcRedirectionClient {
    pub fn new(config: &ServiceConfig, credentials: Credentials) -> Result<Self, ServiceError> {
        let runtime = Runtime::new()
            .map_err(|e| ServiceError::Setup(format!("Failed to create runtime: {}", e)))?;
        let client = build_http_client(config)?;
        Ok(Self {
            runtime,
            client,
            endpoint: config.endpoint.clone(),
            credentials,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Perform one procedure call and decode its single return value.
    #[instrument(skip(self, params), fields(endpoint = %self.endpoint))]
    pub fn call(&self, method: &str, params: &[Value]) -> Result<Value, ServiceError> {
        let body = encode_call(method, params);
        let text = self.runtime.block_on(self.post(body))?;
        debug!(method, bytes = text.len(), "Received response");
        decode_response(&text)
    }

    async fn post(&self, body: String) -> Result<String, ServiceError> {
        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .header(CONTENT_TYPE, "text/xml")
            .body(body)
            .send()
            .await
            .map_err(map_http_error)?;

        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        match status.as_u16() {
            401 | 403 => Err(ServiceError::Unauthorized(format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            ))),
            _ if !status.is_success() => Err(ServiceError::Status {
                status: status.as_u16(),
                body: text,
            }),
            _ => Ok(text),
        }
    }

    fn call_tagged(&self, method: &str, params: &[Value]) -> Result<Reply<Vec<Value>>, ServiceError> {
        tagged(self.call(method, params)?)
    }
}

impl RedirectionService for XmlRpcRedirectionClient {
    fn echo(&self, message: &str) -> Result<String, ServiceError> {
        match self.call("network.echo", &[Value::from(message)])? {
            Value::String(s) => Ok(s),
            other => Ok(format!("{:?}", other)),
        }
    }

    fn check(&self, id: &str) -> Result<Reply<()>, ServiceError> {
        Ok(self
            .call_tagged("redirect.checkPhone", &[Value::from(id)])?
            .map(|_| ()))
    }

    fn register(&self, id: &str, url: &str) -> Result<Reply<()>, ServiceError> {
        Ok(self
            .call_tagged("redirect.registerPhone", &[Value::from(id), Value::from(url)])?
            .map(|_| ()))
    }

    fn deregister(&self, id: &str) -> Result<Reply<()>, ServiceError> {
        Ok(self
            .call_tagged("redirect.deregisterPhone", &[Value::from(id)])?
            .map(|_| ()))
    }

    /// The service answers with a bare array of identifiers, or with a tagged
    /// `(false, code)` failure.
    fn list(&self, model: Model, url: Option<&str>) -> Result<Reply<Vec<String>>, ServiceError> {
        let value = self.call(
            "redirect.listPhones",
            &[Value::from(model.as_str()), Value::from(url)],
        )?;
        let items = match value {
            Value::Array(items) => items,
            Value::Nil => Vec::new(),
            other => {
                return Err(ServiceError::Decode(format!(
                    "listPhones returned {:?}",
                    other
                )))
            }
        };
        if items.first().and_then(Value::as_bool).is_some() {
            return tagged(Value::Array(items)).map(|reply| {
                reply.map(|rest| {
                    rest.into_iter()
                        .filter_map(|v| v.as_str().map(str::to_ascii_uppercase))
                        .collect()
                })
            });
        }
        items
            .into_iter()
            .map(|v| match v {
                Value::String(id) => Ok(id.to_ascii_uppercase()),
                other => Err(ServiceError::Decode(format!(
                    "listPhones returned a non-string entry {:?}",
                    other
                ))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Reply::Success)
    }

    /// Success payload is `(owner, target)`; either may be empty or nil.
    fn get_redirection(&self, id: &str) -> Result<Reply<Redirection>, ServiceError> {
        let reply = self.call_tagged("redirect.getPhoneRedirection", &[Value::from(id)])?;
        Ok(reply.map(|rest| {
            let mut fields = rest.into_iter().map(|v| match v {
                Value::String(s) => s,
                _ => String::new(),
            });
            Redirection {
                owner: fields.next().unwrap_or_default(),
                target: fields.next().unwrap_or_default(),
            }
        }))
    }
}
