//! Redirection Console
//!
//! Operator console for the phone redirection service: classifies hardware
//! identifiers into device models and registers, updates, removes and inspects
//! their provisioning redirections over XML-RPC.

pub mod auth;
pub mod cli;
pub mod config;
pub mod device;
pub mod error;
pub mod logging;
pub mod service;
pub mod session;
pub mod settings;
pub mod vars;
