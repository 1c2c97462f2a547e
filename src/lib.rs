//! eventdesk - event management with validated registration forms
//!
//! Administrators publish events and attach custom registration forms;
//! participants answer them. Every submission is checked against the form
//! before anything is stored.

pub mod auth;
pub mod cli;
pub mod events;
pub mod forms;
pub mod http_server;
pub mod observability;
