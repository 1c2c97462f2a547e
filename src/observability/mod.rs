//! Observability subsystem
//!
//! Structured JSON logging with typed event names.
//!
//! # Usage
//!
//! ```ignore
//! use eventdesk::observability::{Event, Logger};
//!
//! Logger::event(Event::RegistrationAccepted, &[("user_id", "42")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};
