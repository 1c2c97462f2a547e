//! Observable events
//!
//! Every line the service logs names one of these.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Startup begins
    BootStart,
    /// Configuration loaded
    ConfigLoaded,
    /// Bootstrap administrator present
    AdminSeeded,
    /// Listening for requests
    Serving,
    /// Server stopped
    ShutdownComplete,
    /// A configured CORS origin is not a valid header value
    CorsOriginSkipped,

    // Transport
    /// One HTTP request handled
    RequestCompleted,

    // Accounts
    LoginSucceeded,
    LoginFailed,
    UserCreated,

    // Administration
    EventCreated,
    EventDeleted,
    CustomFieldCreated,
    FieldsAssigned,

    // Participation
    AvailabilityUpdated,
    CommentAdded,

    // Registration
    /// Submission passed validation and was stored
    RegistrationAccepted,
    /// Submission failed validation
    RegistrationRejected,
    /// A stored submission could not be decoded
    RegistrationDecodeFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "BOOT_START",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::AdminSeeded => "ADMIN_SEEDED",
            Event::Serving => "SERVING",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",
            Event::CorsOriginSkipped => "CORS_ORIGIN_SKIPPED",

            Event::RequestCompleted => "REQUEST_COMPLETED",

            Event::LoginSucceeded => "LOGIN_SUCCEEDED",
            Event::LoginFailed => "LOGIN_FAILED",
            Event::UserCreated => "USER_CREATED",

            Event::EventCreated => "EVENT_CREATED",
            Event::EventDeleted => "EVENT_DELETED",
            Event::CustomFieldCreated => "CUSTOM_FIELD_CREATED",
            Event::FieldsAssigned => "FIELDS_ASSIGNED",

            Event::AvailabilityUpdated => "AVAILABILITY_UPDATED",
            Event::CommentAdded => "COMMENT_ADDED",

            Event::RegistrationAccepted => "REGISTRATION_ACCEPTED",
            Event::RegistrationRejected => "REGISTRATION_REJECTED",
            Event::RegistrationDecodeFailed => "REGISTRATION_DECODE_FAILED",
        }
    }

    /// Severity this event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::RequestCompleted => Severity::Debug,
            Event::LoginFailed | Event::RegistrationRejected | Event::CorsOriginSkipped => {
                Severity::Warn
            }
            Event::RegistrationDecodeFailed => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
