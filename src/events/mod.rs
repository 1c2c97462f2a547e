//! # Events Module
//!
//! Events, their registration forms, participants, comments and stored
//! registrations. `EventService` is the single entry point; authorization is
//! checked against the caller's [`Identity`](crate::auth::Identity).

pub mod admin;
pub mod errors;
pub mod model;
pub mod participation;
pub mod registration;
pub mod repository;
pub mod service;

pub use admin::{AssignFieldsRequest, CreateCustomFieldRequest, CreateEventRequest};
pub use errors::{EventError, EventResult};
pub use model::{
    Availability, Comment, CustomField, Event, EventCustomField, Participant, Registration,
};
pub use participation::{
    AddCommentRequest, CommentView, ParticipantView, UpdateAvailabilityRequest,
};
pub use registration::{RegistrationView, SubmitRegistrationRequest};
pub use repository::{EventRepository, InMemoryEventRepository};
pub use service::{AssignedField, EventDetails, EventService};
