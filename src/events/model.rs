//! Event domain model
//!
//! An event owns form assignments (`EventCustomField`), participants and
//! comments. A registration belongs to one assignment and one user and holds
//! the enriched answers as an opaque JSON blob.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::forms::FormDefinition;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    /// Administrator who created the event
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A reusable registration form defined by an administrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    pub id: Uuid,
    pub field_name: String,
    pub field_type: String,
    pub questions: FormDefinition,
    pub is_required: bool,
}

/// Attachment of a custom field to an event.
///
/// Registrations are keyed by this id, not by the event or the field alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventCustomField {
    pub id: Uuid,
    pub event_id: Uuid,
    pub field_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    #[serde(rename = "tentative")]
    Tentative,
    #[serde(rename = "Available")]
    Available,
    #[serde(rename = "Not Available")]
    NotAvailable,
}

impl Availability {
    pub fn from_flag(is_available: bool) -> Self {
        if is_available {
            Availability::Available
        } else {
            Availability::NotAvailable
        }
    }

    /// Only an explicit yes counts; tentative is not available
    pub fn is_available(&self) -> bool {
        *self == Availability::Available
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub availability: Availability,
    pub registered_at: DateTime<Utc>,
}

impl Participant {
    /// Enrollment created when an event is published
    pub fn tentative(event_id: Uuid, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            user_id,
            availability: Availability::Tentative,
            registered_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub posted_at: DateTime<Utc>,
}

/// Stored answers of one user for one form assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub id: Uuid,
    pub event_custom_field_id: Uuid,
    pub user_id: Uuid,
    /// Serialized list of enriched answers
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_wire_names() {
        assert_eq!(
            serde_json::to_string(&Availability::Tentative).unwrap(),
            "\"tentative\""
        );
        assert_eq!(
            serde_json::to_string(&Availability::NotAvailable).unwrap(),
            "\"Not Available\""
        );
        assert_eq!(
            serde_json::from_str::<Availability>("\"Available\"").unwrap(),
            Availability::Available
        );
    }

    #[test]
    fn test_availability_flag() {
        assert!(Availability::from_flag(true).is_available());
        assert!(!Availability::from_flag(false).is_available());
        assert!(!Availability::Tentative.is_available());
    }

    #[test]
    fn test_new_participant_is_tentative() {
        let participant = Participant::tentative(Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(participant.availability, Availability::Tentative);
    }
}
