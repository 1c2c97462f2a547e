//! # Event Service
//!
//! Facade over the event and user stores. Operations are split by audience:
//! the catalog lives here, the rest in `admin`, `participation` and
//! `registration`.

use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::UserRepository;

use super::errors::{EventError, EventResult};
use super::model::{CustomField, Event};
use super::repository::EventRepository;

/// A custom field as attached to one event
#[derive(Debug, Clone, Serialize)]
pub struct AssignedField {
    /// Key registrations are stored under
    pub event_custom_field_id: Uuid,
    #[serde(flatten)]
    pub field: CustomField,
}

/// An event with its registration forms
#[derive(Debug, Clone, Serialize)]
pub struct EventDetails {
    #[serde(flatten)]
    pub event: Event,
    pub custom_fields: Vec<AssignedField>,
}

pub struct EventService<R: EventRepository, U: UserRepository> {
    pub(super) repo: Arc<R>,
    pub(super) users: Arc<U>,
}

impl<R: EventRepository, U: UserRepository> EventService<R, U> {
    pub fn new(repo: Arc<R>, users: Arc<U>) -> Self {
        Self { repo, users }
    }

    /// All events with their assigned forms, oldest first
    pub fn list_events(&self) -> EventResult<Vec<EventDetails>> {
        self.repo
            .list_events()?
            .into_iter()
            .map(|event| self.details(event))
            .collect()
    }

    pub fn get_event(&self, event_id: Uuid) -> EventResult<EventDetails> {
        let event = self.require_event(event_id)?;
        self.details(event)
    }

    pub(super) fn require_event(&self, event_id: Uuid) -> EventResult<Event> {
        self.repo
            .find_event(event_id)?
            .ok_or(EventError::EventNotFound(event_id))
    }

    fn details(&self, event: Event) -> EventResult<EventDetails> {
        let mut custom_fields = Vec::new();

        for assignment in self.repo.assignments_for_event(event.id)? {
            // A field can only disappear if storage was edited behind our back
            if let Some(field) = self.repo.find_custom_field(assignment.field_id)? {
                custom_fields.push(AssignedField {
                    event_custom_field_id: assignment.id,
                    field,
                });
            }
        }

        Ok(EventDetails {
            event,
            custom_fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::InMemoryUserRepository;
    use crate::events::repository::InMemoryEventRepository;
    use crate::events::model::EventCustomField;
    use crate::forms::{FormDefinition, QuestionSpec};
    use chrono::Utc;

    fn service() -> EventService<InMemoryEventRepository, InMemoryUserRepository> {
        EventService::new(
            Arc::new(InMemoryEventRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
        )
    }

    #[test]
    fn test_get_missing_event() {
        let id = Uuid::new_v4();
        assert!(matches!(
            service().get_event(id),
            Err(EventError::EventNotFound(missing)) if missing == id
        ));
    }

    #[test]
    fn test_details_include_assignment_ids() {
        let service = service();
        let event = Event {
            id: Uuid::new_v4(),
            title: "Meetup".into(),
            description: "Monthly".into(),
            location: "Online".into(),
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        let field = CustomField {
            id: Uuid::new_v4(),
            field_name: "Dietary".into(),
            field_type: "form".into(),
            questions: FormDefinition::new(vec![QuestionSpec::text("Allergies")]),
            is_required: false,
        };
        let assignment = EventCustomField {
            id: Uuid::new_v4(),
            event_id: event.id,
            field_id: field.id,
        };
        service.repo.create_custom_field(&field).unwrap();
        service
            .repo
            .create_event(&event, &[assignment.clone()], &[])
            .unwrap();

        let details = service.get_event(event.id).unwrap();
        assert_eq!(details.custom_fields.len(), 1);
        assert_eq!(details.custom_fields[0].event_custom_field_id, assignment.id);
        assert_eq!(details.custom_fields[0].field.field_name, "Dietary");

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["title"], "Meetup");
        assert_eq!(json["custom_fields"][0]["field_name"], "Dietary");
        assert_eq!(
            json["custom_fields"][0]["event_custom_field_id"],
            assignment.id.to_string()
        );

        assert_eq!(service.list_events().unwrap().len(), 1);
    }
}
