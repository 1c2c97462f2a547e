//! Administrator operations: events, custom fields and their assignment

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{Identity, Role, UserRepository};
use crate::forms::{FormDefinition, QuestionSpec};
use crate::observability::{Event as LogEvent, Logger};

use super::errors::{EventError, EventResult};
use super::model::{CustomField, Event, EventCustomField, Participant};
use super::repository::EventRepository;
use super::service::{EventDetails, EventService};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub location: String,
    /// Forms to attach right away
    #[serde(default)]
    pub custom_field_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomFieldRequest {
    pub field_name: String,
    #[serde(default = "default_field_type")]
    pub field_type: String,
    pub questions: Vec<QuestionSpec>,
    #[serde(default)]
    pub is_required: bool,
}

fn default_field_type() -> String {
    "form".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignFieldsRequest {
    pub event_id: Uuid,
    pub field_ids: Vec<Uuid>,
}

fn require_non_blank(value: &str, what: &str) -> EventResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EventError::invalid(format!("{} is required", what)));
    }
    Ok(trimmed.to_string())
}

impl<R: EventRepository, U: UserRepository> EventService<R, U> {
    /// Publish an event.
    ///
    /// Every participant-role user is enrolled as tentative.
    pub fn create_event(
        &self,
        request: CreateEventRequest,
        admin: &Identity,
    ) -> EventResult<EventDetails> {
        admin.require_admin()?;

        let title = require_non_blank(&request.title, "title")?;
        let description = require_non_blank(&request.description, "description")?;
        let location = require_non_blank(&request.location, "location")?;

        let event = Event {
            id: Uuid::new_v4(),
            title,
            description,
            location,
            created_by: admin.user_id,
            created_at: Utc::now(),
        };

        let assignments = self.build_assignments(event.id, &request.custom_field_ids)?;

        let participants: Vec<Participant> = self
            .users
            .list_by_role(Role::Participant)?
            .iter()
            .map(|user| Participant::tentative(event.id, user.id))
            .collect();

        self.repo.create_event(&event, &assignments, &participants)?;

        let event_id = event.id.to_string();
        let enrolled = participants.len().to_string();
        Logger::event(
            LogEvent::EventCreated,
            &[("event_id", event_id.as_str()), ("participants", enrolled.as_str())],
        );

        self.get_event(event.id)
    }

    /// Define a reusable registration form
    pub fn create_custom_field(
        &self,
        request: CreateCustomFieldRequest,
        admin: &Identity,
    ) -> EventResult<CustomField> {
        admin.require_admin()?;

        let field_name = require_non_blank(&request.field_name, "field_name")?;
        let questions = FormDefinition::new(request.questions);
        questions.validate_structure()?;

        let field = CustomField {
            id: Uuid::new_v4(),
            field_name,
            field_type: request.field_type,
            questions,
            is_required: request.is_required,
        };
        self.repo.create_custom_field(&field)?;

        let field_id = field.id.to_string();
        let count = field.questions.len().to_string();
        Logger::event(
            LogEvent::CustomFieldCreated,
            &[("field_id", field_id.as_str()), ("questions", count.as_str())],
        );

        Ok(field)
    }

    /// Attach existing forms to an existing event
    pub fn assign_fields(
        &self,
        request: AssignFieldsRequest,
        admin: &Identity,
    ) -> EventResult<Vec<EventCustomField>> {
        admin.require_admin()?;

        self.require_event(request.event_id)?;
        if request.field_ids.is_empty() {
            return Err(EventError::invalid("field_ids must not be empty"));
        }

        let assignments = self.build_assignments(request.event_id, &request.field_ids)?;
        self.repo.add_assignments(&assignments)?;

        let event_id = request.event_id.to_string();
        let count = assignments.len().to_string();
        Logger::event(
            LogEvent::FieldsAssigned,
            &[("event_id", event_id.as_str()), ("fields", count.as_str())],
        );

        Ok(assignments)
    }

    pub fn list_custom_fields(&self, admin: &Identity) -> EventResult<Vec<CustomField>> {
        admin.require_admin()?;
        self.repo.list_custom_fields()
    }

    /// Remove an event with its participants, assignments, registrations and comments
    pub fn delete_event(&self, event_id: Uuid, admin: &Identity) -> EventResult<()> {
        admin.require_admin()?;

        if !self.repo.delete_event(event_id)? {
            return Err(EventError::EventNotFound(event_id));
        }

        let event_id = event_id.to_string();
        Logger::event(LogEvent::EventDeleted, &[("event_id", event_id.as_str())]);
        Ok(())
    }

    /// One assignment per field id; every id must exist
    fn build_assignments(
        &self,
        event_id: Uuid,
        field_ids: &[Uuid],
    ) -> EventResult<Vec<EventCustomField>> {
        let mut missing = Vec::new();
        for id in field_ids {
            if self.repo.find_custom_field(*id)?.is_none() {
                missing.push(*id);
            }
        }
        if !missing.is_empty() {
            return Err(EventError::InvalidFieldIds(missing));
        }

        Ok(field_ids
            .iter()
            .map(|field_id| EventCustomField {
                id: Uuid::new_v4(),
                event_id,
                field_id: *field_id,
            })
            .collect())
    }
}
