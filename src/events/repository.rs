//! # Event Repository
//!
//! Storage for events, forms, assignments, participants, comments and
//! registrations. Multi-table writes (event creation, event deletion) are
//! atomic.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use super::errors::{EventError, EventResult};
use super::model::{Comment, CustomField, Event, EventCustomField, Participant, Registration};

/// Event repository trait
pub trait EventRepository: Send + Sync {
    /// Store an event together with its form assignments and initial participants
    fn create_event(
        &self,
        event: &Event,
        assignments: &[EventCustomField],
        participants: &[Participant],
    ) -> EventResult<()>;

    fn find_event(&self, id: Uuid) -> EventResult<Option<Event>>;

    /// All events, oldest first
    fn list_events(&self) -> EventResult<Vec<Event>>;

    /// Remove an event and everything hanging off it. Returns false if absent.
    fn delete_event(&self, id: Uuid) -> EventResult<bool>;

    fn create_custom_field(&self, field: &CustomField) -> EventResult<()>;

    fn find_custom_field(&self, id: Uuid) -> EventResult<Option<CustomField>>;

    fn list_custom_fields(&self) -> EventResult<Vec<CustomField>>;

    fn add_assignments(&self, assignments: &[EventCustomField]) -> EventResult<()>;

    fn find_assignment(&self, id: Uuid) -> EventResult<Option<EventCustomField>>;

    fn assignments_for_event(&self, event_id: Uuid) -> EventResult<Vec<EventCustomField>>;

    fn find_participant(&self, id: Uuid) -> EventResult<Option<Participant>>;

    fn participants_for_event(&self, event_id: Uuid) -> EventResult<Vec<Participant>>;

    fn update_participant(&self, participant: &Participant) -> EventResult<()>;

    fn add_comment(&self, comment: &Comment) -> EventResult<()>;

    fn comments_for_event(&self, event_id: Uuid) -> EventResult<Vec<Comment>>;

    /// Insert or overwrite the registration for (assignment, user).
    ///
    /// Last write wins; an overwrite keeps the registration id.
    fn upsert_registration(
        &self,
        event_custom_field_id: Uuid,
        user_id: Uuid,
        value: String,
    ) -> EventResult<Registration>;

    fn registrations_for(
        &self,
        user_id: Uuid,
        event_custom_field_id: Uuid,
    ) -> EventResult<Vec<Registration>>;
}

#[derive(Debug, Default)]
struct Tables {
    events: Vec<Event>,
    custom_fields: Vec<CustomField>,
    assignments: Vec<EventCustomField>,
    participants: Vec<Participant>,
    comments: Vec<Comment>,
    registrations: HashMap<(Uuid, Uuid), Registration>,
}

/// In-memory event repository
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    tables: RwLock<Tables>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> EventResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| EventError::StorageError("Lock poisoned".to_string()))
    }

    fn write(&self) -> EventResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| EventError::StorageError("Lock poisoned".to_string()))
    }
}

impl EventRepository for InMemoryEventRepository {
    fn create_event(
        &self,
        event: &Event,
        assignments: &[EventCustomField],
        participants: &[Participant],
    ) -> EventResult<()> {
        let mut tables = self.write()?;
        tables.events.push(event.clone());
        tables.assignments.extend_from_slice(assignments);
        tables.participants.extend_from_slice(participants);
        Ok(())
    }

    fn find_event(&self, id: Uuid) -> EventResult<Option<Event>> {
        Ok(self.read()?.events.iter().find(|e| e.id == id).cloned())
    }

    fn list_events(&self) -> EventResult<Vec<Event>> {
        Ok(self.read()?.events.clone())
    }

    fn delete_event(&self, id: Uuid) -> EventResult<bool> {
        let mut tables = self.write()?;

        let before = tables.events.len();
        tables.events.retain(|e| e.id != id);
        if tables.events.len() == before {
            return Ok(false);
        }

        let assignment_ids: Vec<Uuid> = tables
            .assignments
            .iter()
            .filter(|a| a.event_id == id)
            .map(|a| a.id)
            .collect();

        tables.assignments.retain(|a| a.event_id != id);
        tables.participants.retain(|p| p.event_id != id);
        tables.comments.retain(|c| c.event_id != id);
        tables
            .registrations
            .retain(|(ecf_id, _), _| !assignment_ids.contains(ecf_id));

        Ok(true)
    }

    fn create_custom_field(&self, field: &CustomField) -> EventResult<()> {
        self.write()?.custom_fields.push(field.clone());
        Ok(())
    }

    fn find_custom_field(&self, id: Uuid) -> EventResult<Option<CustomField>> {
        Ok(self
            .read()?
            .custom_fields
            .iter()
            .find(|f| f.id == id)
            .cloned())
    }

    fn list_custom_fields(&self) -> EventResult<Vec<CustomField>> {
        Ok(self.read()?.custom_fields.clone())
    }

    fn add_assignments(&self, assignments: &[EventCustomField]) -> EventResult<()> {
        self.write()?.assignments.extend_from_slice(assignments);
        Ok(())
    }

    fn find_assignment(&self, id: Uuid) -> EventResult<Option<EventCustomField>> {
        Ok(self
            .read()?
            .assignments
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    fn assignments_for_event(&self, event_id: Uuid) -> EventResult<Vec<EventCustomField>> {
        Ok(self
            .read()?
            .assignments
            .iter()
            .filter(|a| a.event_id == event_id)
            .cloned()
            .collect())
    }

    fn find_participant(&self, id: Uuid) -> EventResult<Option<Participant>> {
        Ok(self
            .read()?
            .participants
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    fn participants_for_event(&self, event_id: Uuid) -> EventResult<Vec<Participant>> {
        Ok(self
            .read()?
            .participants
            .iter()
            .filter(|p| p.event_id == event_id)
            .cloned()
            .collect())
    }

    fn update_participant(&self, participant: &Participant) -> EventResult<()> {
        let mut tables = self.write()?;
        match tables.participants.iter_mut().find(|p| p.id == participant.id) {
            Some(existing) => {
                *existing = participant.clone();
                Ok(())
            }
            None => Err(EventError::ParticipantNotFound(participant.id)),
        }
    }

    fn add_comment(&self, comment: &Comment) -> EventResult<()> {
        self.write()?.comments.push(comment.clone());
        Ok(())
    }

    fn comments_for_event(&self, event_id: Uuid) -> EventResult<Vec<Comment>> {
        Ok(self
            .read()?
            .comments
            .iter()
            .filter(|c| c.event_id == event_id)
            .cloned()
            .collect())
    }

    fn upsert_registration(
        &self,
        event_custom_field_id: Uuid,
        user_id: Uuid,
        value: String,
    ) -> EventResult<Registration> {
        let mut tables = self.write()?;
        let now = Utc::now();

        let registration = tables
            .registrations
            .entry((event_custom_field_id, user_id))
            .and_modify(|existing| {
                existing.value = value.clone();
                existing.updated_at = now;
            })
            .or_insert_with(|| Registration {
                id: Uuid::new_v4(),
                event_custom_field_id,
                user_id,
                value,
                updated_at: now,
            });

        Ok(registration.clone())
    }

    fn registrations_for(
        &self,
        user_id: Uuid,
        event_custom_field_id: Uuid,
    ) -> EventResult<Vec<Registration>> {
        Ok(self
            .read()?
            .registrations
            .get(&(event_custom_field_id, user_id))
            .cloned()
            .into_iter()
            .collect())
    }
}
