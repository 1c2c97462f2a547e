//! Participant lists, availability and event comments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{Identity, UserRepository};
use crate::observability::{Event as LogEvent, Logger};

use super::errors::{EventError, EventResult};
use super::model::{Availability, Comment};
use super::repository::EventRepository;
use super::service::EventService;

/// A participant joined with the user's profile
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantView {
    pub participant_id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub availability: Availability,
    pub is_available: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub participant_id: Uuid,
    pub is_available: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddCommentRequest {
    pub event_id: Uuid,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub comment_id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentView {
    fn from(comment: Comment) -> Self {
        Self {
            comment_id: comment.id,
            event_id: comment.event_id,
            user_id: comment.user_id,
            content: comment.message,
            created_at: comment.posted_at,
        }
    }
}

impl<R: EventRepository, U: UserRepository> EventService<R, U> {
    pub fn participants_for_event(&self, event_id: Uuid) -> EventResult<Vec<ParticipantView>> {
        self.require_event(event_id)?;

        let mut views = Vec::new();
        for participant in self.repo.participants_for_event(event_id)? {
            // Users are never deleted, but don't fail the whole list if one is gone
            let Some(user) = self.users.find_by_id(participant.user_id)? else {
                continue;
            };
            views.push(ParticipantView {
                participant_id: participant.id,
                event_id: participant.event_id,
                user_id: participant.user_id,
                name: user.name,
                email: user.email,
                availability: participant.availability,
                is_available: participant.availability.is_available(),
            });
        }

        Ok(views)
    }

    /// Record a yes/no answer to an invitation.
    ///
    /// Only the participant's own user or an administrator may change it.
    pub fn update_availability(
        &self,
        request: UpdateAvailabilityRequest,
        caller: &Identity,
    ) -> EventResult<Availability> {
        let mut participant = self
            .repo
            .find_participant(request.participant_id)?
            .ok_or(EventError::ParticipantNotFound(request.participant_id))?;

        caller.require_self_or_admin(participant.user_id)?;

        participant.availability = Availability::from_flag(request.is_available);
        self.repo.update_participant(&participant)?;

        let participant_id = participant.id.to_string();
        let is_available = request.is_available.to_string();
        Logger::event(
            LogEvent::AvailabilityUpdated,
            &[
                ("participant_id", participant_id.as_str()),
                ("is_available", is_available.as_str()),
            ],
        );

        Ok(participant.availability)
    }

    /// Post a comment as the caller
    pub fn add_comment(
        &self,
        request: AddCommentRequest,
        caller: &Identity,
    ) -> EventResult<CommentView> {
        let content = request.content.trim();
        if content.is_empty() {
            return Err(EventError::invalid("content is required"));
        }
        self.require_event(request.event_id)?;

        let comment = Comment {
            id: Uuid::new_v4(),
            event_id: request.event_id,
            user_id: caller.user_id,
            message: content.to_string(),
            posted_at: Utc::now(),
        };
        self.repo.add_comment(&comment)?;

        let event_id = comment.event_id.to_string();
        Logger::event(LogEvent::CommentAdded, &[("event_id", event_id.as_str())]);

        Ok(comment.into())
    }

    /// Comments on an event, newest first
    pub fn comments_for_event(&self, event_id: Uuid) -> EventResult<Vec<CommentView>> {
        self.require_event(event_id)?;

        let mut comments = self.repo.comments_for_event(event_id)?;
        // Stable sort keeps insertion order for equal timestamps; reverse after
        comments.sort_by_key(|c| c.posted_at);
        comments.reverse();

        Ok(comments.into_iter().map(CommentView::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthError, InMemoryUserRepository, PasswordPolicy, Role, User};
    use crate::events::admin::CreateEventRequest;
    use crate::events::repository::InMemoryEventRepository;
    use std::sync::Arc;

    struct Fixture {
        service: EventService<InMemoryEventRepository, InMemoryUserRepository>,
        admin: Identity,
        alice: Identity,
        bob: Identity,
        event_id: Uuid,
    }

    fn user(name: &str, email: &str, role: Role) -> User {
        User::new(
            name.into(),
            email.into(),
            "password123",
            role,
            &PasswordPolicy::default(),
        )
        .unwrap()
    }

    fn fixture() -> Fixture {
        let users = Arc::new(InMemoryUserRepository::new());
        let admin = user("Admin", "admin@example.com", Role::Admin);
        let alice = user("Alice", "alice@example.com", Role::Participant);
        let bob = user("Bob", "bob@example.com", Role::Participant);
        for u in [&admin, &alice, &bob] {
            users.create(u).unwrap();
        }

        let service = EventService::new(Arc::new(InMemoryEventRepository::new()), users);
        let admin = Identity::from(&admin);
        let details = service
            .create_event(
                CreateEventRequest {
                    title: "Hackathon".into(),
                    description: "48h".into(),
                    location: "Lab".into(),
                    custom_field_ids: vec![],
                },
                &admin,
            )
            .unwrap();

        Fixture {
            service,
            admin,
            alice: Identity::from(&alice),
            bob: Identity::from(&bob),
            event_id: details.event.id,
        }
    }

    fn participant_of(f: &Fixture, who: &Identity) -> ParticipantView {
        f.service
            .participants_for_event(f.event_id)
            .unwrap()
            .into_iter()
            .find(|p| p.user_id == who.user_id)
            .unwrap()
    }

    #[test]
    fn test_participants_joined_with_users() {
        let f = fixture();
        let participants = f.service.participants_for_event(f.event_id).unwrap();

        assert_eq!(participants.len(), 2);
        let alice = participant_of(&f, &f.alice);
        assert_eq!(alice.name, "Alice");
        assert_eq!(alice.email, "alice@example.com");
        assert_eq!(alice.availability, Availability::Tentative);
        assert!(!alice.is_available);
    }

    #[test]
    fn test_update_own_availability() {
        let f = fixture();
        let alice = participant_of(&f, &f.alice);

        let status = f
            .service
            .update_availability(
                UpdateAvailabilityRequest {
                    participant_id: alice.participant_id,
                    is_available: true,
                },
                &f.alice,
            )
            .unwrap();

        assert_eq!(status, Availability::Available);
        assert!(participant_of(&f, &f.alice).is_available);
    }

    #[test]
    fn test_cannot_update_someone_else() {
        let f = fixture();
        let alice = participant_of(&f, &f.alice);

        let result = f.service.update_availability(
            UpdateAvailabilityRequest {
                participant_id: alice.participant_id,
                is_available: false,
            },
            &f.bob,
        );
        assert!(matches!(result, Err(EventError::Auth(AuthError::Forbidden))));

        // Administrators may
        f.service
            .update_availability(
                UpdateAvailabilityRequest {
                    participant_id: alice.participant_id,
                    is_available: false,
                },
                &f.admin,
            )
            .unwrap();
        assert_eq!(
            participant_of(&f, &f.alice).availability,
            Availability::NotAvailable
        );
    }

    #[test]
    fn test_update_unknown_participant() {
        let f = fixture();
        let result = f.service.update_availability(
            UpdateAvailabilityRequest {
                participant_id: Uuid::new_v4(),
                is_available: true,
            },
            &f.alice,
        );
        assert!(matches!(result, Err(EventError::ParticipantNotFound(_))));
    }

    #[test]
    fn test_comments_newest_first() {
        let f = fixture();
        for content in ["first", "second", "third"] {
            f.service
                .add_comment(
                    AddCommentRequest {
                        event_id: f.event_id,
                        content: content.into(),
                    },
                    &f.alice,
                )
                .unwrap();
        }

        let comments = f.service.comments_for_event(f.event_id).unwrap();
        let contents: Vec<_> = comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["third", "second", "first"]);
        assert!(comments.iter().all(|c| c.user_id == f.alice.user_id));
    }

    #[test]
    fn test_blank_comment_rejected() {
        let f = fixture();
        let result = f.service.add_comment(
            AddCommentRequest {
                event_id: f.event_id,
                content: "  \n".into(),
            },
            &f.alice,
        );
        assert!(matches!(result, Err(EventError::InvalidRequest(_))));
    }

    #[test]
    fn test_comment_on_missing_event() {
        let f = fixture();
        let result = f.service.add_comment(
            AddCommentRequest {
                event_id: Uuid::new_v4(),
                content: "hello".into(),
            },
            &f.alice,
        );
        assert!(matches!(result, Err(EventError::EventNotFound(_))));
    }
}
