//! # Registrations
//!
//! Submission goes through the form validator and stores the enriched
//! answers as a JSON blob. Reading re-attaches the form's current metadata.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{Identity, UserRepository};
use crate::forms::{enrich_for_read, validate_and_enrich, Answer, EnrichedAnswer};
use crate::observability::{Event as LogEvent, Logger};

use super::errors::{EventError, EventResult};
use super::model::{CustomField, EventCustomField};
use super::repository::EventRepository;
use super::service::EventService;

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRegistrationRequest {
    pub event_custom_field_id: Uuid,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

/// A stored registration with its answers decoded
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationView {
    pub registration_id: Uuid,
    pub event_custom_field_id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub field_name: String,
    pub field_type: String,
    pub answers: Vec<EnrichedAnswer>,
}

impl<R: EventRepository, U: UserRepository> EventService<R, U> {
    /// Validate and store the caller's answers for one form assignment.
    ///
    /// Either every answer is accepted or nothing is stored. A resubmission
    /// replaces the previous one.
    pub fn submit_registration(
        &self,
        request: SubmitRegistrationRequest,
        caller: &Identity,
    ) -> EventResult<RegistrationView> {
        let (assignment, field) = self.resolve_form(request.event_custom_field_id)?;

        let ecf_id = assignment.id.to_string();
        let user_id = caller.user_id.to_string();

        let enriched = match validate_and_enrich(&request.answers, &field.questions) {
            Ok(enriched) => enriched,
            Err(errors) => {
                let count = errors.len().to_string();
                let messages = errors.to_string();
                Logger::event(
                    LogEvent::RegistrationRejected,
                    &[
                        ("event_custom_field_id", ecf_id.as_str()),
                        ("user_id", user_id.as_str()),
                        ("violations", count.as_str()),
                        ("errors", messages.as_str()),
                    ],
                );
                return Err(EventError::ValidationFailed(errors));
            }
        };

        let value =
            serde_json::to_string(&enriched).map_err(|e| EventError::Encoding(e.to_string()))?;
        let registration = self
            .repo
            .upsert_registration(assignment.id, caller.user_id, value)?;

        let registration_id = registration.id.to_string();
        let answered = enriched.len().to_string();
        Logger::event(
            LogEvent::RegistrationAccepted,
            &[
                ("event_custom_field_id", ecf_id.as_str()),
                ("registration_id", registration_id.as_str()),
                ("user_id", user_id.as_str()),
                ("answers", answered.as_str()),
            ],
        );

        Ok(RegistrationView {
            registration_id: registration.id,
            event_custom_field_id: assignment.id,
            event_id: assignment.event_id,
            user_id: caller.user_id,
            field_name: field.field_name,
            field_type: field.field_type,
            answers: enriched,
        })
    }

    /// Registrations of `user_id` for one form assignment.
    ///
    /// Participants may only read their own. Stored blobs that fail to decode
    /// are logged and left out.
    pub fn registrations_for(
        &self,
        user_id: Uuid,
        event_custom_field_id: Uuid,
        caller: &Identity,
    ) -> EventResult<Vec<RegistrationView>> {
        caller.require_self_or_admin(user_id)?;

        let (assignment, field) = self.resolve_form(event_custom_field_id)?;

        let mut views = Vec::new();
        for registration in self.repo.registrations_for(user_id, assignment.id)? {
            let stored: Vec<Answer> = match serde_json::from_str(&registration.value) {
                Ok(stored) => stored,
                Err(e) => {
                    let registration_id = registration.id.to_string();
                    let reason = e.to_string();
                    Logger::event(
                        LogEvent::RegistrationDecodeFailed,
                        &[
                            ("registration_id", registration_id.as_str()),
                            ("reason", reason.as_str()),
                        ],
                    );
                    continue;
                }
            };

            views.push(RegistrationView {
                registration_id: registration.id,
                event_custom_field_id: assignment.id,
                event_id: assignment.event_id,
                user_id: registration.user_id,
                field_name: field.field_name.clone(),
                field_type: field.field_type.clone(),
                answers: enrich_for_read(&stored, &field.questions),
            });
        }

        Ok(views)
    }

    fn resolve_form(
        &self,
        event_custom_field_id: Uuid,
    ) -> EventResult<(EventCustomField, CustomField)> {
        let assignment = self
            .repo
            .find_assignment(event_custom_field_id)?
            .ok_or(EventError::FormNotFound(event_custom_field_id))?;

        let field = self
            .repo
            .find_custom_field(assignment.field_id)?
            .ok_or(EventError::FormNotFound(event_custom_field_id))?;

        Ok((assignment, field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthError, InMemoryUserRepository, PasswordPolicy, Role, User};
    use crate::events::admin::{CreateCustomFieldRequest, CreateEventRequest};
    use crate::events::repository::InMemoryEventRepository;
    use crate::forms::{QuestionSpec, ValidationError};
    use std::sync::Arc;

    struct Fixture {
        service: EventService<InMemoryEventRepository, InMemoryUserRepository>,
        admin: Identity,
        alice: Identity,
        bob: Identity,
        ecf_id: Uuid,
    }

    fn user(email: &str, role: Role) -> User {
        User::new(
            "Someone".into(),
            email.into(),
            "password123",
            role,
            &PasswordPolicy::default(),
        )
        .unwrap()
    }

    fn fixture() -> Fixture {
        let users = Arc::new(InMemoryUserRepository::new());
        let admin = user("admin@example.com", Role::Admin);
        let alice = user("alice@example.com", Role::Participant);
        let bob = user("bob@example.com", Role::Participant);
        for u in [&admin, &alice, &bob] {
            users.create(u).unwrap();
        }

        let service = EventService::new(Arc::new(InMemoryEventRepository::new()), users);
        let admin = Identity::from(&admin);

        let field = service
            .create_custom_field(
                CreateCustomFieldRequest {
                    field_name: "Signup".into(),
                    field_type: "form".into(),
                    questions: vec![
                        QuestionSpec::text("Full Name").required(),
                        QuestionSpec::dropdown("T-Shirt", ["S", "M", "L"]).required(),
                        QuestionSpec::text("Notes"),
                    ],
                    is_required: true,
                },
                &admin,
            )
            .unwrap();
        let details = service
            .create_event(
                CreateEventRequest {
                    title: "Conf".into(),
                    description: "Yearly".into(),
                    location: "Main hall".into(),
                    custom_field_ids: vec![field.id],
                },
                &admin,
            )
            .unwrap();

        Fixture {
            service,
            admin,
            alice: Identity::from(&alice),
            bob: Identity::from(&bob),
            ecf_id: details.custom_fields[0].event_custom_field_id,
        }
    }

    fn submit(f: &Fixture, who: &Identity, answers: Vec<Answer>) -> EventResult<RegistrationView> {
        f.service.submit_registration(
            SubmitRegistrationRequest {
                event_custom_field_id: f.ecf_id,
                answers,
            },
            who,
        )
    }

    #[test]
    fn test_submit_and_read_back() {
        let f = fixture();
        let mut lying = Answer::new("  full name ", "Alice");
        lying.question_type = Some("color".into());
        lying.is_required = Some(false);

        let stored = submit(&f, &f.alice, vec![lying, Answer::new("t-shirt", "M")]).unwrap();
        assert_eq!(stored.answers.len(), 2);
        assert_eq!(stored.answers[0].question_text, "Full Name");
        assert_eq!(stored.answers[0].question_type, "text");
        assert!(stored.answers[0].is_required);

        let read = f
            .service
            .registrations_for(f.alice.user_id, f.ecf_id, &f.alice)
            .unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].registration_id, stored.registration_id);
        assert_eq!(read[0].answers, stored.answers);
    }

    #[test]
    fn test_rejection_reports_everything_and_stores_nothing() {
        let f = fixture();
        let result = submit(
            &f,
            &f.alice,
            vec![Answer::new("Favorite Color", "Blue"), Answer::new("T-Shirt", "XXL")],
        );

        match result {
            Err(EventError::ValidationFailed(errors)) => {
                assert_eq!(
                    errors.errors(),
                    &[
                        ValidationError::UnknownQuestion("Favorite Color".into()),
                        ValidationError::InvalidOption {
                            question_text: "T-Shirt".into(),
                            value: "XXL".into(),
                            options: vec!["S".into(), "M".into(), "L".into()],
                        },
                        ValidationError::MissingRequiredQuestion("Full Name".into()),
                    ]
                );
            }
            other => panic!("unexpected: {:?}", other),
        }

        assert!(f
            .service
            .registrations_for(f.alice.user_id, f.ecf_id, &f.alice)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_resubmission_replaces() {
        let f = fixture();
        let first = submit(
            &f,
            &f.alice,
            vec![Answer::new("Full Name", "Alice"), Answer::new("T-Shirt", "S")],
        )
        .unwrap();
        let second = submit(
            &f,
            &f.alice,
            vec![Answer::new("Full Name", "Alice B"), Answer::new("T-Shirt", "L")],
        )
        .unwrap();
        assert_eq!(first.registration_id, second.registration_id);

        let read = f
            .service
            .registrations_for(f.alice.user_id, f.ecf_id, &f.alice)
            .unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].answers[0].value, "Alice B");
        assert_eq!(read[0].answers[1].value, "L");
    }

    #[test]
    fn test_unknown_assignment() {
        let f = fixture();
        let result = f.service.submit_registration(
            SubmitRegistrationRequest {
                event_custom_field_id: Uuid::new_v4(),
                answers: vec![],
            },
            &f.alice,
        );
        assert!(matches!(result, Err(EventError::FormNotFound(_))));
    }

    #[test]
    fn test_read_access_rules() {
        let f = fixture();
        submit(
            &f,
            &f.alice,
            vec![Answer::new("Full Name", "Alice"), Answer::new("T-Shirt", "S")],
        )
        .unwrap();

        let result = f.service.registrations_for(f.alice.user_id, f.ecf_id, &f.bob);
        assert!(matches!(result, Err(EventError::Auth(AuthError::Forbidden))));

        let as_admin = f
            .service
            .registrations_for(f.alice.user_id, f.ecf_id, &f.admin)
            .unwrap();
        assert_eq!(as_admin.len(), 1);
    }

    #[test]
    fn test_undecodable_blob_is_skipped() {
        let f = fixture();
        f.service
            .repo
            .upsert_registration(f.ecf_id, f.bob.user_id, "not json".into())
            .unwrap();

        let read = f
            .service
            .registrations_for(f.bob.user_id, f.ecf_id, &f.bob)
            .unwrap();
        assert!(read.is_empty());
    }
}
