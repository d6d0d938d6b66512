//! Question entity.

use std::collections::BTreeSet;

use qna_auth::User;
use qna_core::{
    Clock, DomainError, DomainResult, Entity, QuestionId, assign_once, same_identity,
};

use crate::board::AnswerKey;
use crate::delete_history::DeleteHistory;

pub const QUESTION_OWNED_BY_ANOTHER_USER: &str = "no permission to delete this question";

/// A question and the set of answers attached to it.
///
/// The answer set is the reverse side of [`crate::Answer::question`]; it is
/// only edited through [`crate::Board`].
#[derive(Debug, Clone)]
pub struct Question {
    id: Option<QuestionId>,
    title: String,
    contents: String,
    writer: User,
    answers: BTreeSet<AnswerKey>,
    deleted: bool,
}

impl Question {
    pub fn new(
        writer: Option<&User>,
        title: impl Into<String>,
        contents: impl Into<String>,
    ) -> DomainResult<Self> {
        let writer = match writer {
            Some(w) if !w.is_guest() => w.clone(),
            _ => return Err(DomainError::unauthorized()),
        };

        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::validation("title cannot be empty"));
        }

        Ok(Self {
            id: None,
            title,
            contents: contents.into(),
            writer,
            answers: BTreeSet::new(),
            deleted: false,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn writer(&self) -> &User {
        &self.writer
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn is_owner(&self, user: &User) -> bool {
        !user.is_guest() && self.writer == *user
    }

    /// Attached answers, oldest first.
    pub fn answers(&self) -> impl Iterator<Item = AnswerKey> + '_ {
        self.answers.iter().copied()
    }

    pub fn has_answer(&self, answer: AnswerKey) -> bool {
        self.answers.contains(&answer)
    }

    pub fn answer_count(&self) -> usize {
        self.answers.len()
    }

    pub fn assign_id(&mut self, id: QuestionId) -> DomainResult<()> {
        assign_once(&mut self.id, id, "question")
    }

    pub(crate) fn add_answer(&mut self, answer: AnswerKey) -> bool {
        self.answers.insert(answer)
    }

    pub(crate) fn remove_answer(&mut self, answer: AnswerKey) -> bool {
        self.answers.remove(&answer)
    }

    pub(crate) fn validate_writer(&self, user: &User) -> DomainResult<()> {
        if !self.is_owner(user) {
            return Err(DomainError::cannot_delete(QUESTION_OWNED_BY_ANOTHER_USER));
        }
        Ok(())
    }

    /// History for deleting this question only; answers are cascaded by the
    /// board.
    pub(crate) fn deletion_history(&self, clock: &dyn Clock) -> DeleteHistory {
        DeleteHistory::for_question(self.id, self.writer.clone(), clock.now())
    }

    pub(crate) fn mark_deleted(&mut self) {
        self.deleted = true;
    }
}

impl Entity for Question {
    type Id = QuestionId;

    fn id(&self) -> Option<QuestionId> {
        self.id
    }
}

impl PartialEq for Question {
    fn eq(&self, other: &Self) -> bool {
        same_identity(self, other)
    }
}

impl core::hash::Hash for Question {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        core::hash::Hash::hash(&self.id, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qna_core::{FixedClock, UserId};

    fn member(login: &str) -> User {
        let mut user = User::new(login, "pw", login, None).unwrap();
        user.assign_id(UserId::new()).unwrap();
        user
    }

    #[test]
    fn new_requires_a_member_writer() {
        assert_eq!(
            Question::new(None, "title", "body").unwrap_err(),
            DomainError::Unauthorized
        );
        assert_eq!(
            Question::new(Some(&User::guest()), "title", "body").unwrap_err(),
            DomainError::Unauthorized
        );
    }

    #[test]
    fn new_rejects_blank_title() {
        let alice = member("alice");
        match Question::new(Some(&alice), " ", "body").unwrap_err() {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for blank title"),
        }
    }

    #[test]
    fn answer_set_ignores_duplicates() {
        let alice = member("alice");
        let mut question = Question::new(Some(&alice), "title", "body").unwrap();
        let key = AnswerKey::from_index(3);

        assert!(question.add_answer(key));
        assert!(!question.add_answer(key));
        assert_eq!(question.answer_count(), 1);
        assert!(question.remove_answer(key));
        assert!(!question.has_answer(key));
    }

    #[test]
    fn only_the_writer_may_delete() {
        let alice = member("alice");
        let bob = member("bob");
        let question = Question::new(Some(&alice), "title", "body").unwrap();
        let clock = FixedClock(chrono::Utc::now());

        let err = question.validate_writer(&bob).unwrap_err();
        assert_eq!(err, DomainError::cannot_delete(QUESTION_OWNED_BY_ANOTHER_USER));
        assert!(question.validate_writer(&User::guest()).is_err());
        assert!(question.validate_writer(&alice).is_ok());

        let history = question.deletion_history(&clock);
        assert!(!question.is_deleted());
        assert_eq!(history.deleted_by(), &alice);
        assert_eq!(history.created_at(), clock.0);
    }

    #[test]
    fn unsaved_writer_owns_own_question() {
        let user_a = User::new("a", "pw", "A", None).unwrap();
        let question = Question::new(Some(&user_a), "title", "body").unwrap();

        assert!(question.is_owner(&user_a));
        assert!(!question.is_owner(&User::guest()));
    }
}
