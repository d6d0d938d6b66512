//! Answer entity.

use qna_auth::User;
use qna_core::{AnswerId, Clock, DomainError, DomainResult, Entity, assign_once, same_identity};

use crate::board::QuestionKey;
use crate::delete_history::DeleteHistory;

pub const ANSWER_OWNED_BY_ANOTHER_USER: &str = "another person's answer — cannot delete";

/// An answer to a question.
///
/// # Invariants
/// - Always has a writer (never the guest).
/// - `question` agrees with the question's own answer set; only [`crate::Board`]
///   changes either side.
/// - `deleted` only ever goes from `false` to `true`, and only for the writer.
#[derive(Debug, Clone)]
pub struct Answer {
    id: Option<AnswerId>,
    writer: User,
    question: Option<QuestionKey>,
    contents: String,
    deleted: bool,
}

impl Answer {
    /// Validate the construction inputs. The result is not attached yet; the
    /// board attaches it to `question` right after.
    pub(crate) fn new(
        id: Option<AnswerId>,
        writer: Option<&User>,
        question: Option<QuestionKey>,
        contents: String,
    ) -> DomainResult<Self> {
        let writer = match writer {
            Some(w) if !w.is_guest() => w.clone(),
            _ => return Err(DomainError::unauthorized()),
        };
        if question.is_none() {
            return Err(DomainError::not_found());
        }

        Ok(Self {
            id,
            writer,
            question: None,
            contents,
            deleted: false,
        })
    }

    pub fn writer(&self) -> &User {
        &self.writer
    }

    pub fn question(&self) -> Option<QuestionKey> {
        self.question
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn assign_id(&mut self, id: AnswerId) -> DomainResult<()> {
        assign_once(&mut self.id, id, "answer")
    }

    /// The guest owns nothing, whoever wrote the answer.
    pub fn is_not_owner(&self, user: &User) -> bool {
        user.is_guest() || self.writer != *user
    }

    pub fn update_contents(&mut self, contents: impl Into<String>) {
        self.contents = contents.into();
    }

    pub fn validate_writer(&self, user: &User) -> DomainResult<()> {
        if self.is_not_owner(user) {
            return Err(DomainError::cannot_delete(ANSWER_OWNED_BY_ANOTHER_USER));
        }
        Ok(())
    }

    /// Soft-delete on behalf of `user` and return the audit record.
    pub fn delete(&mut self, user: &User, clock: &dyn Clock) -> DomainResult<DeleteHistory> {
        self.validate_writer(user)?;

        let history = self.deletion_history(clock);
        self.mark_deleted();
        Ok(history)
    }

    pub(crate) fn deletion_history(&self, clock: &dyn Clock) -> DeleteHistory {
        DeleteHistory::for_answer(self.id, self.writer.clone(), clock.now())
    }

    pub(crate) fn mark_deleted(&mut self) {
        self.deleted = true;
    }

    pub(crate) fn set_question(&mut self, question: Option<QuestionKey>) {
        self.question = question;
    }
}

impl Entity for Answer {
    type Id = AnswerId;

    fn id(&self) -> Option<AnswerId> {
        self.id
    }
}

impl PartialEq for Answer {
    fn eq(&self, other: &Self) -> bool {
        same_identity(self, other)
    }
}

impl core::hash::Hash for Answer {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        core::hash::Hash::hash(&self.id, state);
    }
}

struct OrDash<T>(Option<T>);

impl<T: core::fmt::Display> core::fmt::Display for OrDash<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match &self.0 {
            Some(v) => core::fmt::Display::fmt(v, f),
            None => f.write_str("-"),
        }
    }
}

impl core::fmt::Display for Answer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Answer {{ id: {}, writer_id: {}, question: {}, contents: {:?}, deleted: {} }}",
            OrDash(self.id),
            OrDash(self.writer.id()),
            OrDash(self.question),
            self.contents,
            self.deleted,
        )
    }
}
