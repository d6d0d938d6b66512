//! Arena holding questions and answers.
//!
//! A question keeps the keys of its answers and an answer keeps the key of its
//! question. Both sides are edited together, inside a single `Board` method,
//! so they never disagree. Nothing is ever removed from the arena (deletion is
//! a soft flag), which keeps keys stable for the board's lifetime.

use qna_auth::User;
use qna_core::{AnswerId, Clock, DomainError, DomainResult};

use crate::answer::Answer;
use crate::delete_history::DeleteHistory;
use crate::question::Question;

/// Position of a question in its [`Board`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuestionKey(usize);

/// Position of an answer in its [`Board`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnswerKey(usize);

macro_rules! impl_arena_key {
    ($t:ty, $prefix:literal) => {
        impl $t {
            pub fn from_index(index: usize) -> Self {
                Self(index)
            }

            pub fn index(self) -> usize {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}#{}", $prefix, self.0)
            }
        }
    };
}

impl_arena_key!(QuestionKey, "question");
impl_arena_key!(AnswerKey, "answer");

#[derive(Debug, Clone, Default)]
pub struct Board {
    questions: Vec<Question>,
    answers: Vec<Answer>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_question(&mut self, question: Question) -> QuestionKey {
        let key = QuestionKey(self.questions.len());
        self.questions.push(question);
        key
    }

    pub fn question(&self, key: QuestionKey) -> Option<&Question> {
        self.questions.get(key.0)
    }

    pub fn question_mut(&mut self, key: QuestionKey) -> Option<&mut Question> {
        self.questions.get_mut(key.0)
    }

    pub fn answer(&self, key: AnswerKey) -> Option<&Answer> {
        self.answers.get(key.0)
    }

    pub fn answer_mut(&mut self, key: AnswerKey) -> Option<&mut Answer> {
        self.answers.get_mut(key.0)
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn answer_count(&self) -> usize {
        self.answers.len()
    }

    /// Answers attached to `question`, oldest first.
    pub fn answers_of(&self, question: QuestionKey) -> DomainResult<Vec<(AnswerKey, &Answer)>> {
        let q = self.question(question).ok_or(DomainError::NotFound)?;
        Ok(q.answers()
            .filter_map(|k| self.answer(k).map(|a| (k, a)))
            .collect())
    }

    /// Create an answer and attach it to `question`.
    ///
    /// Fails with `Unauthorized` without a (non-guest) writer, then with
    /// `NotFound` when `question` is absent or not on this board.
    pub fn add_answer(
        &mut self,
        writer: Option<&User>,
        question: Option<QuestionKey>,
        contents: impl Into<String>,
    ) -> DomainResult<AnswerKey> {
        self.add_answer_with_id(None, writer, question, contents)
    }

    pub fn add_answer_with_id(
        &mut self,
        id: Option<AnswerId>,
        writer: Option<&User>,
        question: Option<QuestionKey>,
        contents: impl Into<String>,
    ) -> DomainResult<AnswerKey> {
        let question = question.filter(|k| k.0 < self.questions.len());
        let answer = Answer::new(id, writer, question, contents.into())?;

        let key = AnswerKey(self.answers.len());
        self.answers.push(answer);
        self.to_question(key, question)?;
        Ok(key)
    }

    /// Re-attach `answer` to `question` (or detach it with `None`).
    ///
    /// Attaching to the question it already belongs to changes nothing.
    #[allow(clippy::wrong_self_convention)]
    pub fn to_question(
        &mut self,
        answer: AnswerKey,
        question: Option<QuestionKey>,
    ) -> DomainResult<()> {
        let current = self.answer(answer).ok_or(DomainError::NotFound)?.question();
        if let Some(target) = question {
            if target.0 >= self.questions.len() {
                return Err(DomainError::NotFound);
            }
        }

        if current == question {
            return Ok(());
        }

        if let Some(old) = current {
            self.questions[old.0].remove_answer(answer);
        }
        if let Some(new) = question {
            self.questions[new.0].add_answer(answer);
        }
        self.answers[answer.0].set_question(question);
        Ok(())
    }

    pub fn delete_answer(
        &mut self,
        answer: AnswerKey,
        user: &User,
        clock: &dyn Clock,
    ) -> DomainResult<DeleteHistory> {
        self.delete_answer_with(answer, user, clock, Ok)
    }

    /// Delete an answer, handing its history to `persist` first.
    ///
    /// The answer is only flagged once `persist` succeeds; on error it stays
    /// live and the error is returned as is.
    pub fn delete_answer_with<T, E>(
        &mut self,
        answer: AnswerKey,
        user: &User,
        clock: &dyn Clock,
        persist: impl FnOnce(DeleteHistory) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<DomainError>,
    {
        let target = self.answer(answer).ok_or(DomainError::NotFound)?;
        target.validate_writer(user)?;

        let saved = persist(target.deletion_history(clock))?;
        self.answers[answer.0].mark_deleted();
        Ok(saved)
    }

    /// Soft-delete a question together with its live answers.
    ///
    /// `user` must own the question and every answer not yet deleted; if any
    /// check fails nothing is flagged. Returns the question's history first,
    /// then one per answer deleted here.
    pub fn delete_question(
        &mut self,
        question: QuestionKey,
        user: &User,
        clock: &dyn Clock,
    ) -> DomainResult<Vec<DeleteHistory>> {
        self.delete_question_with(question, user, clock, Ok)
    }

    /// Like [`Board::delete_question`], but the histories go through
    /// `persist` before anything is flagged. A failed `persist` leaves the
    /// question and its answers live.
    pub fn delete_question_with<T, E>(
        &mut self,
        question: QuestionKey,
        user: &User,
        clock: &dyn Clock,
        persist: impl FnOnce(Vec<DeleteHistory>) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<DomainError>,
    {
        let q = self
            .question(question)
            .filter(|q| !q.is_deleted())
            .ok_or(DomainError::NotFound)?;
        q.validate_writer(user)?;

        let live: Vec<AnswerKey> = q
            .answers()
            .filter(|k| !self.answers[k.0].is_deleted())
            .collect();
        for key in &live {
            self.answers[key.0].validate_writer(user)?;
        }

        let mut histories = Vec::with_capacity(1 + live.len());
        histories.push(q.deletion_history(clock));
        histories.extend(live.iter().map(|k| self.answers[k.0].deletion_history(clock)));

        let saved = persist(histories)?;
        self.questions[question.0].mark_deleted();
        for key in live {
            self.answers[key.0].mark_deleted();
        }
        Ok(saved)
    }
}
