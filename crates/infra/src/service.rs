//! Q&A use cases (application-level orchestration).
//!
//! `QnaService` owns the [`Board`] and the identifier index, and composes the
//! user and delete-history repositories:
//!
//! ```text
//! call (login user, ids)
//!   ↓
//! 1. Resolve ids to board keys (deleted content is not found)
//!   ↓
//! 2. Run the domain operation (ownership checks live in the entities)
//!   ↓
//! 3. Assign ids to new entities / persist delete histories
//! ```
//!
//! Domain crates never log; this is where outcomes are traced.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{info, warn};

use qna_auth::User;
use qna_core::{AnswerId, Clock, DomainError, QuestionId};
use qna_questions::{Answer, AnswerKey, Board, DeleteHistory, Question, QuestionKey};

use crate::error::ServiceError;
use crate::repository::{
    DeleteHistoryRepository, InMemoryDeleteHistoryRepository, InMemoryUserRepository,
    UserRepository,
};

/// Board plus the storage-assigned identifier index.
#[derive(Debug, Default)]
struct Catalog {
    board: Board,
    questions: HashMap<QuestionId, QuestionKey>,
    answers: HashMap<AnswerId, AnswerKey>,
}

impl Catalog {
    fn live_question_key(&self, id: QuestionId) -> Result<QuestionKey, ServiceError> {
        self.questions
            .get(&id)
            .copied()
            .filter(|k| self.board.question(*k).is_some_and(|q| !q.is_deleted()))
            .ok_or(ServiceError::QuestionNotFound(id))
    }

    fn live_answer_key(&self, id: AnswerId) -> Result<AnswerKey, ServiceError> {
        self.answers
            .get(&id)
            .copied()
            .filter(|k| self.board.answer(*k).is_some_and(|a| !a.is_deleted()))
            .ok_or(ServiceError::AnswerNotFound(id))
    }
}

pub struct QnaService<U, H> {
    users: U,
    histories: H,
    catalog: RwLock<Catalog>,
    clock: Arc<dyn Clock>,
}

impl QnaService<InMemoryUserRepository, InMemoryDeleteHistoryRepository> {
    /// In-memory wiring (dev/test).
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self::new(
            InMemoryUserRepository::new(),
            InMemoryDeleteHistoryRepository::new(),
            clock,
        )
    }
}

impl<U, H> QnaService<U, H>
where
    U: UserRepository,
    H: DeleteHistoryRepository,
{
    pub fn new(users: U, histories: H, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            histories,
            catalog: RwLock::new(Catalog::default()),
            clock,
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Catalog>, ServiceError> {
        self.catalog
            .read()
            .map_err(|_| ServiceError::Storage("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Catalog>, ServiceError> {
        self.catalog
            .write()
            .map_err(|_| ServiceError::Storage("lock poisoned".to_string()))
    }

    pub fn register_user(&self, user: User) -> Result<User, ServiceError> {
        if user.is_guest() {
            return Err(DomainError::unauthorized().into());
        }
        let saved = self.users.save(user)?;
        info!(user_id = saved.user_id(), "user registered");
        Ok(saved)
    }

    pub fn find_user(&self, user_id: &str) -> Result<User, ServiceError> {
        self.users
            .find_by_user_id(user_id)
            .ok_or_else(|| ServiceError::UserNotFound(user_id.to_string()))
    }

    /// Replace `user_id`'s profile with `target`'s (name, email).
    pub fn update_user(
        &self,
        login_user: &User,
        user_id: &str,
        target: &User,
    ) -> Result<User, ServiceError> {
        let mut user = self.find_user(user_id)?;
        if let Err(e) = user.update(login_user, target) {
            warn!(user_id, login = login_user.user_id(), "profile update rejected");
            return Err(e.into());
        }
        Ok(self.users.save(user)?)
    }

    pub fn create_question(
        &self,
        login_user: &User,
        title: &str,
        contents: &str,
    ) -> Result<QuestionId, ServiceError> {
        let mut question = Question::new(Some(login_user), title, contents)?;
        let id = QuestionId::new();
        question.assign_id(id)?;

        let mut catalog = self.write()?;
        let key = catalog.board.add_question(question);
        catalog.questions.insert(id, key);

        info!(question_id = %id, writer = login_user.user_id(), "question created");
        Ok(id)
    }

    pub fn add_answer(
        &self,
        login_user: &User,
        question_id: QuestionId,
        contents: &str,
    ) -> Result<AnswerId, ServiceError> {
        let mut catalog = self.write()?;
        let question = catalog.live_question_key(question_id)?;
        let key = catalog
            .board
            .add_answer(Some(login_user), Some(question), contents)?;

        let id = AnswerId::new();
        catalog
            .board
            .answer_mut(key)
            .ok_or(DomainError::NotFound)?
            .assign_id(id)?;
        catalog.answers.insert(id, key);

        info!(answer_id = %id, question_id = %question_id, writer = login_user.user_id(), "answer added");
        Ok(id)
    }

    /// Edit an answer's text. Only its writer may do so.
    pub fn update_answer(
        &self,
        login_user: &User,
        answer_id: AnswerId,
        contents: &str,
    ) -> Result<(), ServiceError> {
        let mut catalog = self.write()?;
        let key = catalog.live_answer_key(answer_id)?;
        let answer = catalog
            .board
            .answer_mut(key)
            .ok_or(ServiceError::AnswerNotFound(answer_id))?;

        if answer.is_not_owner(login_user) {
            warn!(answer_id = %answer_id, login = login_user.user_id(), "answer update rejected");
            return Err(DomainError::unauthorized().into());
        }
        answer.update_contents(contents);
        Ok(())
    }

    /// Re-attach an answer to another question. Only its writer may do so.
    pub fn move_answer(
        &self,
        login_user: &User,
        answer_id: AnswerId,
        question_id: QuestionId,
    ) -> Result<(), ServiceError> {
        let mut catalog = self.write()?;
        let key = catalog.live_answer_key(answer_id)?;
        let target = catalog.live_question_key(question_id)?;

        let answer = catalog
            .board
            .answer(key)
            .ok_or(ServiceError::AnswerNotFound(answer_id))?;
        if answer.is_not_owner(login_user) {
            warn!(answer_id = %answer_id, login = login_user.user_id(), "answer move rejected");
            return Err(DomainError::unauthorized().into());
        }

        catalog.board.to_question(key, Some(target))?;
        info!(answer_id = %answer_id, question_id = %question_id, "answer moved");
        Ok(())
    }

    /// Delete an answer. The history is persisted before the answer is
    /// flagged, under the catalog lock; a failed save leaves it live.
    pub fn delete_answer(
        &self,
        login_user: &User,
        answer_id: AnswerId,
    ) -> Result<DeleteHistory, ServiceError> {
        let mut catalog = self.write()?;
        let key = catalog.live_answer_key(answer_id)?;
        let result = catalog.board.delete_answer_with(
            key,
            login_user,
            self.clock.as_ref(),
            |history| -> Result<_, ServiceError> { Ok(self.histories.save(history)?) },
        );

        match result {
            Ok(saved) => {
                info!(answer_id = %answer_id, "answer deleted");
                Ok(saved)
            }
            Err(e) => {
                warn!(answer_id = %answer_id, login = login_user.user_id(), error = %e, "answer delete failed");
                Err(e)
            }
        }
    }

    /// Delete a question and its answers; every history is persisted before
    /// anything is flagged.
    pub fn delete_question(
        &self,
        login_user: &User,
        question_id: QuestionId,
    ) -> Result<Vec<DeleteHistory>, ServiceError> {
        let mut catalog = self.write()?;
        let key = catalog.live_question_key(question_id)?;
        let result = catalog.board.delete_question_with(
            key,
            login_user,
            self.clock.as_ref(),
            |histories| -> Result<_, ServiceError> { Ok(self.histories.save_all(histories)?) },
        );

        match result {
            Ok(saved) => {
                info!(question_id = %question_id, histories = saved.len(), "question deleted");
                Ok(saved)
            }
            Err(e) => {
                warn!(question_id = %question_id, login = login_user.user_id(), error = %e, "question delete failed");
                Err(e)
            }
        }
    }

    pub fn find_question(&self, question_id: QuestionId) -> Result<Question, ServiceError> {
        let catalog = self.read()?;
        let key = catalog.live_question_key(question_id)?;
        catalog
            .board
            .question(key)
            .cloned()
            .ok_or(ServiceError::QuestionNotFound(question_id))
    }

    /// Live (not deleted) answers of a live question, oldest first.
    pub fn answers_of(&self, question_id: QuestionId) -> Result<Vec<Answer>, ServiceError> {
        let catalog = self.read()?;
        let key = catalog.live_question_key(question_id)?;
        Ok(catalog
            .board
            .answers_of(key)?
            .into_iter()
            .filter(|(_, a)| !a.is_deleted())
            .map(|(_, a)| a.clone())
            .collect())
    }

    pub fn delete_histories(&self) -> Vec<DeleteHistory> {
        self.histories.list()
    }

    /// Audit export: every delete history as a JSON array.
    pub fn export_delete_histories(&self) -> Result<String, ServiceError> {
        Ok(serde_json::to_string_pretty(&self.histories.list())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qna_core::SystemClock;

    use crate::repository::RepositoryError;

    fn service() -> QnaService<InMemoryUserRepository, InMemoryDeleteHistoryRepository> {
        QnaService::in_memory(Arc::new(SystemClock))
    }

    #[test]
    fn guest_cannot_register_or_write() {
        let service = service();
        let guest = User::guest();

        assert!(matches!(
            service.register_user(guest.clone()),
            Err(ServiceError::Domain(DomainError::Unauthorized))
        ));
        assert!(matches!(
            service.create_question(&guest, "title", "body"),
            Err(ServiceError::Domain(DomainError::Unauthorized))
        ));
    }

    #[test]
    fn unknown_ids_are_reported_by_kind() {
        let service = service();
        let alice = service
            .register_user(User::new("alice", "pw", "Alice", None).unwrap())
            .unwrap();
        let question_id = QuestionId::new();
        let answer_id = AnswerId::new();

        assert!(matches!(
            service.add_answer(&alice, question_id, "x"),
            Err(ServiceError::QuestionNotFound(id)) if id == question_id
        ));
        assert!(matches!(
            service.delete_answer(&alice, answer_id),
            Err(ServiceError::AnswerNotFound(id)) if id == answer_id
        ));
        assert!(matches!(
            service.find_user("nobody"),
            Err(ServiceError::UserNotFound(_))
        ));
    }

    #[test]
    fn failed_history_save_keeps_content_live() {
        struct UnavailableHistories;

        impl DeleteHistoryRepository for UnavailableHistories {
            fn save(&self, _history: DeleteHistory) -> Result<DeleteHistory, RepositoryError> {
                Err(RepositoryError::LockPoisoned)
            }

            fn list(&self) -> Vec<DeleteHistory> {
                Vec::new()
            }
        }

        let service = QnaService::new(
            InMemoryUserRepository::new(),
            UnavailableHistories,
            Arc::new(SystemClock),
        );
        let alice = service
            .register_user(User::new("alice", "pw", "Alice", None).unwrap())
            .unwrap();
        let question_id = service.create_question(&alice, "title", "body").unwrap();
        let answer_id = service.add_answer(&alice, question_id, "hello").unwrap();

        assert!(matches!(
            service.delete_answer(&alice, answer_id),
            Err(ServiceError::Storage(_))
        ));
        assert!(matches!(
            service.delete_question(&alice, question_id),
            Err(ServiceError::Storage(_))
        ));

        assert!(service.find_question(question_id).is_ok());
        let answers = service.answers_of(question_id).unwrap();
        assert_eq!(answers.len(), 1);
        assert!(!answers[0].is_deleted());
    }

    #[test]
    fn duplicate_registration_is_reported() {
        let service = service();
        service
            .register_user(User::new("alice", "pw", "Alice", None).unwrap())
            .unwrap();
        assert!(matches!(
            service.register_user(User::new("alice", "pw2", "Other", None).unwrap()),
            Err(ServiceError::DuplicateUser(login)) if login == "alice"
        ));
    }
}
