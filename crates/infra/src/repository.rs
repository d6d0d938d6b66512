//! Storage adapters for users and delete histories.
//!
//! Repositories hand out identifiers on first save, the way a database
//! identity column would.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use qna_auth::User;
use qna_core::{DeleteHistoryId, DomainError, Entity, UserId};
use qna_questions::DeleteHistory;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("user '{0}' already exists")]
    DuplicateUser(String),

    #[error("unknown user id {0}")]
    UnknownUser(UserId),

    #[error("lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

pub trait UserRepository: Send + Sync {
    /// Insert (assigning an id) or replace an existing user.
    fn save(&self, user: User) -> Result<User, RepositoryError>;
    fn find(&self, id: UserId) -> Option<User>;
    fn find_by_user_id(&self, user_id: &str) -> Option<User>;
}

pub trait DeleteHistoryRepository: Send + Sync {
    fn save(&self, history: DeleteHistory) -> Result<DeleteHistory, RepositoryError>;

    fn save_all(
        &self,
        histories: Vec<DeleteHistory>,
    ) -> Result<Vec<DeleteHistory>, RepositoryError> {
        histories.into_iter().map(|h| self.save(h)).collect()
    }

    /// All records, oldest first.
    fn list(&self) -> Vec<DeleteHistory>;
}

impl<S> UserRepository for Arc<S>
where
    S: UserRepository + ?Sized,
{
    fn save(&self, user: User) -> Result<User, RepositoryError> {
        (**self).save(user)
    }

    fn find(&self, id: UserId) -> Option<User> {
        (**self).find(id)
    }

    fn find_by_user_id(&self, user_id: &str) -> Option<User> {
        (**self).find_by_user_id(user_id)
    }
}

impl<S> DeleteHistoryRepository for Arc<S>
where
    S: DeleteHistoryRepository + ?Sized,
{
    fn save(&self, history: DeleteHistory) -> Result<DeleteHistory, RepositoryError> {
        (**self).save(history)
    }

    fn list(&self) -> Vec<DeleteHistory> {
        (**self).list()
    }
}

/// In-memory user store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    inner: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryUserRepository {
    fn save(&self, mut user: User) -> Result<User, RepositoryError> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        let clash = map
            .values()
            .any(|u| u.user_id() == user.user_id() && u.id() != user.id());
        if clash {
            return Err(RepositoryError::DuplicateUser(user.user_id().to_string()));
        }

        let id = match user.id() {
            Some(id) if map.contains_key(&id) => id,
            Some(id) => return Err(RepositoryError::UnknownUser(id)),
            None => {
                let id = UserId::new();
                user.assign_id(id)?;
                id
            }
        };

        map.insert(id, user.clone());
        Ok(user)
    }

    fn find(&self, id: UserId) -> Option<User> {
        let map = self.inner.read().ok()?;
        map.get(&id).cloned()
    }

    fn find_by_user_id(&self, user_id: &str) -> Option<User> {
        let map = self.inner.read().ok()?;
        map.values().find(|u| u.user_id() == user_id).cloned()
    }
}

/// In-memory append-only audit log for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryDeleteHistoryRepository {
    records: RwLock<Vec<DeleteHistory>>,
}

impl InMemoryDeleteHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeleteHistoryRepository for InMemoryDeleteHistoryRepository {
    fn save(&self, mut history: DeleteHistory) -> Result<DeleteHistory, RepositoryError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        if history.id().is_none() {
            history.assign_id(DeleteHistoryId::new())?;
        }
        records.push(history.clone());
        Ok(history)
    }

    fn list(&self) -> Vec<DeleteHistory> {
        match self.records.read() {
            Ok(records) => records.clone(),
            Err(_) => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use qna_questions::ContentType;

    fn alice() -> User {
        User::new("alice", "pw", "Alice", None).unwrap()
    }

    #[test]
    fn first_save_assigns_identifier() {
        let repo = InMemoryUserRepository::new();
        let saved = repo.save(alice()).unwrap();

        let id = saved.id().expect("id assigned on save");
        assert_eq!(repo.find(id), Some(saved.clone()));
        assert_eq!(repo.find_by_user_id("alice"), Some(saved));
    }

    #[test]
    fn duplicate_login_is_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.save(alice()).unwrap();

        assert_eq!(
            repo.save(alice()).unwrap_err(),
            RepositoryError::DuplicateUser("alice".to_string())
        );
    }

    #[test]
    fn saving_a_stored_user_replaces_it() {
        let repo = InMemoryUserRepository::new();
        let mut saved = repo.save(alice()).unwrap();
        let login = saved.clone();
        let target = User::new("alice", "pw", "Alice L.", None).unwrap();
        saved.update(&login, &target).unwrap();

        repo.save(saved.clone()).unwrap();
        let found = repo.find_by_user_id("alice").unwrap();
        assert_eq!(found.name(), "Alice L.");
    }

    #[test]
    fn saving_with_foreign_identifier_is_rejected() {
        let repo = InMemoryUserRepository::new();
        let mut user = alice();
        let id = UserId::new();
        user.assign_id(id).unwrap();

        assert_eq!(repo.save(user).unwrap_err(), RepositoryError::UnknownUser(id));
    }

    #[test]
    fn histories_get_identifiers_and_keep_order() {
        let repo = Arc::new(InMemoryDeleteHistoryRepository::new());
        let user = alice();
        let saved = repo
            .save_all(vec![
                DeleteHistory::for_question(None, user.clone(), Utc::now()),
                DeleteHistory::for_answer(None, user, Utc::now()),
            ])
            .unwrap();

        assert!(saved.iter().all(|h| h.id().is_some()));
        let listed: Vec<ContentType> = repo.list().iter().map(|h| h.content_type()).collect();
        assert_eq!(listed, vec![ContentType::Question, ContentType::Answer]);
    }
}
