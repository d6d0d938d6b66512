//! User entity: who writes questions and answers, and who may delete them.

use serde::{Deserialize, Serialize};

use qna_core::{DomainError, DomainResult, Entity, UserId, assign_once, same_identity};

/// A board member, or the anonymous guest.
///
/// # Invariants
/// - `user_id` (the login name) is never blank for members.
/// - The guest never has an identifier and never equals a member, so it never
///   owns anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: Option<UserId>,
    user_id: String,
    #[serde(skip_serializing, default)]
    password: String,
    name: String,
    email: Option<String>,
    #[serde(skip)]
    guest: bool,
}

impl User {
    pub fn new(
        user_id: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
        email: Option<String>,
    ) -> DomainResult<Self> {
        let user_id = user_id.into();
        if user_id.trim().is_empty() {
            return Err(DomainError::validation("user_id cannot be empty"));
        }

        Ok(Self {
            id: None,
            user_id,
            password: password.into(),
            name: name.into(),
            email,
            guest: false,
        })
    }

    /// The anonymous caller.
    pub fn guest() -> Self {
        Self {
            id: None,
            user_id: "guest".to_string(),
            password: String::new(),
            name: "guest".to_string(),
            email: None,
            guest: true,
        }
    }

    pub fn is_guest(&self) -> bool {
        self.guest
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn assign_id(&mut self, id: UserId) -> DomainResult<()> {
        if self.guest {
            return Err(DomainError::conflict("guest user cannot be persisted"));
        }
        assign_once(&mut self.id, id, "user")
    }

    pub fn matches_password(&self, password: &str) -> bool {
        !self.guest && self.password == password
    }

    pub fn equals_name_and_email(&self, other: &User) -> bool {
        self.name == other.name && self.email == other.email
    }

    /// Copy `target`'s profile (name, email) onto this user.
    ///
    /// Only the user itself may do this, and `target` must carry the current
    /// password.
    pub fn update(&mut self, login_user: &User, target: &User) -> DomainResult<()> {
        if login_user.guest || login_user.user_id != self.user_id {
            return Err(DomainError::unauthorized());
        }
        if !self.matches_password(&target.password) {
            return Err(DomainError::unauthorized());
        }

        self.name = target.name.clone();
        self.email = target.email.clone();
        Ok(())
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> Option<UserId> {
        self.id
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.guest == other.guest && same_identity(self, other)
    }
}

impl core::hash::Hash for User {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        core::hash::Hash::hash(&self.id, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(login: &str) -> User {
        let mut user = User::new(login, "secret", "Name", Some(format!("{login}@example.com"))).unwrap();
        user.assign_id(UserId::new()).unwrap();
        user
    }

    #[test]
    fn new_rejects_blank_login() {
        let err = User::new("  ", "pw", "Name", None).unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for blank user_id"),
        }
    }

    #[test]
    fn equality_follows_identifier_only() {
        let alice = member("alice");
        let mut renamed = alice.clone();
        renamed.name = "Someone Else".to_string();
        assert_eq!(alice, renamed);

        let bob = member("bob");
        assert_ne!(alice, bob);
    }

    #[test]
    fn unsaved_users_compare_by_missing_identifier() {
        let a = User::new("alice", "pw", "A", None).unwrap();
        assert_eq!(a, a.clone());
        assert_eq!(User::guest(), User::guest());
        assert_ne!(User::guest(), a);
        assert_ne!(member("alice"), a);
    }

    #[test]
    fn guest_cannot_be_persisted_or_match_passwords() {
        let mut guest = User::guest();
        assert!(guest.is_guest());
        assert!(!guest.matches_password(""));
        assert!(matches!(guest.assign_id(UserId::new()), Err(DomainError::Conflict(_))));
    }

    #[test]
    fn update_copies_profile_for_self_with_correct_password() {
        let mut alice = member("alice");
        let login = alice.clone();
        let target = User::new("alice", "secret", "Alice Liddell", Some("a@wonder.land".into())).unwrap();

        alice.update(&login, &target).unwrap();
        assert_eq!(alice.name(), "Alice Liddell");
        assert_eq!(alice.email(), Some("a@wonder.land"));
        assert!(alice.equals_name_and_email(&target));
    }

    #[test]
    fn update_rejects_other_user_and_wrong_password() {
        let mut alice = member("alice");
        let bob = member("bob");
        let target = User::new("alice", "secret", "Hijacked", None).unwrap();
        assert_eq!(alice.update(&bob, &target), Err(DomainError::Unauthorized));

        let login = alice.clone();
        let wrong = User::new("alice", "wrong", "Hijacked", None).unwrap();
        assert_eq!(alice.update(&login, &wrong), Err(DomainError::Unauthorized));
        assert_eq!(alice.name(), "Name");
    }

    #[test]
    fn password_is_never_serialized() {
        let alice = member("alice");
        let json = serde_json::to_value(&alice).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["user_id"], "alice");
    }
}
