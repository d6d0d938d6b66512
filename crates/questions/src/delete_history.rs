use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use qna_auth::User;
use qna_core::{
    AnswerId, DeleteHistoryId, DomainResult, Entity, QuestionId, assign_once, same_identity,
};

/// Kind of content a [`DeleteHistory`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    Question,
    Answer,
}

impl core::fmt::Display for ContentType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ContentType::Question => write!(f, "QUESTION"),
            ContentType::Answer => write!(f, "ANSWER"),
        }
    }
}

/// Audit record: what was soft-deleted, by whom, when.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteHistory {
    id: Option<DeleteHistoryId>,
    content_type: ContentType,
    /// Identifier of the deleted question or answer (absent if it was never saved).
    content_id: Option<Uuid>,
    deleted_by: User,
    created_at: DateTime<Utc>,
}

impl DeleteHistory {
    pub fn new(
        content_type: ContentType,
        content_id: Option<Uuid>,
        deleted_by: User,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            content_type,
            content_id,
            deleted_by,
            created_at,
        }
    }

    pub fn for_question(id: Option<QuestionId>, deleted_by: User, at: DateTime<Utc>) -> Self {
        Self::new(ContentType::Question, id.map(Uuid::from), deleted_by, at)
    }

    pub fn for_answer(id: Option<AnswerId>, deleted_by: User, at: DateTime<Utc>) -> Self {
        Self::new(ContentType::Answer, id.map(Uuid::from), deleted_by, at)
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn content_id(&self) -> Option<Uuid> {
        self.content_id
    }

    pub fn deleted_by(&self) -> &User {
        &self.deleted_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn assign_id(&mut self, id: DeleteHistoryId) -> DomainResult<()> {
        assign_once(&mut self.id, id, "delete history")
    }
}

impl Entity for DeleteHistory {
    type Id = DeleteHistoryId;

    fn id(&self) -> Option<DeleteHistoryId> {
        self.id
    }
}

impl PartialEq for DeleteHistory {
    fn eq(&self, other: &Self) -> bool {
        same_identity(self, other)
    }
}
