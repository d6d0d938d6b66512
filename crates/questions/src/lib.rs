//! Questions domain module: questions, their answers, and deletion audit.
//!
//! Questions and answers reference each other, so both live in a [`Board`]
//! arena and every change to the link goes through it. Pure domain logic
//! (no IO, no storage, no logging).

pub mod answer;
pub mod board;
pub mod delete_history;
pub mod question;

pub use answer::{ANSWER_OWNED_BY_ANOTHER_USER, Answer};
pub use board::{AnswerKey, Board, QuestionKey};
pub use delete_history::{ContentType, DeleteHistory};
pub use question::{QUESTION_OWNED_BY_ANOTHER_USER, Question};
