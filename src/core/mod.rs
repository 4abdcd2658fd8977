// core logic - tutor, classification, storage

mod classify;
pub mod demo;
mod models;
mod password;
mod provider;
mod store;
mod tutor;

pub use classify::{ResponseType, classify};
pub use models::{
    ChatMessage, MessageType, NewExchange, NewGroup, ROLE_STUDENT, ROLE_TEACHER, StudyGroup,
    TutorExchange, User,
};
pub use password::{hash as hash_password, verify as verify_password};
pub use provider::{ChatCompletions, ChatTurn, CompletionProvider, CompletionRequest};
pub use store::{SESSION_TTL_DAYS, Store};
pub use tutor::{
    CONFIG_ERROR_TEXT, DEFAULT_CONTEXT, DEFAULT_ENDPOINT, DEFAULT_MODEL, Tutor, TutorConfig,
    TutorError, TutorReply, UNEXPECTED_RESPONSE_TEXT,
};
