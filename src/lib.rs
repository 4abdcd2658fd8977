// studyhub library - study groups, chat, and an ai tutor

pub mod cli;
mod core;
mod error;
mod server;

pub use crate::core::{
    CONFIG_ERROR_TEXT, ChatCompletions, ChatMessage, ChatTurn, CompletionProvider,
    CompletionRequest, DEFAULT_CONTEXT, DEFAULT_ENDPOINT, DEFAULT_MODEL, MessageType, NewExchange,
    NewGroup, ROLE_STUDENT, ROLE_TEACHER, ResponseType, SESSION_TTL_DAYS, Store, StudyGroup, Tutor,
    TutorConfig, TutorError, TutorExchange, TutorReply, UNEXPECTED_RESPONSE_TEXT, User, classify,
    demo, hash_password, verify_password,
};
pub use error::Error;
pub use server::{ApiError, AppState, CurrentUser, Server, router};
