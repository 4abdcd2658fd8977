use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    #[diagnostic(code(studyhub::database))]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    #[diagnostic(
        code(studyhub::migrate),
        help("the database was probably created by a newer build")
    )]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Password hashing error: {0}")]
    #[diagnostic(code(studyhub::password))]
    Password(#[from] bcrypt::BcryptError),

    #[error("Server error: {0}")]
    #[diagnostic(code(studyhub::server))]
    Server(String),
}
