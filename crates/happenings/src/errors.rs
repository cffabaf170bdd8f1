use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}
