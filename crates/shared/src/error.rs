#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Validate(#[from] validator::ValidationErrors),

    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Event has reached maximum capacity")]
    CapacityExceeded,

    #[error("{0}")]
    InvalidOperation(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Nothing to update")]
    NoOp,

    #[error("Image upload failed: {0}")]
    UploadFailed(String),

    #[error("{0}")]
    Server(String),

    #[error("{0}")]
    Unknown(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Internal failures must not leak their details to callers.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Error::Server(_) | Error::Unknown(_) | Error::UploadFailed(_)
        )
    }
}

impl From<sqlx::Error> for Error {
    fn from(value: sqlx::Error) -> Self {
        match &value {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::Conflict("Email or mobile number already in use".to_owned())
            }
            _ => Self::Unknown(value.into()),
        }
    }
}

impl From<argon2::password_hash::Error> for Error {
    fn from(value: argon2::password_hash::Error) -> Self {
        Self::Unknown(anyhow::anyhow!(value))
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Unknown(value.into())
    }
}

#[macro_export]
macro_rules! invalid {
    ($($arg:tt)*) => {
        return Err($crate::Error::Invalid(format!($($arg)*)))
    };
}

#[macro_export]
macro_rules! forbidden {
    ($($arg:tt)*) => {
        return Err($crate::Error::Forbidden(format!($($arg)*)))
    };
}

#[macro_export]
macro_rules! not_found {
    ($($arg:tt)*) => {
        return Err($crate::Error::NotFound(format!($($arg)*)))
    };
}

#[macro_export]
macro_rules! conflict {
    ($($arg:tt)*) => {
        return Err($crate::Error::Conflict(format!($($arg)*)))
    };
}

#[macro_export]
macro_rules! invalid_operation {
    ($($arg:tt)*) => {
        return Err($crate::Error::InvalidOperation(format!($($arg)*)))
    };
}

#[macro_export]
macro_rules! server {
    ($($arg:tt)*) => {
        return Err($crate::Error::Server(format!($($arg)*)))
    };
}
