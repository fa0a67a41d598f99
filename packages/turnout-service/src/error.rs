pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Unauthorized: {message}")]
	Unauthorized { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Internal error: {message}")]
	Internal { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<turnout_storage::Error> for Error {
	fn from(err: turnout_storage::Error) -> Self {
		match err {
			turnout_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			turnout_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			turnout_storage::Error::NotFound(message) => Self::NotFound { message },
			turnout_storage::Error::Conflict(message) => Self::Conflict { message },
		}
	}
}
