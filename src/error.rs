use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

/// Request field an input error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    UserId,
    ServiceName,
    Price,
    StartDate,
    EndDate,
    StartPeriod,
    EndPeriod,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::UserId => "user_id",
            Field::ServiceName => "service_name",
            Field::Price => "price",
            Field::StartDate => "start_date",
            Field::EndDate => "end_date",
            Field::StartPeriod => "start_period",
            Field::EndPeriod => "end_period",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Validation errors
    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: Field, reason: String },
    // Store-detected conditions
    #[error("Subscription already exists for this user")]
    Conflict,
    #[error("Subscription not found")]
    NotFound,
    // Anything else the database reports
    #[error(transparent)]
    Internal(#[from] sqlx::Error),
}

impl Error {
    pub fn invalid(field: Field, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}
