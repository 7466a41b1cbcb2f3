use candid::CandidType;
use serde::Deserialize;

/// Lender-Borrower Strategy Result
pub type ManagerResult<T> = Result<T, ManagerError>;

/// Lender-Borrower Strategy Errors
#[derive(Clone, CandidType, Debug, Deserialize, PartialEq)]
pub enum ManagerError {
    /// Unauthorized access
    Unauthorized,
    /// The instance was already initialized
    AlreadyInitialized,
    /// The instance has not been initialized yet
    NotInitialized,
    /// A configuration update was rejected
    InvalidConfig(String),
    /// The health check rejected the reported profit or loss.
    /// Amounts are denominated in want.
    HealthCheckFailed { profit: String, loss: String },
    /// The token cannot be swept out of the strategy
    ProtectedToken(String),
    /// The requested amount exceeds what can currently be withdrawn
    ExceedsWithdrawable { requested: String, available: String },
    /// A requested value does not exist
    NonExistentValue,
    /// Error reported by a lending market, supply position or exchange adapter
    Market(String),
    /// Decoding issue
    DecodingError(String),
    /// Arithmetic error
    Arithmetic(String),
    /// Unknown/Custom error
    Custom(String),
}

impl ManagerError {
    /// Errors that will not go away by running the same call again.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ManagerError::Unauthorized
                | ManagerError::AlreadyInitialized
                | ManagerError::NotInitialized
                | ManagerError::InvalidConfig(_)
                | ManagerError::HealthCheckFailed { .. }
                | ManagerError::ProtectedToken(_)
        )
    }
}

pub fn arithmetic_err<S: AsRef<str>>(s: S) -> ManagerError {
    ManagerError::Arithmetic(format!("{:#?}", s.as_ref()))
}
