#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("{field} must not be empty")]
    BlankField { field: &'static str },

    #[error("year must be non-negative, got {0}")]
    NegativeYear(i64),

    #[error("year {0} is out of range")]
    YearOutOfRange(i64),
}
