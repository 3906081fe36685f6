use std::borrow::Cow;

use derive_more::{Display, Error, IsVariant};

/// Raw input failed a precondition before any computation started.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display(fmt = "invalid {}: {}", field, reason)]
pub struct ValidationError {
    pub field: Cow<'static, str>,
    pub reason: Cow<'static, str>,
}

impl ValidationError {
    pub fn new(field: impl Into<Cow<'static, str>>, reason: impl Into<Cow<'static, str>>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// A mathematical precondition (positive denominator, positive margin, ...)
/// does not hold at computation time.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display(fmt = "{}", reason)]
pub struct DomainError {
    pub reason: Cow<'static, str>,
}

impl DomainError {
    pub fn new(reason: impl Into<Cow<'static, str>>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Error, IsVariant)]
pub enum ComputationError {
    #[display(fmt = "{}", _0)]
    Validation(#[error(not(source))] ValidationError),
    #[display(fmt = "domain error: {}", _0)]
    Domain(#[error(not(source))] DomainError),
    #[display(
        fmt = "insufficient data: {} point(s) given, at least {} required",
        given,
        required
    )]
    InsufficientData { given: usize, required: usize },
}

impl From<ValidationError> for ComputationError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<DomainError> for ComputationError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}
