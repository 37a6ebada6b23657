use crate::calendar::Weekday;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpenBesError {
    #[error("Request was considered invalid due to error: {0}")]
    InvalidRequest(#[from] anyhow::Error),
    #[error("Specification rejected: {0}")]
    InvalidDomainValue(#[from] InvalidDomainValueError),
    #[error("Error identified during OpenBES calculation: {0}")]
    FailureInCalculation(#[from] CalculationError),
    #[error("Error while writing results: {0}")]
    ErrorInOutput(OutputError),
}

/// An enumerated field in the specification held a value outside its declared domain.
///
/// This is the only input condition that aborts a run: every other gap in the
/// specification degrades the affected end use to zero instead.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("{field} holds '{value}', which is not a recognised {domain}")]
pub struct InvalidDomainValueError {
    field: String,
    value: String,
    domain: &'static str,
}

impl InvalidDomainValueError {
    pub(crate) fn new(field: impl Into<String>, value: impl Into<String>, domain: &'static str) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            domain,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum CalculationError {
    #[error("No occupied-day flag could be resolved for day {day} ({weekday})")]
    UnresolvedWeekday { day: u32, weekday: Weekday },
}

#[derive(Debug, Error)]
#[error(transparent)]
pub struct OutputError {
    error: anyhow::Error,
}

impl OutputError {
    pub(crate) fn new(error: anyhow::Error) -> Self {
        Self { error }
    }
}

impl From<OutputError> for OpenBesError {
    fn from(value: OutputError) -> Self {
        Self::ErrorInOutput(value)
    }
}
