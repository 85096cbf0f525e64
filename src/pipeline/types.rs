use std::fmt;

use thiserror::Error;

use crate::freelancer::EnrichedProject;

/// Why the eligibility screen rejected a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    AlreadyBid,
    ExcludedCountry(String),
    ExcludedCurrency(String),
    NdaRequired,
    Inactive(String),
    BudgetTooLow,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::AlreadyBid => write!(f, "already bid on this project"),
            RejectReason::ExcludedCountry(c) => write!(f, "owner country excluded: {}", c),
            RejectReason::ExcludedCurrency(c) => write!(f, "currency excluded: {}", c),
            RejectReason::NdaRequired => write!(f, "NDA required"),
            RejectReason::Inactive(s) => write!(f, "status not active: {}", s),
            RejectReason::BudgetTooLow => write!(f, "fixed budget below threshold"),
        }
    }
}

/// Per-project outcome of the eligibility screen. `Failed` is a soft
/// failure: the project is dropped without a verdict and the batch
/// continues.
#[derive(Debug)]
pub enum Screening {
    Eligible(Box<EnrichedProject>),
    Rejected(RejectReason),
    Failed(anyhow::Error),
}

/// Submission failures the orchestrator decides policy on. Both abort
/// only the current draft; neither stops the run.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("could not resolve own user id: {0}")]
    Identity(anyhow::Error),
    #[error("bid placement failed: {0}")]
    Placement(anyhow::Error),
}
