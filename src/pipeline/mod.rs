pub mod compose;
pub mod filter;
pub mod parser;
pub mod pricing;
pub mod qualify;
pub mod types;

pub use compose::BidComposer;
pub use filter::EligibilityFilter;
pub use parser::{parse_quote, Quote};
pub use pricing::PricingEstimator;
pub use qualify::ServiceMatchQualifier;
pub use types::{RejectReason, Screening, SubmitError};
