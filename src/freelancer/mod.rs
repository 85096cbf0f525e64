pub mod api;
pub mod client;
pub mod types;

pub use api::MarketplaceInterface;
pub use client::FreelancerClient;
pub use types::{
    BidDraft, Currency, EnrichedProject, OwnerRecord, PricingResult, ProjectDetails, ProjectType,
    QualifiedProject, RawProject,
};
