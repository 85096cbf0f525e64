use anyhow::Result;
use async_trait::async_trait;

use super::types::{BidDraft, OwnerRecord, ProjectDetails, RawProject};

#[async_trait]
pub trait MarketplaceInterface: Send + Sync {
    /// Fetch a page of candidate projects for the configured search profile
    async fn search_projects(&self, limit: u32, offset: u32) -> Result<Vec<RawProject>>;

    /// Enrichment lookup: full description, budget bounds, owner details
    async fn get_project_details(&self, project_id: u64) -> Result<ProjectDetails>;

    /// Owner record, including profile country
    async fn get_user_by_id(&self, user_id: u64) -> Result<OwnerRecord>;

    /// Resolve the authenticated account's own user id
    async fn get_self_user_id(&self) -> Result<u64>;

    /// Bidder ids of the bids already placed on a project
    async fn get_bids(&self, project_id: u64) -> Result<Vec<u64>>;

    /// Place a bid; returns the marketplace bid id
    async fn place_bid(&self, draft: &BidDraft, bidder_id: u64) -> Result<u64>;

    /// Seal (highlight) a placed bid. Best-effort.
    async fn seal_bid(&self, bid_id: u64) -> Result<()>;
}
