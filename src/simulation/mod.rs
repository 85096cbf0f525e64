use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::info;

use crate::freelancer::{
    BidDraft, MarketplaceInterface, OwnerRecord, ProjectDetails, RawProject,
};

/// Simulates the marketplace for dry runs and tests: serves loaded
/// projects and records placed bids instead of touching the network.
pub struct MarketplaceSimulator {
    projects: Mutex<Vec<RawProject>>,
    details: Mutex<HashMap<u64, ProjectDetails>>,
    owners: Mutex<HashMap<u64, OwnerRecord>>,
    bids: Mutex<HashMap<u64, Vec<u64>>>,
    placed: Mutex<Vec<PlacedBid>>,
    detail_lookups: AtomicUsize,
    next_bid_id: AtomicU64,
    self_id: u64,
}

#[derive(Debug, Clone)]
pub struct PlacedBid {
    pub project_id: u64,
    pub amount: f64,
    pub period_days: u32,
    pub content: String,
}

impl MarketplaceSimulator {
    pub fn new() -> Self {
        Self {
            projects: Mutex::new(Vec::new()),
            details: Mutex::new(HashMap::new()),
            owners: Mutex::new(HashMap::new()),
            bids: Mutex::new(HashMap::new()),
            placed: Mutex::new(Vec::new()),
            detail_lookups: AtomicUsize::new(0),
            next_bid_id: AtomicU64::new(1),
            self_id: 42,
        }
    }

    pub fn load_projects(&self, projects: Vec<RawProject>) {
        let mut guard = self.projects.lock().unwrap();
        *guard = projects;
        info!("🎞️  Simulator loaded {} projects", guard.len());
    }

    pub fn load_details(&self, project_id: u64, details: ProjectDetails) {
        self.details.lock().unwrap().insert(project_id, details);
    }

    pub fn load_owner(&self, owner: OwnerRecord) {
        self.owners.lock().unwrap().insert(owner.id, owner);
    }

    pub fn load_bids(&self, project_id: u64, bidder_ids: Vec<u64>) {
        self.bids.lock().unwrap().insert(project_id, bidder_ids);
    }

    pub fn placed_bids(&self) -> Vec<PlacedBid> {
        self.placed.lock().unwrap().clone()
    }

    pub fn detail_lookups(&self) -> usize {
        self.detail_lookups.load(Ordering::Relaxed)
    }
}

impl Default for MarketplaceSimulator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketplaceInterface for MarketplaceSimulator {
    async fn search_projects(&self, limit: u32, _offset: u32) -> Result<Vec<RawProject>> {
        let guard = self.projects.lock().unwrap();
        Ok(guard.iter().take(limit as usize).cloned().collect())
    }

    async fn get_project_details(&self, project_id: u64) -> Result<ProjectDetails> {
        self.detail_lookups.fetch_add(1, Ordering::Relaxed);
        self.details
            .lock()
            .unwrap()
            .get(&project_id)
            .cloned()
            .ok_or_else(|| anyhow!("project {} not found in simulation", project_id))
    }

    async fn get_user_by_id(&self, user_id: u64) -> Result<OwnerRecord> {
        self.owners
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .ok_or_else(|| anyhow!("user {} not found in simulation", user_id))
    }

    async fn get_self_user_id(&self) -> Result<u64> {
        Ok(self.self_id)
    }

    async fn get_bids(&self, project_id: u64) -> Result<Vec<u64>> {
        Ok(self
            .bids
            .lock()
            .unwrap()
            .get(&project_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn place_bid(&self, draft: &BidDraft, _bidder_id: u64) -> Result<u64> {
        info!(
            "📝 [SIM] Bid on project {}: {:.2} {} over {} days",
            draft.project_id, draft.amount, draft.currency_code, draft.period_days
        );
        self.placed.lock().unwrap().push(PlacedBid {
            project_id: draft.project_id,
            amount: draft.amount,
            period_days: draft.period_days,
            content: draft.content.clone(),
        });
        Ok(self.next_bid_id.fetch_add(1, Ordering::Relaxed))
    }

    async fn seal_bid(&self, bid_id: u64) -> Result<()> {
        info!("🧷 [SIM] Sealed bid {}", bid_id);
        Ok(())
    }
}
