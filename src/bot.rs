use anyhow::Result;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::freelancer::{BidDraft, MarketplaceInterface, QualifiedProject};
use crate::llm::CompletionInterface;
use crate::pipeline::{
    BidComposer, EligibilityFilter, PricingEstimator, ServiceMatchQualifier, SubmitError,
};

/// Read-only run observables for external consumers (dashboards etc.).
/// Written only by the bot task.
pub struct RunStatus {
    running: AtomicBool,
    bids_placed: AtomicU32,
    projects_seen: AtomicUsize,
}

impl RunStatus {
    fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
            bids_placed: AtomicU32::new(0),
            projects_seen: AtomicUsize::new(0),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub fn bids_placed(&self) -> u32 {
        self.bids_placed.load(Ordering::Relaxed)
    }

    pub fn projects_seen(&self) -> usize {
        self.projects_seen.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub bids_placed: u32,
    pub projects_seen: usize,
}

/// The bidding orchestrator: polls the feed, drives each new project
/// through filter -> qualifier -> {estimator, composer}, and submits
/// drafts one at a time until the bid cap is reached.
pub struct BidBot {
    config: Config,
    marketplace: Arc<dyn MarketplaceInterface>,
    llm: Arc<dyn CompletionInterface>,
    filter: EligibilityFilter,
    qualifier: ServiceMatchQualifier,
    estimator: PricingEstimator,
    composer: BidComposer,
    run_id: uuid::Uuid,
    processed_projects: HashSet<u64>,
    bids_placed: u32,
    status: Arc<RunStatus>,
    shutdown: watch::Receiver<bool>,
}

impl BidBot {
    pub fn new(
        config: Config,
        marketplace: Arc<dyn MarketplaceInterface>,
        llm: Arc<dyn CompletionInterface>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let filter = EligibilityFilter::new(config.filters.clone());
        let qualifier = ServiceMatchQualifier::new(&config.profile);
        let estimator = PricingEstimator::new(config.pricing.clone());
        let composer = BidComposer::new(&config.profile);

        Self {
            config,
            marketplace,
            llm,
            filter,
            qualifier,
            estimator,
            composer,
            run_id: uuid::Uuid::new_v4(),
            processed_projects: HashSet::new(),
            bids_placed: 0,
            status: Arc::new(RunStatus::new()),
            shutdown,
        }
    }

    /// Shared handle to the run observables.
    pub fn status(&self) -> Arc<RunStatus> {
        self.status.clone()
    }

    /// Main polling loop. Exits when the bid cap is exhausted or the
    /// shutdown signal fires; no upstream failure terminates the run.
    pub async fn run(&mut self) -> Result<RunSummary> {
        let cap = self.config.agent.bid_limit;
        info!("🚀 Starting bid agent run {} (cap: {} bids)", self.run_id, cap);
        self.status.running.store(true, Ordering::Relaxed);

        while self.bids_placed < cap && !self.stop_requested() {
            let batch = match self
                .marketplace
                .search_projects(self.config.agent.project_search_limit, 0)
                .await
            {
                Ok(batch) => batch,
                Err(e) => {
                    warn!(
                        "🔁 Project feed fetch failed: {} (retrying in {}s)",
                        e, self.config.agent.source_backoff_secs
                    );
                    if !self.pause(Duration::from_secs(self.config.agent.source_backoff_secs)).await {
                        break;
                    }
                    continue;
                }
            };

            if batch.is_empty() {
                warn!("Search feed returned no projects");
                if !self.idle_pause().await {
                    break;
                }
                continue;
            }
            debug!("📥 Fetched {} projects", batch.len());

            // Dedup partition. Ids enter the processed set before any
            // filtering so a project is never re-evaluated, even if it
            // is rejected further down this cycle.
            let mut fresh = Vec::new();
            for project in batch {
                if self.processed_projects.insert(project.id) {
                    fresh.push(project);
                }
            }
            self.status
                .projects_seen
                .store(self.processed_projects.len(), Ordering::Relaxed);

            if fresh.is_empty() {
                if !self.idle_pause().await {
                    break;
                }
                continue;
            }
            info!("🆕 {} new projects this cycle", fresh.len());

            let my_user_id = match self.marketplace.get_self_user_id().await {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!("Could not resolve own user id for screening: {}", e);
                    None
                }
            };

            let eligible = self
                .filter
                .run(self.marketplace.as_ref(), my_user_id, &fresh)
                .await;
            info!("🔍 {} of {} projects eligible", eligible.len(), fresh.len());

            let mut qualified = Vec::new();
            for project in eligible {
                if self.stop_requested() {
                    break;
                }
                if self.qualifier.qualify(self.llm.as_ref(), &project).await {
                    info!("✅ Project {} matched the service catalog", project.id);
                    qualified.push(QualifiedProject(project));
                } else {
                    info!("⛔ Project {} did not match", project.id);
                }
            }

            let placed_before = self.bids_placed;
            for (i, project) in qualified.iter().enumerate() {
                if self.bids_placed >= cap || self.stop_requested() {
                    break;
                }

                let pricing = self.estimator.price(self.llm.as_ref(), project).await;
                let content = self.composer.compose(self.llm.as_ref(), project).await;
                let draft = BidDraft::assemble(project, &pricing, content);

                match self.submit(&draft).await {
                    Ok(bid_id) => {
                        info!(
                            "🎉 Bid {} placed on project {} ({:.2} {} / {} days), {}",
                            bid_id,
                            draft.project_id,
                            draft.amount,
                            draft.currency_code,
                            draft.period_days,
                            draft.project_link
                        );
                    }
                    Err(SubmitError::Identity(e)) => {
                        warn!("Skipping project {}: {}", draft.project_id, e);
                    }
                    Err(SubmitError::Placement(e)) => {
                        error!("❌ Bid on project {} failed: {}", draft.project_id, e);
                    }
                }

                // Marketplace pacing between consecutive submissions.
                if i + 1 < qualified.len()
                    && self.bids_placed < cap
                    && !self
                        .pause(Duration::from_secs(self.config.agent.submission_pace_secs))
                        .await
                {
                    break;
                }
            }

            if self.bids_placed >= cap {
                info!("🏁 Bid cap reached ({} bids), stopping", cap);
                break;
            }

            // Quiet cycle: nothing went out, wait before polling again.
            if self.bids_placed == placed_before && !self.idle_pause().await {
                break;
            }
        }

        self.status.running.store(false, Ordering::Relaxed);
        let summary = RunSummary {
            bids_placed: self.bids_placed,
            projects_seen: self.processed_projects.len(),
        };
        info!(
            "🛑 Run finished: {} bids placed, {} projects seen",
            summary.bids_placed, summary.projects_seen
        );
        Ok(summary)
    }

    /// Submit a single draft. The counter tracks placement attempts that
    /// went through the placement call; sealing is best-effort on top.
    async fn submit(&mut self, draft: &BidDraft) -> Result<u64, SubmitError> {
        self.pace_for(draft).await;

        let bidder_id = self
            .marketplace
            .get_self_user_id()
            .await
            .map_err(SubmitError::Identity)?;

        let bid_id = self
            .marketplace
            .place_bid(draft, bidder_id)
            .await
            .map_err(SubmitError::Placement)?;

        self.bids_placed += 1;
        self.status
            .bids_placed
            .store(self.bids_placed, Ordering::Relaxed);

        if let Err(e) = self.marketplace.seal_bid(bid_id).await {
            warn!("🧷 Seal failed for bid {}: {} (bid stands)", bid_id, e);
        }

        Ok(bid_id)
    }

    /// Marketplace pacing: hold the bid until the project is at least
    /// `min_bid_age_secs` old. Skipped when the feed omitted the
    /// submission timestamp.
    async fn pace_for(&mut self, draft: &BidDraft) {
        let Some(submitted) = draft.submit_date else {
            return;
        };
        let min_age = self.config.agent.min_bid_age_secs as i64;
        let age = chrono::Utc::now().timestamp() - submitted;
        let wait = (min_age - age).clamp(0, min_age);
        if wait > 0 {
            debug!(
                "⏳ Waiting {}s until project {} is {}s old",
                wait, draft.project_id, min_age
            );
            self.pause(Duration::from_secs(wait as u64)).await;
        }
    }

    async fn idle_pause(&mut self) -> bool {
        self.pause(Duration::from_secs(self.config.agent.poll_interval_secs))
            .await
    }

    /// Cancellable sleep. Returns false when the shutdown signal fired,
    /// true when the full duration elapsed.
    async fn pause(&mut self, duration: Duration) -> bool {
        if self.stop_requested() {
            return false;
        }

        let deadline = tokio::time::sleep(duration);
        tokio::pin!(deadline);
        loop {
            tokio::select! {
                _ = &mut deadline => return true,
                changed = self.shutdown.changed() => match changed {
                    Ok(()) if *self.shutdown.borrow() => return false,
                    Ok(()) => {}
                    Err(_) => {
                        // Sender gone; nobody can stop us, finish the sleep.
                        deadline.as_mut().await;
                        return true;
                    }
                },
            }
        }
    }

    fn stop_requested(&self) -> bool {
        *self.shutdown.borrow()
    }
}
