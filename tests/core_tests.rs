use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

use freelancer_bid_agent::bot::BidBot;
use freelancer_bid_agent::config::{
    AgentConfig, Config, FilterConfig, FreelancerConfig, LlmConfig, PricingConfig, RateCardEntry,
    ServiceProfile,
};
use freelancer_bid_agent::freelancer::{
    BidDraft, Currency, MarketplaceInterface, OwnerRecord, ProjectDetails, ProjectType, RawProject,
};
use freelancer_bid_agent::llm::CompletionInterface;

/// Scripted marketplace double. Serves the same page on every search
/// call, can fail the first N searches, script per-call placement
/// outcomes, and flip the bot's shutdown signal after a given number of
/// search calls.
#[derive(Default)]
struct MockMarketplace {
    page: Vec<RawProject>,
    details: HashMap<u64, ProjectDetails>,
    owners: HashMap<u64, OwnerRecord>,
    search_failures: usize,
    stop_on_search: Option<(usize, watch::Sender<bool>)>,
    identity_fails: bool,
    place_script: Mutex<VecDeque<bool>>,
    search_calls: AtomicUsize,
    detail_calls: AtomicUsize,
    place_attempts: AtomicUsize,
    seal_calls: AtomicUsize,
    placed: Mutex<Vec<BidDraft>>,
    next_bid_id: AtomicU64,
}

impl MockMarketplace {
    fn new(page: Vec<RawProject>) -> Self {
        let mut mock = Self {
            page: page.clone(),
            next_bid_id: AtomicU64::new(1),
            ..Default::default()
        };
        for project in &page {
            mock.details.insert(
                project.id,
                ProjectDetails {
                    title: project.title.clone(),
                    description: format!("Description for project {}", project.id),
                    minimum_budget: 200.0,
                    maximum_budget: 800.0,
                },
            );
            mock.owners.insert(
                project.owner_id,
                OwnerRecord {
                    id: project.owner_id,
                    country: Some("Germany".into()),
                },
            );
        }
        mock
    }

    fn placed(&self) -> Vec<BidDraft> {
        self.placed.lock().unwrap().clone()
    }
}

#[async_trait]
impl MarketplaceInterface for MockMarketplace {
    async fn search_projects(&self, _limit: u32, _offset: u32) -> Result<Vec<RawProject>> {
        let call = self.search_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((stop_at, tx)) = &self.stop_on_search {
            if call >= *stop_at {
                let _ = tx.send(true);
                return Ok(Vec::new());
            }
        }
        if call <= self.search_failures {
            return Err(anyhow!("feed unavailable"));
        }
        Ok(self.page.clone())
    }

    async fn get_project_details(&self, project_id: u64) -> Result<ProjectDetails> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.details
            .get(&project_id)
            .cloned()
            .ok_or_else(|| anyhow!("no details for {}", project_id))
    }

    async fn get_user_by_id(&self, user_id: u64) -> Result<OwnerRecord> {
        self.owners
            .get(&user_id)
            .cloned()
            .ok_or_else(|| anyhow!("no user {}", user_id))
    }

    async fn get_self_user_id(&self) -> Result<u64> {
        if self.identity_fails {
            return Err(anyhow!("session expired"));
        }
        Ok(42)
    }

    async fn get_bids(&self, _project_id: u64) -> Result<Vec<u64>> {
        Ok(Vec::new())
    }

    async fn place_bid(&self, draft: &BidDraft, _bidder_id: u64) -> Result<u64> {
        self.place_attempts.fetch_add(1, Ordering::SeqCst);
        let outcome = self.place_script.lock().unwrap().pop_front().unwrap_or(true);
        if !outcome {
            return Err(anyhow!("placement rejected"));
        }
        self.placed.lock().unwrap().push(draft.clone());
        Ok(self.next_bid_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn seal_bid(&self, _bid_id: u64) -> Result<()> {
        self.seal_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Completion double that routes by prompt: qualification prompts get
/// the configured verdict, pricing prompts the configured quote, and
/// everything else (the composer) plain proposal text.
struct MockLlm {
    qualify_reply: String,
    pricing_reply: String,
    fail_all: bool,
    calls: AtomicUsize,
}

impl MockLlm {
    fn matching() -> Self {
        Self {
            qualify_reply: "MATCH".into(),
            pricing_reply: "Budget: 600 USD, Deadline: 10 days".into(),
            fail_all: false,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::matching()
        }
    }
}

#[async_trait]
impl CompletionInterface for MockLlm {
    async fn complete(&self, system_prompt: &str, _user_prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_all {
            return Err(anyhow!("completion endpoint error: 503"));
        }
        if system_prompt.contains("NO MATCH") {
            Ok(self.qualify_reply.clone())
        } else if system_prompt.contains("Budget:") {
            Ok(self.pricing_reply.clone())
        } else {
            Ok("Proposal text".into())
        }
    }
}

fn test_config(bid_limit: u32) -> Config {
    Config {
        freelancer: FreelancerConfig {
            oauth_token: "token".into(),
            host: "http://unused".into(),
            skill_ids: vec![3],
            language_codes: vec!["en".into()],
        },
        llm: LlmConfig {
            api_key: "key".into(),
            base_url: "http://unused".into(),
            model: "test".into(),
        },
        agent: AgentConfig {
            bid_limit,
            project_search_limit: 10,
            poll_interval_secs: 1,
            source_backoff_secs: 1,
            min_bid_age_secs: 0,
            submission_pace_secs: 1,
            simulation_mode: true,
        },
        filters: FilterConfig {
            unwanted_countries: vec!["india".into()],
            unwanted_currencies: vec!["INR".into()],
            min_fixed_budget: 30.0,
        },
        pricing: PricingConfig {
            min_fixed_bid_usd: 70.0,
            degenerate_rate_bid: 1000.0,
            hourly_floor: 25.0,
            fixed_fallback_period_days: 7,
            hourly_period_days: 40,
            rate_card: vec![RateCardEntry {
                service: "Logo design".into(),
                budget_usd: 50,
                timeline_days: 2,
            }],
        },
        profile: ServiceProfile {
            service_offerings: "CMS website builds and graphic design".into(),
            bid_style: "Write a bid.\nRegards,\n{signature}".into(),
            portfolio_links: "1. portfolio : https://example.com".into(),
            signature: "The Studio".into(),
        },
    }
}

fn fixed_project(id: u64) -> RawProject {
    RawProject {
        id,
        owner_id: 1000 + id,
        title: format!("Project {}", id),
        status: "active".into(),
        project_type: ProjectType::Fixed,
        currency: Currency {
            code: "AUD".into(),
            exchange_rate: 2.0,
        },
        nda: false,
        submit_date: None,
        seo_url: None,
    }
}

#[tokio::test(start_paused = true)]
async fn project_is_processed_in_at_most_one_cycle() {
    let (tx, rx) = watch::channel(false);
    let mut marketplace = MockMarketplace::new(vec![fixed_project(1)]);
    // Same page on cycles 1 and 2; the third search flips the shutdown.
    marketplace.stop_on_search = Some((3, tx));
    let marketplace = Arc::new(marketplace);
    let llm = Arc::new(MockLlm::matching());

    let mut bot = BidBot::new(test_config(10), marketplace.clone(), llm.clone(), rx);
    let summary = bot.run().await.unwrap();

    // One placement despite the feed returning the project repeatedly
    assert_eq!(marketplace.place_attempts.load(Ordering::SeqCst), 1);
    assert_eq!(summary.bids_placed, 1);
    assert_eq!(summary.projects_seen, 1);
}

#[tokio::test(start_paused = true)]
async fn cap_counts_placement_attempts_that_went_through() {
    let (_tx, rx) = watch::channel(false);
    let page: Vec<RawProject> = (1..=5).map(fixed_project).collect();
    let mut marketplace = MockMarketplace::new(page);
    // First two placements fail, the rest go through.
    marketplace.place_script =
        Mutex::new(VecDeque::from(vec![false, false, true, true, true, true]));
    let marketplace = Arc::new(marketplace);
    let llm = Arc::new(MockLlm::matching());

    let mut bot = BidBot::new(test_config(3), marketplace.clone(), llm, rx);
    let summary = bot.run().await.unwrap();

    // Failures do not consume the cap; the loop terminates at cap.
    assert_eq!(marketplace.place_attempts.load(Ordering::SeqCst), 5);
    assert_eq!(marketplace.placed().len(), 3);
    assert_eq!(summary.bids_placed, 3);
    // Every placed bid was priced off the model quote: max(70, 600) / 2.0
    for draft in marketplace.placed() {
        assert_eq!(draft.amount, 300.0);
        assert_eq!(draft.period_days, 10);
        assert_eq!(draft.currency_code, "AUD");
    }
}

#[tokio::test(start_paused = true)]
async fn nda_project_is_never_enriched_or_qualified() {
    let (tx, rx) = watch::channel(false);
    let mut project = fixed_project(1);
    project.nda = true;
    let mut marketplace = MockMarketplace::new(vec![project]);
    marketplace.stop_on_search = Some((2, tx));
    let marketplace = Arc::new(marketplace);
    let llm = Arc::new(MockLlm::matching());

    let mut bot = BidBot::new(test_config(10), marketplace.clone(), llm.clone(), rx);
    let summary = bot.run().await.unwrap();

    assert_eq!(marketplace.detail_calls.load(Ordering::SeqCst), 0);
    assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    assert_eq!(summary.bids_placed, 0);
}

#[tokio::test(start_paused = true)]
async fn qualification_failure_fails_closed() {
    let (tx, rx) = watch::channel(false);
    let mut marketplace = MockMarketplace::new(vec![fixed_project(1)]);
    marketplace.stop_on_search = Some((2, tx));
    let marketplace = Arc::new(marketplace);
    let llm = Arc::new(MockLlm::failing());

    let mut bot = BidBot::new(test_config(10), marketplace.clone(), llm.clone(), rx);
    let summary = bot.run().await.unwrap();

    // The qualifier was consulted, errored, and the project was dropped
    assert!(llm.calls.load(Ordering::SeqCst) >= 1);
    assert_eq!(marketplace.place_attempts.load(Ordering::SeqCst), 0);
    assert_eq!(summary.bids_placed, 0);
}

#[tokio::test(start_paused = true)]
async fn identity_failure_aborts_only_the_submission() {
    let (tx, rx) = watch::channel(false);
    let mut marketplace = MockMarketplace::new(vec![fixed_project(1)]);
    marketplace.identity_fails = true;
    marketplace.stop_on_search = Some((2, tx));
    let marketplace = Arc::new(marketplace);
    let llm = Arc::new(MockLlm::matching());

    let mut bot = BidBot::new(test_config(10), marketplace.clone(), llm.clone(), rx);
    let summary = bot.run().await.unwrap();

    // The pipeline still ran (qualify + price + compose), only the
    // placement was abandoned.
    assert_eq!(llm.calls.load(Ordering::SeqCst), 3);
    assert_eq!(marketplace.place_attempts.load(Ordering::SeqCst), 0);
    assert_eq!(summary.bids_placed, 0);
}

#[tokio::test(start_paused = true)]
async fn transient_feed_failures_are_retried() {
    let (_tx, rx) = watch::channel(false);
    let mut marketplace = MockMarketplace::new(vec![fixed_project(1)]);
    marketplace.search_failures = 2;
    let marketplace = Arc::new(marketplace);
    let llm = Arc::new(MockLlm::matching());

    let mut bot = BidBot::new(test_config(1), marketplace.clone(), llm, rx);
    let summary = bot.run().await.unwrap();

    assert!(marketplace.search_calls.load(Ordering::SeqCst) >= 3);
    assert_eq!(summary.bids_placed, 1);
}

#[tokio::test(start_paused = true)]
async fn shutdown_signal_stops_the_run_before_cap() {
    let (tx, rx) = watch::channel(false);
    let mut marketplace = MockMarketplace::new(vec![fixed_project(1)]);
    marketplace.stop_on_search = Some((2, tx));
    let marketplace = Arc::new(marketplace);
    let llm = Arc::new(MockLlm::matching());

    let mut bot = BidBot::new(test_config(100), marketplace.clone(), llm, rx);
    let status = bot.status();
    let summary = bot.run().await.unwrap();

    assert_eq!(summary.bids_placed, 1);
    assert!(!status.is_running());
    assert_eq!(status.bids_placed(), 1);
    assert_eq!(status.projects_seen(), 1);
}

#[tokio::test(start_paused = true)]
async fn successful_placement_triggers_best_effort_seal() {
    let (_tx, rx) = watch::channel(false);
    let marketplace = Arc::new(MockMarketplace::new(vec![fixed_project(1)]));
    let llm = Arc::new(MockLlm::matching());

    let mut bot = BidBot::new(test_config(1), marketplace.clone(), llm, rx);
    bot.run().await.unwrap();

    assert_eq!(marketplace.seal_calls.load(Ordering::SeqCst), 1);
}
