use anyhow::Result;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::FreelancerConfig;

use super::api::MarketplaceInterface;
use super::types::{BidDraft, Currency, OwnerRecord, ProjectDetails, ProjectType, RawProject};

use async_trait::async_trait;

/// REST client for the Freelancer marketplace API.
pub struct FreelancerClient {
    http: reqwest::Client,
    host: String,
    oauth_token: String,
    skill_ids: Vec<u32>,
    language_codes: Vec<String>,
}

#[async_trait]
impl MarketplaceInterface for FreelancerClient {
    async fn search_projects(&self, limit: u32, offset: u32) -> Result<Vec<RawProject>> {
        debug!("Searching projects (limit {}, offset {})", limit, offset);

        let mut query: Vec<(String, String)> = vec![
            ("query".into(), String::new()),
            ("limit".into(), limit.to_string()),
            ("offset".into(), offset.to_string()),
            ("sort_field".into(), "time_updated".into()),
            ("or_search_query".into(), "true".into()),
        ];
        for job in &self.skill_ids {
            query.push(("jobs[]".into(), job.to_string()));
        }
        for lang in &self.language_codes {
            query.push(("languages[]".into(), lang.clone()));
        }

        let url = format!("{}/api/projects/0.1/projects/active/", self.host);
        let response = self.authed(self.http.get(&url).query(&query)).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("Freelancer search error: {}", response.status());
        }

        let envelope: ApiEnvelope<SearchResult> = response.json().await?;
        let projects: Vec<RawProject> = envelope
            .result
            .projects
            .into_iter()
            .map(|p| self.convert_project(p))
            .collect();

        info!("Fetched {} projects from search feed", projects.len());
        Ok(projects)
    }

    async fn get_project_details(&self, project_id: u64) -> Result<ProjectDetails> {
        let url = format!("{}/api/projects/0.1/projects/{}/", self.host, project_id);
        let response = self
            .authed(self.http.get(&url).query(&[
                ("full_description", "true"),
                ("job_details", "true"),
                ("user_details", "true"),
                ("user_reputation", "true"),
                ("user_location", "true"),
            ]))
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Freelancer details error for {}: {}",
                project_id,
                response.status()
            );
        }

        let envelope: ApiEnvelope<WireProjectDetails> = response.json().await?;
        let d = envelope.result;
        Ok(ProjectDetails {
            title: d.title,
            description: d.description.unwrap_or_default(),
            minimum_budget: d.budget.as_ref().map(|b| b.minimum).unwrap_or(0.0),
            maximum_budget: d.budget.as_ref().and_then(|b| b.maximum).unwrap_or(0.0),
        })
    }

    async fn get_user_by_id(&self, user_id: u64) -> Result<OwnerRecord> {
        let url = format!("{}/api/users/0.1/users/{}/", self.host, user_id);
        let response = self.authed(self.http.get(&url)).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("Freelancer user lookup error for {}: {}", user_id, response.status());
        }

        let envelope: ApiEnvelope<WireUser> = response.json().await?;
        let user = envelope.result;
        Ok(OwnerRecord {
            id: user.id,
            country: user
                .location
                .and_then(|l| l.country)
                .and_then(|c| c.name),
        })
    }

    async fn get_self_user_id(&self) -> Result<u64> {
        let url = format!("{}/api/users/0.1/self/", self.host);
        let response = self.authed(self.http.get(&url)).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("Freelancer self lookup error: {}", response.status());
        }

        let envelope: ApiEnvelope<WireUser> = response.json().await?;
        Ok(envelope.result.id)
    }

    async fn get_bids(&self, project_id: u64) -> Result<Vec<u64>> {
        let url = format!("{}/api/projects/0.1/projects/{}/bids/", self.host, project_id);
        let response = self.authed(self.http.get(&url)).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("Freelancer bids lookup error for {}: {}", project_id, response.status());
        }

        let envelope: ApiEnvelope<WireBidList> = response.json().await?;
        Ok(envelope.result.bids.into_iter().map(|b| b.bidder_id).collect())
    }

    async fn place_bid(&self, draft: &BidDraft, bidder_id: u64) -> Result<u64> {
        info!(
            "📤 Placing bid on project {}: {:.2} {} over {} days",
            draft.project_id, draft.amount, draft.currency_code, draft.period_days
        );

        let url = format!("{}/api/projects/0.1/bids/", self.host);
        let body = serde_json::json!({
            "project_id": draft.project_id,
            "bidder_id": bidder_id,
            "amount": draft.amount,
            "period": draft.period_days,
            "milestone_percentage": 100,
            "description": draft.content,
        });

        let response = self.authed(self.http.post(&url).json(&body)).send().await?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Freelancer bid placement error for {}: {}",
                draft.project_id,
                response.status()
            );
        }

        let envelope: ApiEnvelope<WireBid> = response.json().await?;
        Ok(envelope.result.id)
    }

    async fn seal_bid(&self, bid_id: u64) -> Result<()> {
        let url = format!("{}/api/projects/0.1/bids/{}/", self.host, bid_id);
        let response = self
            .authed(self.http.put(&url).query(&[("action", "seal")]))
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("Freelancer seal error for bid {}: {}", bid_id, response.status());
        }

        let envelope: ApiEnvelope<serde_json::Value> = response.json().await?;
        if envelope.status != "success" {
            anyhow::bail!("Freelancer seal rejected for bid {}: {}", bid_id, envelope.status);
        }
        Ok(())
    }
}

impl FreelancerClient {
    pub fn new(config: &FreelancerConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .pool_idle_timeout(None) // keep connections alive across polling cycles
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            host: config.host.trim_end_matches('/').to_string(),
            oauth_token: config.oauth_token.clone(),
            skill_ids: config.skill_ids.clone(),
            language_codes: config.language_codes.clone(),
        }
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.header("freelancer-oauth-v1", &self.oauth_token)
    }

    /// Convert a wire search record to our RawProject
    fn convert_project(&self, wire: WireProject) -> RawProject {
        let nda = wire.upgrades.map(|u| u.nda).unwrap_or(false);
        if nda {
            debug!("Project {} carries an NDA upgrade", wire.id);
        }

        RawProject {
            id: wire.id,
            owner_id: wire.owner_id,
            title: wire.title,
            status: wire.status,
            project_type: wire.project_type,
            currency: Currency {
                code: wire.currency.code,
                exchange_rate: wire.currency.exchange_rate,
            },
            nda,
            submit_date: wire.submitdate,
            seo_url: wire.seo_url,
        }
    }
}

/// All marketplace responses arrive wrapped in a status/result envelope.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    status: String,
    result: T,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    projects: Vec<WireProject>,
}

#[derive(Debug, Deserialize)]
struct WireProject {
    id: u64,
    owner_id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    status: String,
    #[serde(rename = "type", default)]
    project_type: ProjectType,
    currency: WireCurrency,
    #[serde(default)]
    upgrades: Option<WireUpgrades>,
    #[serde(default)]
    submitdate: Option<i64>,
    #[serde(default)]
    seo_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireCurrency {
    #[serde(default)]
    code: String,
    #[serde(default)]
    exchange_rate: f64,
}

#[derive(Debug, Deserialize)]
struct WireUpgrades {
    #[serde(rename = "NDA", default)]
    nda: bool,
}

#[derive(Debug, Deserialize)]
struct WireProjectDetails {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    budget: Option<WireBudget>,
}

#[derive(Debug, Deserialize)]
struct WireBudget {
    #[serde(default)]
    minimum: f64,
    #[serde(default)]
    maximum: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WireUser {
    id: u64,
    #[serde(default)]
    location: Option<WireLocation>,
}

#[derive(Debug, Deserialize)]
struct WireLocation {
    #[serde(default)]
    country: Option<WireCountry>,
}

#[derive(Debug, Deserialize)]
struct WireCountry {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireBidList {
    #[serde(default)]
    bids: Vec<WireBidEntry>,
}

#[derive(Debug, Deserialize)]
struct WireBidEntry {
    bidder_id: u64,
}

#[derive(Debug, Deserialize)]
struct WireBid {
    id: u64,
}
