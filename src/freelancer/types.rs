use serde::{Deserialize, Serialize};

/// Marketplace listing type. Anything that is not fixed-price is priced
/// off the client's budget range, never off the model's quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Fixed,
    Hourly,
    #[serde(other)]
    Other,
}

impl Default for ProjectType {
    fn default() -> Self {
        ProjectType::Other
    }
}

impl ProjectType {
    pub fn is_fixed(&self) -> bool {
        matches!(self, ProjectType::Fixed)
    }
}

/// Listing currency. `exchange_rate` is USD per one unit of the source
/// currency; 0.0 when the feed omits it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    #[serde(default)]
    pub exchange_rate: f64,
}

/// A candidate project as returned by the search feed. Immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawProject {
    pub id: u64,
    pub owner_id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub project_type: ProjectType,
    pub currency: Currency,
    #[serde(default)]
    pub nda: bool,
    #[serde(default)]
    pub submit_date: Option<i64>,
    #[serde(default)]
    pub seo_url: Option<String>,
}

/// Full project record from the enrichment lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDetails {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub minimum_budget: f64,
    #[serde(default)]
    pub maximum_budget: f64,
}

/// Project owner record; `country` comes from the profile location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerRecord {
    pub id: u64,
    #[serde(default)]
    pub country: Option<String>,
}

/// A project that survived the eligibility screen, upgraded with the
/// enrichment lookup. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedProject {
    pub id: u64,
    pub owner_id: u64,
    pub title: String,
    pub description: String,
    pub minimum_budget: f64,
    pub maximum_budget: f64,
    pub currency_code: String,
    pub exchange_rate: f64,
    pub project_type: ProjectType,
    pub submit_date: Option<i64>,
    pub seo_url: Option<String>,
}

impl EnrichedProject {
    pub fn project_link(&self) -> String {
        match &self.seo_url {
            Some(seo) => format!("https://www.freelancer.com/projects/{}/details", seo),
            None => format!("https://www.freelancer.com/projects/{}", self.id),
        }
    }
}

/// Tag for an enriched project that passed the service-match qualifier.
#[derive(Debug, Clone)]
pub struct QualifiedProject(pub EnrichedProject);

/// Derived bid amount (source currency) and period for one project.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingResult {
    pub project_id: u64,
    pub amount: f64,
    pub period_days: u32,
}

/// A fully composed, priced proposal ready for submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidDraft {
    pub project_id: u64,
    pub title: String,
    pub content: String,
    pub amount: f64,
    pub period_days: u32,
    pub currency_code: String,
    pub project_link: String,
    pub submit_date: Option<i64>,
}

impl BidDraft {
    pub fn assemble(project: &QualifiedProject, pricing: &PricingResult, content: String) -> Self {
        let p = &project.0;
        Self {
            project_id: p.id,
            title: p.title.clone(),
            content,
            amount: pricing.amount,
            period_days: pricing.period_days,
            currency_code: p.currency_code.clone(),
            project_link: p.project_link(),
            submit_date: p.submit_date,
        }
    }
}
