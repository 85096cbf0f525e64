use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub freelancer: FreelancerConfig,
    pub llm: LlmConfig,
    pub agent: AgentConfig,
    pub filters: FilterConfig,
    pub pricing: PricingConfig,
    pub profile: ServiceProfile,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FreelancerConfig {
    pub oauth_token: String,
    pub host: String,
    pub skill_ids: Vec<u32>,
    pub language_codes: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgentConfig {
    pub bid_limit: u32,
    pub project_search_limit: u32,
    pub poll_interval_secs: u64,
    pub source_backoff_secs: u64,
    pub min_bid_age_secs: u64,
    pub submission_pace_secs: u64,
    pub simulation_mode: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FilterConfig {
    pub unwanted_countries: Vec<String>,
    pub unwanted_currencies: Vec<String>,
    pub min_fixed_budget: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PricingConfig {
    pub min_fixed_bid_usd: f64,
    pub degenerate_rate_bid: f64,
    pub hourly_floor: f64,
    pub fixed_fallback_period_days: u32,
    pub hourly_period_days: u32,
    pub rate_card: Vec<RateCardEntry>,
}

/// One anchor of the rate card fed to the pricing model: a service
/// category with its base price and base duration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateCardEntry {
    pub service: String,
    pub budget_usd: u32,
    pub timeline_days: u32,
}

/// Operator-facing texts: what we sell, how bids read, where the
/// portfolio lives.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceProfile {
    pub service_offerings: String,
    pub bid_style: String,
    pub portfolio_links: String,
    pub signature: String,
}

const DEFAULT_SERVICE_OFFERINGS: &str = "\
1. Website Development:
   - CMS-based website builds only (WordPress, Shopify, Wix, GoDaddy and similar); for custom work we take ReactJS projects exclusively.
   - No custom framework development (Laravel etc.) and no fix-or-maintain-only jobs; those are NO MATCH.

2. Graphic Design:
   - All graphic design work: vector illustration, logo design, branding, brochures, flyers, banners, packaging, PPT decks.";

const DEFAULT_BID_STYLE: &str = "\
Write a professional freelance proposal for the given project.
Open with a sentence that speaks directly to the client's main goal; no greetings.
Reference similar past work with outcome-based results, show you understand the deliverables without listing them, and close with a confident promise plus a light risk reversal (revisions, collaboration, satisfaction focus).
Ask the two most relevant questions about the project.
Then write: Here's my previous related work according to your needs:
and insert one or two portfolio links that fit the project, as plain text.
Finish with:
Regards,
{signature}
Keep it within 80 words, conversational tone, short paragraphs, no markdown, no boldface, and never start with Hi or Dear.";

const DEFAULT_PORTFOLIO_LINKS: &str = "\
1. premium sticker designs : https://www.pinterest.com/studio/premium-stickers/
2. premium UI/UX : https://www.pinterest.com/studio/premium-ui-ux-design/
3. premium packaging design : https://www.pinterest.com/studio/premium-packaging-branding/
4. premium menu design : https://www.pinterest.com/studio/premium-menu-designs/
5. premium logo design : https://www.pinterest.com/studio/premium-logo/
6. premium illustration designs : https://www.pinterest.com/studio/premium-illustrations/";

const DEFAULT_SKILL_IDS: &str = "3,9,13,17,20,26,32,57,69,77,106,107,115,127,168,196,229,232,247,264,278,284,305,323,335,359,368,408,444,482,502,564,624,662,710,759,878,950,953,959,1063,1185,1314,1623,2071,2128,2245,2338,2507,2586,2589,2605,2645,2673,2698,2717,2745";

const DEFAULT_UNWANTED_COUNTRIES: &str = "india,bangladesh,pakistan,jamaica,srilanka,sri lanka,nepal,south africa,kenya,uganda,egypt,indonesia,philippines,afganistan";

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let freelancer = FreelancerConfig {
            oauth_token: env::var("FREELANCER_OAUTH_TOKEN").unwrap_or_default(),
            host: env::var("FREELANCER_API_HOST")
                .unwrap_or_else(|_| "https://www.freelancer.com".to_string()),
            skill_ids: csv_u32("SKILL_IDS", DEFAULT_SKILL_IDS),
            language_codes: csv("LANGUAGE_CODES", "en"),
        };

        let llm = LlmConfig {
            api_key: env::var("GROQ_API_KEY").unwrap_or_default(),
            base_url: env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| "https://api.groq.com/openai/v1".to_string()),
            model: env::var("LLM_MODEL").unwrap_or_else(|_| "qwen/qwen3-32b".to_string()),
        };

        let agent = AgentConfig {
            bid_limit: env::var("BID_LIMIT")
                .unwrap_or_else(|_| "75".to_string())
                .parse()
                .unwrap_or(75),
            project_search_limit: env::var("PROJECT_SEARCH_LIMIT")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            poll_interval_secs: env::var("POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),
            source_backoff_secs: env::var("SOURCE_BACKOFF_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),
            min_bid_age_secs: env::var("MIN_BID_AGE_SECS")
                .unwrap_or_else(|_| "32".to_string())
                .parse()
                .unwrap_or(32),
            submission_pace_secs: env::var("SUBMISSION_PACE_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            simulation_mode: env::var("SIMULATION_MODE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        };

        let filters = FilterConfig {
            unwanted_countries: csv("UNWANTED_COUNTRIES", DEFAULT_UNWANTED_COUNTRIES),
            unwanted_currencies: csv("UNWANTED_CURRENCIES", "INR,PKR,BDT"),
            min_fixed_budget: env::var("MIN_FIXED_BUDGET")
                .unwrap_or_else(|_| "30.0".to_string())
                .parse()
                .unwrap_or(30.0),
        };

        let pricing = PricingConfig {
            min_fixed_bid_usd: env::var("MIN_FIXED_BID_USD")
                .unwrap_or_else(|_| "70.0".to_string())
                .parse()
                .unwrap_or(70.0),
            degenerate_rate_bid: env::var("DEGENERATE_RATE_BID")
                .unwrap_or_else(|_| "1000.0".to_string())
                .parse()
                .unwrap_or(1000.0),
            hourly_floor: env::var("HOURLY_FLOOR")
                .unwrap_or_else(|_| "25.0".to_string())
                .parse()
                .unwrap_or(25.0),
            fixed_fallback_period_days: env::var("FIXED_FALLBACK_PERIOD_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .unwrap_or(7),
            hourly_period_days: env::var("HOURLY_PERIOD_DAYS")
                .unwrap_or_else(|_| "40".to_string())
                .parse()
                .unwrap_or(40),
            rate_card: default_rate_card(),
        };

        let profile = ServiceProfile {
            service_offerings: env::var("SERVICE_OFFERINGS")
                .unwrap_or_else(|_| DEFAULT_SERVICE_OFFERINGS.to_string()),
            bid_style: env::var("BID_WRITING_STYLE")
                .unwrap_or_else(|_| DEFAULT_BID_STYLE.to_string()),
            portfolio_links: env::var("PORTFOLIO_LINKS")
                .unwrap_or_else(|_| DEFAULT_PORTFOLIO_LINKS.to_string()),
            signature: env::var("SIGNATURE").unwrap_or_else(|_| "The Studio".to_string()),
        };

        Ok(Config {
            freelancer,
            llm,
            agent,
            filters,
            pricing,
            profile,
        })
    }
}

fn default_rate_card() -> Vec<RateCardEntry> {
    [
        ("Website design and development", 1500, 14),
        ("Website development only", 850, 12),
        ("Logo design", 50, 2),
        ("Custom artwork", 120, 2),
        ("E-commerce development", 1750, 20),
        ("UI/UX design", 350, 7),
        ("Vector illustration", 150, 5),
    ]
    .into_iter()
    .map(|(service, budget_usd, timeline_days)| RateCardEntry {
        service: service.to_string(),
        budget_usd,
        timeline_days,
    })
    .collect()
}

fn csv(var: &str, default: &str) -> Vec<String> {
    env::var(var)
        .unwrap_or_else(|_| default.to_string())
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn csv_u32(var: &str, default: &str) -> Vec<u32> {
    env::var(var)
        .unwrap_or_else(|_| default.to_string())
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect()
}
