use anyhow::Result;
use tracing::{debug, warn};

use crate::config::PricingConfig;
use crate::freelancer::{EnrichedProject, PricingResult, QualifiedProject};
use crate::llm::{clean_response, CompletionInterface};

use super::parser::{parse_quote, Quote};

/// Derives a bid amount and period per project, blending the model's
/// quote with deterministic floors. Infallible by design: every failure
/// path resolves to fallback pricing.
pub struct PricingEstimator {
    config: PricingConfig,
}

impl PricingEstimator {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub async fn price(
        &self,
        llm: &dyn CompletionInterface,
        project: &QualifiedProject,
    ) -> PricingResult {
        let p = &project.0;

        // Non-fixed engagements never use the model's price opinion.
        if !p.project_type.is_fixed() {
            let midpoint = (p.minimum_budget + p.maximum_budget) / 2.0;
            return PricingResult {
                project_id: p.id,
                amount: round2(midpoint.max(self.config.hourly_floor)),
                period_days: self.config.hourly_period_days,
            };
        }

        let quote = match self.request_quote(llm, p).await {
            Ok(text) => parse_quote(&clean_response(&text)),
            Err(e) => {
                warn!(
                    "💰 Pricing call failed for project {}: {} (using fallback)",
                    p.id, e
                );
                None
            }
        };

        match quote {
            Some(Quote {
                budget_usd,
                deadline_days,
            }) => {
                let budget = (budget_usd as f64).max(self.config.min_fixed_bid_usd);
                // The model quotes in USD; the bid goes out in the
                // listing currency.
                let amount = if p.exchange_rate > 0.0 {
                    budget / p.exchange_rate
                } else {
                    self.config.degenerate_rate_bid
                };
                PricingResult {
                    project_id: p.id,
                    amount: round2(amount),
                    period_days: deadline_days,
                }
            }
            None => {
                debug!("Unparsed quote for project {}, falling back", p.id);
                let amount = (p.minimum_budget + p.maximum_budget / 1.5)
                    .max(self.config.min_fixed_bid_usd);
                PricingResult {
                    project_id: p.id,
                    amount: round2(amount),
                    period_days: self.config.fixed_fallback_period_days,
                }
            }
        }
    }

    async fn request_quote(
        &self,
        llm: &dyn CompletionInterface,
        project: &EnrichedProject,
    ) -> Result<String> {
        let rate_card = self
            .config
            .rate_card
            .iter()
            .map(|e| format!("- {}: ${}, {} days", e.service, e.budget_usd, e.timeline_days))
            .collect::<Vec<_>>()
            .join("\n");

        let system_prompt = format!(
            "You are an expert project analyst. Below are the base project components with \
             their associated budget and timeline:\n{}\nUsing these as your baseline, analyze \
             the client's budget range and adjust the recommended budget and deadline. The \
             recommended budget must be greater than or equal to the client's minimum budget, \
             stay close to the base budget, and stay realistic for very low budget ranges. \
             Keep the deadline close to the base timeline. Provide your final output in the \
             exact format:\n\"Budget: <budget> USD, Deadline: <days> days\"\nNo additional \
             text should be included in the output.",
            rate_card
        );

        let user_prompt = format!(
            "Project Title: {}\nProject Description: {}\nMinimum Budget: {}\nMaximum Budget: {}\n\
             OUTPUT SHOULD ONLY BE IN THE FORMAT 'Budget: <budget> USD, Deadline: <days> days'.",
            project.title,
            project.description,
            project.minimum_budget * project.exchange_rate,
            project.maximum_budget * project.exchange_rate,
        );

        llm.complete(&system_prompt, &user_prompt).await
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
