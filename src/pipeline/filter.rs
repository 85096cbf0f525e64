use tracing::{debug, info, warn};

use crate::config::FilterConfig;
use crate::freelancer::{EnrichedProject, MarketplaceInterface, RawProject};

use super::types::{RejectReason, Screening};

/// Screens raw feed projects against the operator's eligibility policy
/// and upgrades survivors with the enrichment lookup.
pub struct EligibilityFilter {
    config: FilterConfig,
}

impl EligibilityFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    /// Screen a whole batch; rejections and lookup failures never abort
    /// the batch.
    pub async fn run(
        &self,
        marketplace: &dyn MarketplaceInterface,
        my_user_id: Option<u64>,
        batch: &[RawProject],
    ) -> Vec<EnrichedProject> {
        let mut eligible = Vec::new();

        for project in batch {
            match self.screen(marketplace, my_user_id, project).await {
                Screening::Eligible(enriched) => {
                    debug!("Project {} passed eligibility", project.id);
                    eligible.push(*enriched);
                }
                Screening::Rejected(reason) => {
                    info!("⏭️  Project {} rejected: {}", project.id, reason);
                }
                Screening::Failed(e) => {
                    warn!("⚠️ Lookup failed for project {}: {} (skipping)", project.id, e);
                }
            }
        }

        eligible
    }

    /// Evaluate one project. Predicates short-circuit: the first failing
    /// one excludes the project and no further lookups run for it.
    pub async fn screen(
        &self,
        marketplace: &dyn MarketplaceInterface,
        my_user_id: Option<u64>,
        project: &RawProject,
    ) -> Screening {
        // Already-bid screen fails open: a bid lookup error must not
        // cost us a fresh project.
        if let Some(my_id) = my_user_id {
            match marketplace.get_bids(project.id).await {
                Ok(bidders) if bidders.contains(&my_id) => {
                    return Screening::Rejected(RejectReason::AlreadyBid);
                }
                Ok(_) => {}
                Err(e) => {
                    debug!("Bid lookup failed for project {}: {}", project.id, e);
                }
            }
        }

        let owner = match marketplace.get_user_by_id(project.owner_id).await {
            Ok(owner) => owner,
            Err(e) => return Screening::Failed(e),
        };
        if let Some(country) = owner.country.as_deref() {
            if self
                .config
                .unwanted_countries
                .iter()
                .any(|c| c.eq_ignore_ascii_case(country))
            {
                return Screening::Rejected(RejectReason::ExcludedCountry(country.to_string()));
            }
        }

        if self
            .config
            .unwanted_currencies
            .iter()
            .any(|c| c.eq_ignore_ascii_case(&project.currency.code))
        {
            return Screening::Rejected(RejectReason::ExcludedCurrency(
                project.currency.code.clone(),
            ));
        }

        if project.nda {
            return Screening::Rejected(RejectReason::NdaRequired);
        }

        if !project.status.eq_ignore_ascii_case("active") {
            return Screening::Rejected(RejectReason::Inactive(project.status.clone()));
        }

        let details = match marketplace.get_project_details(project.id).await {
            Ok(details) => details,
            Err(e) => return Screening::Failed(e),
        };

        if project.project_type.is_fixed() && details.maximum_budget <= self.config.min_fixed_budget
        {
            return Screening::Rejected(RejectReason::BudgetTooLow);
        }

        Screening::Eligible(Box::new(EnrichedProject {
            id: project.id,
            owner_id: project.owner_id,
            title: details.title,
            description: details.description,
            minimum_budget: details.minimum_budget,
            maximum_budget: details.maximum_budget,
            currency_code: project.currency.code.clone(),
            exchange_rate: project.currency.exchange_rate,
            project_type: project.project_type,
            submit_date: project.submit_date,
            seo_url: project.seo_url.clone(),
        }))
    }
}
