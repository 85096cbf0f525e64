use tracing::warn;

use crate::config::ServiceProfile;
use crate::freelancer::QualifiedProject;
use crate::llm::{clean_response, CompletionInterface};

/// Generates the human-readable bid text. Pricing is independent of
/// this stage; an empty string is a valid (if low-quality) draft.
pub struct BidComposer {
    system_prompt: String,
}

impl BidComposer {
    pub fn new(profile: &ServiceProfile) -> Self {
        let persona = profile.bid_style.replace("{signature}", &profile.signature);
        let system_prompt = format!(
            "{}\n\nPortfolio LINKS:\n{}",
            persona, profile.portfolio_links
        );
        Self { system_prompt }
    }

    /// No retries; a failed call yields an empty draft and the
    /// submission still proceeds.
    pub async fn compose(&self, llm: &dyn CompletionInterface, project: &QualifiedProject) -> String {
        let p = &project.0;
        let user_prompt = format!(
            "Project Title: {}\nProject Description: {}\n",
            p.title, p.description
        );

        match llm.complete(&self.system_prompt, &user_prompt).await {
            Ok(text) => clean_response(&text),
            Err(e) => {
                warn!(
                    "✍️  Composer failed for project {}: {} (submitting empty bid)",
                    p.id, e
                );
                String::new()
            }
        }
    }
}
