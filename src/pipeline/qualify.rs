use anyhow::Result;
use tracing::warn;

use crate::config::ServiceProfile;
use crate::freelancer::EnrichedProject;
use crate::llm::{clean_response, CompletionInterface};

/// Asks the completion model whether a project fits the service catalog.
/// Fail-closed: any call failure is a NO MATCH.
pub struct ServiceMatchQualifier {
    system_prompt: String,
}

impl ServiceMatchQualifier {
    pub fn new(profile: &ServiceProfile) -> Self {
        let system_prompt = format!(
            "You are a professional project analyst. Evaluate the following project details \
             and decide whether the project matches our service offerings. Respond with only \
             'MATCH' or 'NO MATCH'. If you are not completely sure about the project details, \
             respond with 'NO MATCH'.\n\nOur Service Offerings:\n{}\n\nOnly return 'MATCH' if \
             the project description clearly fits these criteria. Otherwise, return 'NO MATCH'.",
            profile.service_offerings
        );
        Self { system_prompt }
    }

    pub async fn qualify(&self, llm: &dyn CompletionInterface, project: &EnrichedProject) -> bool {
        match self.ask(llm, project).await {
            Ok(is_match) => is_match,
            Err(e) => {
                warn!(
                    "🤖 Qualifier call failed for project {}: {} (treating as NO MATCH)",
                    project.id, e
                );
                false
            }
        }
    }

    async fn ask(&self, llm: &dyn CompletionInterface, project: &EnrichedProject) -> Result<bool> {
        let user_prompt = format!(
            "Project Title: {}\nProject Description: {}\nMinimum Budget: {}\nMaximum Budget: {}\n",
            project.title, project.description, project.minimum_budget, project.maximum_budget
        );

        let response = llm.complete(&self.system_prompt, &user_prompt).await?;
        Ok(clean_response(&response).eq_ignore_ascii_case("match"))
    }
}
