//! Prompt assembly for the narration collaborator.

use crate::config::SimulationConfig;
use crate::observation::Observation;

/// Builds the prompt text handed over with each narration request.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    include_metadata: bool,
}

impl PromptBuilder {
    /// Create a new prompt builder from the simulation settings.
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            include_metadata: config.include_metadata_in_prompt,
        }
    }

    /// Format the observation as a prompt string.
    pub fn build(&self, observation: &Observation) -> String {
        let mut prompt = String::new();

        prompt.push_str("## Situation\n");
        prompt.push_str(&observation.message());
        prompt.push_str("\n\n");

        if !self.include_metadata {
            return prompt;
        }

        let keyword = observation.keyword.trim();
        let details = observation.details.trim();
        if !keyword.is_empty() || !details.is_empty() {
            prompt.push_str("## About This Place\n");
            if !keyword.is_empty() {
                prompt.push_str(&format!("Keyword: {}\n", keyword));
            }
            if !details.is_empty() {
                prompt.push_str(&format!("Details: {}\n", details));
            }
            prompt.push('\n');
        }

        prompt
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(&SimulationConfig::default())
    }
}
