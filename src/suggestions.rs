//! Prompt for "things to do this weekend" suggestions
//!
//! Only the prompt is produced; sending it to a text-generation service is
//! left to the caller.

use serde::Serialize;

use crate::weekend::AggregateSummary;

/// Prompt plus the forecast prose it was built from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPrompt {
    pub location: String,
    /// Condition groups joined with ", "
    pub forecast_main: String,
    /// Condition descriptions joined with ", "
    pub forecast_description: String,
    pub prompt: String,
}

/// Build the suggestion prompt for `location` from the weekend's unique
/// condition descriptions, joined with " and ".
#[must_use]
pub fn build_prompt(location: &str, descriptions: &[String]) -> String {
    let forecast = descriptions.join(" and ");
    format!(
        "Given the weather forecast for {location}, this weekend is forecasted {forecast}, \
         I'm looking for suggestions on what to do as a local, given the current weather conditions. \
         list 3 locations to visit tailored for a local resident. \
         Return a comma-separated list consisting of the location names only and nothing else. \
         do not paraphrase the request"
    )
}

impl ActivityPrompt {
    #[must_use]
    pub fn new(location: &str, summary: &AggregateSummary) -> Self {
        Self {
            location: location.to_string(),
            forecast_main: summary.overall_main(),
            forecast_description: summary.overall_description(),
            prompt: build_prompt(location, &summary.unique_condition_descriptions),
        }
    }
}
