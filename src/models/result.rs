use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

/// The outcome of a completed analysis, delivered once by the `final_result`
/// envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub agent_id: String,
    pub repo_name: String,
    /// Markdown produced by the backend.
    pub analysis: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup_commands: Option<BTreeMap<String, String>>,
}

/// Setup command sections in reading order: what to install first, then how
/// to build, run and check the project.
pub const SETUP_COMMAND_ORDER: &[&str] =
    &["prerequisites", "dependencies", "run_app", "linting", "testing"];

impl AnalysisResult {
    /// Setup commands with the known sections first, in
    /// [`SETUP_COMMAND_ORDER`], followed by any others alphabetically.
    pub fn ordered_setup_commands(&self) -> Vec<(&str, &str)> {
        let Some(commands) = &self.setup_commands else {
            return Vec::new();
        };
        let known = SETUP_COMMAND_ORDER
            .iter()
            .filter_map(|key| commands.get_key_value(*key));
        let extra = commands
            .iter()
            .filter(|(key, _)| !SETUP_COMMAND_ORDER.contains(&key.as_str()));
        known
            .chain(extra)
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect()
    }
}

/// Body of both `/api/analyze` and `/api/analyze-stream`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub owner: String,
    pub repo: String,
    pub agent_id: String,
}

impl AnalyzeRequest {
    pub fn new(agent_id: &str, owner: &str, repo: &str) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            agent_id: agent_id.to_string(),
        }
    }

    pub fn repo_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// Response of the non-streaming `/api/analyze` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub repo_name: Option<String>,
    #[serde(default)]
    pub analysis: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub setup_commands: Option<BTreeMap<String, String>>,
}

impl AnalyzeResponse {
    /// Fold the response into an [`AnalysisResult`]. A backend-reported
    /// error becomes the analysis text, prefixed with `Error: `.
    pub fn into_result(self, request: &AnalyzeRequest) -> AnalysisResult {
        let analysis = match self.error {
            Some(err) => format!("Error: {}", err),
            None => self.analysis,
        };
        AnalysisResult {
            agent_id: self.agent_id.unwrap_or_else(|| request.agent_id.clone()),
            repo_name: self.repo_name.unwrap_or_else(|| request.repo_name()),
            analysis,
            setup_commands: self.setup_commands,
        }
    }
}
