use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentCategory {
    CodeCompletion,
    AsyncSwe,
    Cli,
    Devops,
}

impl AgentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CodeCompletion => "code-completion",
            Self::AsyncSwe => "async-swe",
            Self::Cli => "cli",
            Self::Devops => "devops",
        }
    }
}

impl std::str::FromStr for AgentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "code-completion" => Ok(Self::CodeCompletion),
            "async-swe" => Ok(Self::AsyncSwe),
            "cli" => Ok(Self::Cli),
            "devops" => Ok(Self::Devops),
            other => Err(format!(
                "unknown category '{}' (expected code-completion, async-swe, cli or devops)",
                other
            )),
        }
    }
}

impl std::fmt::Display for AgentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize)]
pub struct AgentInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub provider: &'static str,
    pub category: AgentCategory,
    pub url: &'static str,
}

pub static AGENTS: &[AgentInfo] = &[
    AgentInfo {
        id: "github-copilot-completions",
        name: "GitHub Copilot (Code Completions)",
        provider: "GitHub (Microsoft)",
        category: AgentCategory::CodeCompletion,
        url: "https://github.com/features/copilot",
    },
    AgentInfo {
        id: "github-copilot-agent",
        name: "GitHub Copilot Coding Agent",
        provider: "GitHub (Microsoft)",
        category: AgentCategory::AsyncSwe,
        url: "https://github.blog/news-insights/product-news/github-copilot-meet-the-new-coding-agent/",
    },
    AgentInfo {
        id: "devin",
        name: "Cognition Devin",
        provider: "Microsoft",
        category: AgentCategory::AsyncSwe,
        url: "https://aka.ms/devin",
    },
    AgentInfo {
        id: "codex-cli",
        name: "Codex CLI",
        provider: "OpenAI",
        category: AgentCategory::Cli,
        url: "https://github.com/openai/codex",
    },
    AgentInfo {
        id: "sreagent",
        name: "SREAgent",
        provider: "Microsoft",
        category: AgentCategory::Devops,
        url: "https://learn.microsoft.com/en-us/azure/app-service/sre-agent-overview",
    },
];

/// Ids accepted for backwards compatibility, mapped to their current id.
static LEGACY_IDS: &[(&str, &str)] = &[("github-copilot", "github-copilot-completions")];

pub fn all() -> &'static [AgentInfo] {
    AGENTS
}

pub fn get(id: &str) -> Option<&'static AgentInfo> {
    let id = resolve_id(id)?;
    AGENTS.iter().find(|a| a.id == id)
}

/// Map an id (current or legacy) to its canonical catalog id.
pub fn resolve_id(id: &str) -> Option<&'static str> {
    if let Some(agent) = AGENTS.iter().find(|a| a.id == id) {
        return Some(agent.id);
    }
    LEGACY_IDS.iter().find(|(old, _)| *old == id).map(|(_, new)| *new)
}

pub fn by_category(category: AgentCategory) -> impl Iterator<Item = &'static AgentInfo> {
    AGENTS.iter().filter(move |a| a.category == category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_unique() {
        let mut ids: Vec<_> = AGENTS.iter().map(|a| a.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), AGENTS.len());
    }

    #[test]
    fn test_get_known_agent() {
        let devin = get("devin").unwrap();
        assert_eq!(devin.name, "Cognition Devin");
        assert_eq!(devin.category, AgentCategory::AsyncSwe);
        assert!(get("nonexistent").is_none());
    }

    #[test]
    fn test_legacy_id_resolves() {
        assert_eq!(resolve_id("github-copilot"), Some("github-copilot-completions"));
        assert_eq!(get("github-copilot").unwrap().id, "github-copilot-completions");
    }

    #[test]
    fn test_by_category() {
        let async_swe: Vec<_> = by_category(AgentCategory::AsyncSwe).map(|a| a.id).collect();
        assert_eq!(async_swe, vec!["github-copilot-agent", "devin"]);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("devops".parse::<AgentCategory>(), Ok(AgentCategory::Devops));
        assert!("robots".parse::<AgentCategory>().is_err());
    }
}
