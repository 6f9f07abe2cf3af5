use console::style;
use serde_json::Value;

use crate::agents::{catalog, AgentInfo};
use crate::models::{AnalysisResult, GitHubRepo, ProgressEvent, ProgressStatus, RepoInfo};
use crate::utils::formatting::format_step_duration;
use super::steps::{StepStatus, StepView};

/// Render one progress event as a styled log line.
pub fn render_update(event: &ProgressEvent) -> String {
    let marker = match event.status {
        ProgressStatus::Starting => style("▶").cyan(),
        ProgressStatus::InProgress => style("⏳").yellow(),
        ProgressStatus::Completed => style("✓").green(),
        ProgressStatus::Failed => style("✗").red(),
    };
    let elapsed = event
        .elapsed_time
        .map(|s| format!(" ({})", format_step_duration(s)))
        .unwrap_or_default();

    let mut line = format!(
        "  {} {} {}{}",
        marker,
        style(format!("[{}]", event.step)).dim(),
        event.message,
        style(elapsed).dim(),
    );
    if let Some(details) = &event.details {
        // Only the first two details, to keep the log readable.
        for (key, value) in details.iter().take(2) {
            line.push_str(&format!(
                "\n      {} {}",
                style(format!("{}:", key)).dim(),
                render_detail_value(value),
            ));
        }
    }
    line
}

fn render_detail_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_detail_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

pub fn render_step(view: &StepView) -> String {
    let (icon, name) = match view.status {
        StepStatus::Completed => (style("✓").green(), style(&view.name).green()),
        StepStatus::InProgress => (style("⏳").yellow(), style(&view.name).yellow().bold()),
        StepStatus::Failed => (style("✗").red(), style(&view.name).red()),
        StepStatus::Pending => (style("·").dim(), style(&view.name).dim()),
    };
    let elapsed = view
        .elapsed
        .as_ref()
        .map(|e| format!(" {}", style(e).dim()))
        .unwrap_or_default();
    format!("{} {}. {}{}", icon, view.id, name, elapsed)
}

/// Final analysis for the terminal: markdown with headings and fences
/// highlighted, followed by the setup commands.
pub fn render_results(result: &AnalysisResult) -> String {
    let mut out = format!(
        "\n{} {} for {}\n\n",
        style("✓ Setup instructions:").green().bold(),
        style(&result.repo_name).white().bold(),
        style(agent_name(&result.agent_id)).cyan(),
    );
    out.push_str(&render_markdown_terminal(&result.analysis));

    let commands = result.ordered_setup_commands();
    if !commands.is_empty() {
        out.push_str(&format!("\n\n{}\n", style("Setup commands:").white().bold()));
        for (key, value) in commands {
            out.push_str(&format!(
                "\n  {}\n",
                style(key.replace('_', " ")).cyan().bold(),
            ));
            for line in value.lines() {
                out.push_str(&format!("    {}\n", style(line).green()));
            }
        }
    }
    out
}

/// Display name from the catalog, falling back to the raw id.
fn agent_name(agent_id: &str) -> &str {
    catalog::get(agent_id).map_or(agent_id, |agent| agent.name)
}

/// The error panel. Error text is shown verbatim, never rendered as markdown.
pub fn render_error(message: &str) -> String {
    format!(
        "\n{} {}\n  {}\n",
        style("✗ Analysis failed:").red().bold(),
        style(message).red(),
        style("Run the command again to retry.").dim(),
    )
}

fn render_markdown_terminal(markdown: &str) -> String {
    let mut out = String::new();
    let mut in_fence = false;
    for line in markdown.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            out.push_str(&format!("{}\n", style(line).dim()));
        } else if in_fence {
            out.push_str(&format!("{}\n", style(line).green()));
        } else if line.starts_with('#') {
            out.push_str(&format!("{}\n", style(line.trim_start_matches('#').trim()).cyan().bold()));
        } else {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

pub fn render_repo_info(info: &RepoInfo) -> String {
    let mut out = format!("\n  {}\n", style(&info.full_name).white().bold());
    if let Some(desc) = info.description.as_deref().filter(|d| !d.is_empty()) {
        out.push_str(&format!("  {}\n", style(desc).dim()));
    }
    out.push_str(&format!(
        "\n  {} {}\n  {} {}\n",
        style("Language:").dim(),
        style(info.language.as_deref().unwrap_or("unknown")).white(),
        style("Stars:").dim(),
        style(info.stars.to_string()).yellow().bold(),
    ));
    if let Some(branch) = &info.default_branch {
        out.push_str(&format!("  {} {}\n", style("Branch:").dim(), style(branch).white()));
    }
    if let Some(updated) = info.updated_at {
        out.push_str(&format!(
            "  {} {}\n",
            style("Updated:").dim(),
            style(updated.format("%Y-%m-%d").to_string()).white(),
        ));
    }
    out
}

pub fn render_stars(repo: &GitHubRepo) -> String {
    let mut out = format!(
        "  {} {}",
        style(format!("★ {}", repo.stargazers_count)).yellow().bold(),
        style(&repo.full_name).white(),
    );
    if let Some(url) = &repo.html_url {
        out.push_str(&format!("\n    {}", style(url).dim().underlined()));
    }
    out
}

pub fn render_agents(agents: &[&AgentInfo]) -> String {
    let mut out = format!("\n{}\n\n", style("Agents:").white().bold());
    for agent in agents {
        out.push_str(&format!(
            "  {:<28} {:<36} {}\n",
            style(agent.id).cyan().bold(),
            agent.name,
            style(format!("{} · {}", agent.provider, agent.category)).dim(),
        ));
    }
    out
}

/// Render the version info.
pub fn render_version() -> String {
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = option_env!("GIT_HASH").unwrap_or("dev");
    let build_ts = option_env!("BUILD_TIMESTAMP").unwrap_or("unknown");

    format!(
        "\n  {} {}\n  {} {}\n  {} {}\n",
        style("Version:").dim(),
        style(version).white().bold(),
        style("Commit:").dim(),
        style(git_hash).white(),
        style("Built:").dim(),
        style(build_ts).white(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn plain(s: &str) -> String {
        console::strip_ansi_codes(s).to_string()
    }

    #[test]
    fn test_render_update_with_details() {
        let mut details = serde_json::Map::new();
        details.insert("files".into(), serde_json::json!(["package.json", "Dockerfile"]));
        details.insert("language".into(), serde_json::json!("TypeScript"));
        details.insert("extra".into(), serde_json::json!(1));
        let ev = ProgressEvent {
            step: 2,
            step_name: String::new(),
            status: ProgressStatus::Completed,
            message: "Found config files".into(),
            progress_percentage: Some(66.0),
            elapsed_time: Some(4.04),
            details: Some(details),
        };
        let out = plain(&render_update(&ev));
        assert!(out.contains("[2] Found config files (4.0s)"));
        assert!(out.contains("package.json, Dockerfile"));
        assert_eq!(out.lines().count(), 3);
    }

    #[test]
    fn test_render_results_lists_setup_commands() {
        let mut cmds = BTreeMap::new();
        cmds.insert("run_app".to_string(), "npm start".to_string());
        cmds.insert("prerequisites".to_string(), "Node.js 20".to_string());
        let result = AnalysisResult {
            agent_id: "devin".into(),
            repo_name: "o/r".into(),
            analysis: "# Setup\n```\nnpm ci\n```".into(),
            setup_commands: Some(cmds),
        };
        let out = plain(&render_results(&result));
        assert!(out.contains("Setup instructions: o/r for Cognition Devin"));
        assert!(out.contains("\nSetup\n"));
        assert!(out.contains("run app"));
        assert!(out.contains("    npm start"));
        assert!(out.find("prerequisites").unwrap() < out.find("run app").unwrap());
    }

    #[test]
    fn test_render_stars_with_link() {
        let repo = GitHubRepo {
            full_name: "microsoft/gitagu".into(),
            stargazers_count: 1234,
            html_url: Some("https://github.com/microsoft/gitagu".into()),
        };
        let out = plain(&render_stars(&repo));
        assert_eq!(out, "  ★ 1234 microsoft/gitagu\n    https://github.com/microsoft/gitagu");
    }

    #[test]
    fn test_render_error_is_verbatim() {
        let out = plain(&render_error("**not bold** <b>"));
        assert!(out.contains("**not bold** <b>"));
        assert!(!out.contains("<strong>"));
    }

    #[test]
    fn test_render_step_pending() {
        let view = StepView {
            id: 3,
            name: "Extracting Setup Instructions".into(),
            status: StepStatus::Pending,
            elapsed: None,
            message: None,
        };
        assert_eq!(plain(&render_step(&view)), "· 3. Extracting Setup Instructions");
    }
}
