use clap::{Args, Parser, Subcommand};
use crate::agents::AgentCategory;

#[derive(Parser)]
#[command(name = "agunblock", version, about = "Analyze GitHub repositories for AI coding agents")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Backend base URL (overrides config and environment)
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a repository for an agent, streaming progress
    Analyze(AnalyzeArgs),
    /// Show repository information from the backend
    Info(InfoArgs),
    /// Show the GitHub stargazer count of a repository
    Stars(StarsArgs),
    /// List the supported agents
    Agents(AgentsArgs),
    /// Render markdown to HTML
    Render(RenderArgs),
    /// Show version and build information
    Version,
}

#[derive(Args, Clone)]
pub struct AnalyzeArgs {
    /// Repository as owner/repo or a GitHub URL
    pub repository: String,

    /// Agent to generate setup instructions for
    #[arg(short, long, default_value = "github-copilot-agent")]
    pub agent: String,

    /// Use the single-request endpoint instead of the progress stream
    #[arg(long)]
    pub no_stream: bool,

    /// Print the final session as JSON
    #[arg(long)]
    pub json: bool,

    /// Also write the analysis as a standalone HTML document
    #[arg(long)]
    pub html: Option<String>,

    /// Fail when the stream is silent for this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[derive(Args, Clone)]
pub struct InfoArgs {
    /// Repository as owner/repo or a GitHub URL
    pub repository: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct StarsArgs {
    /// Repository as owner/repo or a GitHub URL
    #[arg(default_value = "microsoft/gitagu")]
    pub repository: String,
}

#[derive(Args, Clone)]
pub struct AgentsArgs {
    /// Only list agents of this category
    #[arg(long)]
    pub category: Option<AgentCategory>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct RenderArgs {
    /// Markdown file, or `-` for stdin
    #[arg(default_value = "-")]
    pub input: String,

    /// Wrap the output in a complete HTML document
    #[arg(long)]
    pub document: bool,
}

/// Options shared by every command after parsing.
#[derive(Clone, Default)]
pub struct GlobalOpts {
    pub quiet: bool,
    pub config: Option<String>,
    pub api_url: Option<String>,
}

impl Cli {
    pub fn global_opts(&self) -> GlobalOpts {
        GlobalOpts {
            quiet: self.quiet,
            config: self.config.clone(),
            api_url: self.api_url.clone(),
        }
    }
}
