use crate::agents::{catalog, AgentInfo};
use crate::cli::commands::AgentsArgs;
use crate::errors::AgunblockError;
use crate::view::renderer::render_agents;

pub fn handle_agents(args: AgentsArgs) -> Result<(), AgunblockError> {
    let agents: Vec<&AgentInfo> = match args.category {
        Some(category) => catalog::by_category(category).collect(),
        None => catalog::all().iter().collect(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&agents)?);
    } else {
        println!("{}", render_agents(&agents));
    }
    Ok(())
}
