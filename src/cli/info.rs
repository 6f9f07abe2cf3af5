use tracing::info;
use crate::backend::{AnalysisBackend, HttpBackend};
use crate::cli::commands::{GlobalOpts, InfoArgs};
use crate::errors::AgunblockError;
use crate::view::renderer::render_repo_info;
use super::{load, parse_repository};

pub async fn handle_info(args: InfoArgs, opts: GlobalOpts) -> Result<(), AgunblockError> {
    let slug = parse_repository(&args.repository)?;
    let config = load(&opts).await?;
    let backend = HttpBackend::new(&config)?;

    info!(repo = %slug, "Fetching repository info");
    let repo_info = backend.repo_info(&slug.owner, &slug.repo).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&repo_info)?);
    } else {
        println!("{}", render_repo_info(&repo_info));
    }
    Ok(())
}
