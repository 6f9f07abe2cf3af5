use crate::backend::GitHubClient;
use crate::cli::commands::{GlobalOpts, StarsArgs};
use crate::errors::AgunblockError;
use crate::view::renderer::render_stars;
use super::{load, parse_repository};

pub async fn handle_stars(args: StarsArgs, opts: GlobalOpts) -> Result<(), AgunblockError> {
    let slug = parse_repository(&args.repository)?;
    let config = load(&opts).await?;
    let github = GitHubClient::new(&config)?;

    if opts.quiet {
        println!("{}", github.stars(&slug.owner, &slug.repo).await?);
    } else {
        let repo = github.repository(&slug.owner, &slug.repo).await?;
        println!("{}", render_stars(&repo));
    }
    Ok(())
}
