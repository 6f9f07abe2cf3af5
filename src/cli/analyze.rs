use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use crate::backend::{AnalysisBackend, HttpBackend};
use crate::cli::commands::{AnalyzeArgs, GlobalOpts};
use crate::errors::AgunblockError;
use crate::markdown;
use crate::models::AnalysisResult;
use crate::session::controller::CANCELLED_MESSAGE;
use crate::session::{validate_request, AnalysisSession, StreamingAnalysis};
use crate::view::renderer::{render_error, render_results};
use crate::view::AnalysisProgress;
use super::{load, parse_repository};

pub async fn handle_analyze(args: AnalyzeArgs, opts: GlobalOpts) -> Result<(), AgunblockError> {
    let slug = parse_repository(&args.repository)?;
    let config = load(&opts).await?;
    let backend: Arc<dyn AnalysisBackend> = Arc::new(HttpBackend::new(&config)?);

    if args.no_stream {
        let request = validate_request(&args.agent, &slug.owner, &slug.repo)?;
        info!(repo = %slug, agent_id = %request.agent_id, "Requesting analysis");
        let response = backend.analyze(&request).await?;
        let failed = response.error.clone();
        let result = response.into_result(&request);
        return report(&args, failed, Some(&result), None).await;
    }

    let timeout = args
        .timeout
        .or(config.stream_timeout_secs)
        .map(Duration::from_secs);
    let controller = StreamingAnalysis::new(backend).with_stream_timeout(timeout);

    let target = slug.to_string();
    let mut progress = if opts.quiet || args.json {
        AnalysisProgress::hidden(&target)
    } else {
        AnalysisProgress::new(&target)
    };

    let session = watch_analysis(&controller, &args.agent, &slug.owner, &slug.repo, &mut progress).await?;
    progress.finish(&session);

    if session.error.as_deref() == Some(CANCELLED_MESSAGE) {
        return Err(AgunblockError::Cancelled);
    }
    report(&args, session.error.clone(), session.results.as_ref(), Some(&session)).await
}

/// Run the analysis while mirroring every published state into the progress
/// view. Ctrl-C cancels the run.
async fn watch_analysis(
    controller: &StreamingAnalysis,
    agent_id: &str,
    owner: &str,
    repo: &str,
    progress: &mut AnalysisProgress,
) -> Result<AnalysisSession, AgunblockError> {
    let mut rx = controller.subscribe();
    let run = controller.start_analysis(agent_id, owner, repo);
    tokio::pin!(run);

    loop {
        tokio::select! {
            result = &mut run => return result,
            changed = rx.changed() => {
                if changed.is_ok() {
                    let session = rx.borrow_and_update().clone();
                    progress.update(&session);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted, cancelling analysis");
                controller.cancel();
            }
        }
    }
}

async fn report(
    args: &AnalyzeArgs,
    error: Option<String>,
    result: Option<&AnalysisResult>,
    session: Option<&AnalysisSession>,
) -> Result<(), AgunblockError> {
    if args.json {
        match session {
            Some(session) => println!("{}", serde_json::to_string_pretty(session)?),
            None => println!("{}", serde_json::to_string_pretty(&result)?),
        }
    }

    if let Some(message) = error {
        if !args.json {
            eprintln!("{}", render_error(&message));
        }
        return Err(AgunblockError::Backend(message));
    }

    let Some(result) = result else {
        return Err(AgunblockError::Stream("Analysis finished without results".into()));
    };
    if !args.json {
        println!("{}", render_results(result));
    }
    if let Some(path) = &args.html {
        let title = format!("{} setup for {}", result.repo_name, result.agent_id);
        tokio::fs::write(path, markdown::render_document(&title, &result.analysis)).await?;
        info!(%path, "Wrote HTML report");
    }
    Ok(())
}
