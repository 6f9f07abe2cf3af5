use agunblock::cli;
use agunblock::view::renderer::render_version;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging
    let log_level = match (cli.quiet, cli.verbose) {
        (true, 0) => "error",
        (_, 0) => "warn",
        (_, 1) => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(!cli.no_color)
            .with_writer(std::io::stderr)
            .init();
    }

    let opts = cli.global_opts();
    let result = match cli.command {
        cli::Commands::Analyze(args) => cli::analyze::handle_analyze(args, opts).await,
        cli::Commands::Info(args) => cli::info::handle_info(args, opts).await,
        cli::Commands::Stars(args) => cli::stars::handle_stars(args, opts).await,
        cli::Commands::Agents(args) => cli::agents::handle_agents(args),
        cli::Commands::Render(args) => cli::render::handle_render(args).await,
        cli::Commands::Version => {
            println!("{}", render_version());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
