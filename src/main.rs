// src/main.rs — tubepulse entry point

use clap::Parser;

use tubepulse::cli::{Cli, Commands};
use tubepulse::infra::config::{Config, Credentials};
use tubepulse::infra::logger;

#[tokio::main]
async fn main() {
    // Respects RUST_LOG
    logger::init_logging("info");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };
    let credentials = Credentials::from_env();

    match cli.command {
        Some(Commands::Serve { port }) => {
            let port = port.unwrap_or(config.server.port);
            tubepulse::server::serve(std::env::current_dir()?, port).await
        }
        Some(Commands::Doctor) => {
            run_doctor(&credentials);
            Ok(())
        }
        Some(Commands::Run) | None => tubepulse::bot::run(&config, &credentials).await,
    }
}

fn run_doctor(credentials: &Credentials) {
    let check = |present: bool| if present { "ok" } else { "missing" };
    println!(
        "BOT_TOKEN        {:<8} (bot session, required to run)",
        check(credentials.bot_token.is_some())
    );
    println!(
        "YOUTUBE_API_KEY  {:<8} (channel analytics)",
        check(credentials.youtube_api_key.is_some())
    );
    println!(
        "GROQ_API_KEY     {:<8} (AI strategies)",
        check(credentials.groq_api_key.is_some())
    );
}
