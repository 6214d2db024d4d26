// src/bin/numviz-cli.rs
use clap::Parser;
use futures::future;
use numviz::{
    AppConfig, BufferEditor, RequestState, ResultSet, SubmissionForm, VisualizationOrchestrator,
    VisualizeService, HttpVisualizeService, VizError,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

/// Submit numeric-array code for visualization and show the results.
#[derive(Parser, Debug)]
#[command(name = "numviz-cli", version, about)]
struct Cli {
    /// Source file to submit. Reads stdin when omitted.
    file: Option<PathBuf>,

    /// TOML config file. Environment variables are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Rendering service base address.
    #[arg(long)]
    api_url: Option<String>,

    /// Relay base address to submit through.
    #[arg(long)]
    relay_url: Option<String>,

    /// Download every rendered video into this directory.
    #[arg(long)]
    save_videos: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));
    if let Err(e) = dotenv {
        log::debug!("No .env file loaded ({}), using process environment", e);
    }

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> numviz::Result<ExitCode> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::from_env()?,
    };
    if let Some(api_url) = cli.api_url {
        config.api_base = api_url;
    }
    if let Some(relay_url) = cli.relay_url {
        config.relay_base = Some(relay_url);
    }

    let code = match &cli.file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let service: Arc<dyn VisualizeService> = Arc::new(HttpVisualizeService::new(config.clone())?);
    let form = SubmissionForm::with_code(code.as_str());
    let mut orchestrator =
        VisualizationOrchestrator::new(&config, Arc::clone(&service), BufferEditor::with_text(&code));

    form.submit(&mut orchestrator);
    println!("⏳ Loading...");
    orchestrator.settle_all().await;

    println!("{}\n", orchestrator.editor().render());

    let succeeded = matches!(orchestrator.state(), RequestState::Succeeded);
    if succeeded {
        print_results(orchestrator.results());
    }

    if let (Some(dir), true) = (&cli.save_videos, succeeded) {
        let failures = save_videos(service.as_ref(), orchestrator.results(), dir).await?;
        for (index, reason) in failures {
            orchestrator.report_media_failure(index, reason);
        }
    }

    for notice in orchestrator.notices() {
        eprintln!("⚠️  {}", notice);
    }

    Ok(if succeeded { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn print_results(results: &ResultSet) {
    if let Some(at) = results.rendered_at() {
        println!("📊 {} operations rendered at {}", results.len(), at.to_rfc3339());
    }
    for (index, result) in results.results().iter().enumerate() {
        println!("\n[{}] {}", index, result.operation);
        println!("    Input:  {}", result.input);
        println!("    Output: {}", result.output);
        if let Some(message) = &result.message {
            println!("    {}", message);
        }
        if let Some(key) = results.media_key(index) {
            println!("    🎞️  video /video/{} (key {})", index, key);
        }
    }
}

/// Downloads all videos concurrently. Returns the indices that failed with
/// their reasons; write errors abort.
async fn save_videos(
    service: &dyn VisualizeService,
    results: &ResultSet,
    dir: &Path,
) -> Result<Vec<(usize, String)>, VizError> {
    tokio::fs::create_dir_all(dir).await?;

    let slots = results.media_slots();
    let downloads = slots.iter().map(|slot| service.fetch_video(slot.key.index));
    let outcomes = future::join_all(downloads).await;

    let mut failures = Vec::new();
    for (slot, outcome) in slots.iter().zip(outcomes) {
        match outcome {
            Ok(bytes) => {
                let path = dir.join(format!("{}.mp4", slot.key));
                tokio::fs::write(&path, bytes).await?;
                println!("💾 Saved {}", path.display());
            }
            Err(e) => failures.push((slot.key.index, e.message())),
        }
    }
    Ok(failures)
}
