mod init;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use docqa_channels::CliChannel;
use docqa_core::{AnsweringAgent, Assistant, Config, Mode, VoiceRenderer};
use docqa_ingest::Ingestor;
use docqa_llm::{GeminiProvider, GoogleTranslateTts};
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(name = "docqa", version, about = "Ask questions about PDFs and videos")]
struct Cli {
    /// Path to the TOML config file
    #[arg(
        long,
        global = true,
        env = "DOCQA_CONFIG",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    /// Interaction mode: research, voice, or video
    #[arg(long)]
    mode: Option<Mode>,

    /// Document to ingest before the first prompt (repeatable)
    #[arg(long = "file", value_name = "PATH")]
    files: Vec<PathBuf>,

    /// Do not attach the hosted web search tool
    #[arg(long)]
    no_search: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default configuration file
    Init {
        /// Destination path (defaults to --config)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Grace period for blocking tasks once the session has ended.
///
/// The terminal reader stays parked in `read_line` after ctrl-c, so the
/// runtime must not wait for it.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_subscriber();

    if let Some(Command::Init { output, force }) = cli.command {
        let path = output.unwrap_or(cli.config);
        return init::run(&path, force);
    }

    block_on_then_shutdown(serve(cli))?
}

/// Drive `future` on a fresh runtime, then shut down without waiting on
/// blocking tasks that are still running.
fn block_on_then_shutdown<F: Future>(future: F) -> anyhow::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    let output = runtime.block_on(future);
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    Ok(output)
}

async fn serve(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(&cli.config)?;
    if let Some(mode) = cli.mode {
        config.agent.mode = mode;
    }
    if cli.no_search {
        config.llm.web_search = false;
    }
    config.validate()?;
    config.resolve_secrets();
    if config.secrets.gemini_api_key.is_none() {
        tracing::warn!("GOOGLE_API_KEY is not set; questions will fail until it is configured");
    }

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {e:#}");
            return;
        }
        tracing::info!("received shutdown signal");
        signal_token.cancel();
    });

    let mut assistant = build_assistant(&config, shutdown)?;
    tracing::info!(
        mode = %config.agent.mode,
        model = %config.llm.model,
        web_search = config.llm.web_search,
        "assistant ready"
    );

    for path in &cli.files {
        let outcome = assistant
            .upload_path(path)
            .await
            .with_context(|| format!("failed to ingest {}", path.display()))?;
        tracing::info!(path = %path.display(), ?outcome, "pre-loaded document");
    }

    println!("docqa v{}", env!("CARGO_PKG_VERSION"));
    assistant.run().await?;
    Ok(())
}

fn build_assistant(
    config: &Config,
    shutdown: CancellationToken,
) -> anyhow::Result<Assistant<GeminiProvider, CliChannel>> {
    let client = docqa_llm::http::build_client(
        Duration::from_secs(config.timeouts.connect_secs),
        Duration::from_secs(config.timeouts.llm_secs),
    )
    .context("failed to build HTTP client")?;

    let api_key = config
        .secrets
        .gemini_api_key
        .as_ref()
        .map(|s| s.expose().to_owned());
    let provider = GeminiProvider::new(
        client.clone(),
        api_key,
        config.llm.base_url.clone(),
        config.llm.model.clone(),
    )
    .with_web_search(config.llm.web_search);

    let mode = config.agent.mode;
    let agent = AnsweringAgent::new(provider.clone(), config.agent.identity());
    let mut assistant = Assistant::new(mode, agent, CliChannel::new())
        .with_ingestor(Ingestor::new(config.ingest.max_file_size))
        .with_shutdown(shutdown);

    match mode {
        Mode::Voice => {
            let tts = GoogleTranslateTts::new(client, config.voice.base_url.clone());
            assistant = assistant.with_voice(VoiceRenderer::new(Box::new(tts)));
        }
        Mode::Video => {
            assistant = assistant.with_media_store(Box::new(provider), config.video.poll_config());
        }
        Mode::Research => {}
    }

    Ok(assistant)
}

fn init_subscriber() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_parses_mode_and_files() {
        let cli = Cli::try_parse_from([
            "docqa",
            "--mode",
            "video",
            "--file",
            "a.mp4",
            "--file",
            "b.mov",
            "--no-search",
        ])
        .unwrap();
        assert_eq!(cli.mode, Some(Mode::Video));
        assert_eq!(cli.files, vec![PathBuf::from("a.mp4"), PathBuf::from("b.mov")]);
        assert!(cli.no_search);
        assert!(cli.command.is_none());
    }

    #[test]
    fn cli_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["docqa", "--mode", "podcast"]).is_err());
    }

    #[test]
    fn cli_init_subcommand() {
        let cli = Cli::try_parse_from(["docqa", "init", "--output", "out.toml", "--force"]).unwrap();
        match cli.command {
            Some(Command::Init { output, force }) => {
                assert_eq!(output, Some(PathBuf::from("out.toml")));
                assert!(force);
            }
            None => panic!("expected init subcommand"),
        }
    }

    #[test]
    fn shutdown_does_not_wait_for_parked_blocking_reader() {
        let started = std::time::Instant::now();
        let value = block_on_then_shutdown(async {
            tokio::task::spawn_blocking(|| std::thread::sleep(Duration::from_secs(30)));
            tokio::task::yield_now().await;
            7
        })
        .unwrap();
        assert_eq!(value, 7);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn build_assistant_wires_mode() {
        let mut config = Config::default();
        config.agent.mode = Mode::Video;
        let assistant = build_assistant(&config, CancellationToken::new()).unwrap();
        assert_eq!(assistant.mode(), Mode::Video);
        assert!(assistant.session().list().is_empty());
    }
}
