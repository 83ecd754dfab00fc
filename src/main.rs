use clap::Parser;
use env_logger::Env;
use visual_matcher::{cli, client, config, error, interactive, loader, output, session};
use cli::{Cli, Commands};
use client::HttpMatchClient;
use config::Config;
use error::Result;
use session::Session;
use visual_matcher_common::{ScoreThreshold, SearchState};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let env = if cli.verbose {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("warn")
    };
    env_logger::Builder::from_env(env).init();

    if let Err(e) = run(cli).await {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        Commands::Search { file, url, min_score, json } => {
            let mut session = open_session(&config, cli.base_url.as_deref(), min_score)?;

            if let Some(path) = file {
                let image = loader::load_image(&path)?;
                if !session.select_file(image) {
                    println!("⚠ 空のファイルです: {}", path.display());
                }
            } else if let Some(url) = url {
                session.select_url(&url);
            }

            if !json {
                println!("🔎 {}", output::describe_source(session.orchestrator().source()));
            }

            // 画像未選択なら検証エラーがそのまま返る
            let state = output::search_with_spinner(&mut session).await?;

            if state != Some(SearchState::Success) {
                let message = session
                    .take_notice()
                    .map(|n| n.message().to_string())
                    .unwrap_or_else(|| visual_matcher_common::GENERIC_ERROR_MESSAGE.to_string());
                return Err(visual_matcher_common::Error::Transport(message).into());
            }

            let base_url = session.client().base_url().to_string();
            let view = output::result_view(session.orchestrator(), &base_url);
            if json {
                println!("{}", output::render_json(&view)?);
            } else {
                print!("{}", output::render_text(&view));
            }
        }

        Commands::Interactive { min_score } => {
            let session = open_session(&config, cli.base_url.as_deref(), min_score)?;
            interactive::run_interactive(session).await?;
        }

        Commands::Ping => {
            let base_url = config.resolve_base_url(cli.base_url.as_deref())?;
            let client = HttpMatchClient::new(&base_url, config.timeout())?;
            let message = client.ping().await?;
            println!("✔ {}: {}", base_url, message);
        }

        Commands::Config { set_base_url, set_timeout, show } => {
            let mut config = config;

            if let Some(url) = set_base_url {
                config.set_base_url(url)?;
                println!("✔ ベースURLを設定しました");
            }

            if let Some(seconds) = set_timeout {
                config.set_timeout(seconds)?;
                println!("✔ タイムアウトを設定しました");
            }

            if show {
                println!("設定:");
                println!("  ベースURL: {}", config.base_url);
                println!(
                    "  タイムアウト: {}",
                    match config.timeout() {
                        Some(t) => format!("{}秒", t.as_secs()),
                        None => "なし".to_string(),
                    }
                );
                println!("  スコア下限: {}", config.min_score());
                if let Ok(url) = std::env::var(config::BASE_URL_ENV) {
                    println!("  ({} = {})", config::BASE_URL_ENV, url);
                }
            }
        }
    }

    Ok(())
}

fn open_session(
    config: &Config,
    base_url: Option<&str>,
    min_score: Option<f32>,
) -> Result<Session<HttpMatchClient>> {
    let base_url = config.resolve_base_url(base_url)?;
    let client = HttpMatchClient::new(&base_url, config.timeout())?;
    let threshold = match min_score {
        Some(value) => ScoreThreshold::new(value)?,
        None => config.min_score(),
    };
    Ok(Session::new(client, threshold))
}
