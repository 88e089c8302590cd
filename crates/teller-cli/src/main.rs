use std::sync::Arc;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use teller_chat::ChatSession;
use teller_cli::{config::Config, repl::Repl};
use teller_client::{AccountsApi, BankingClient, ChatApi};
use teller_feed::AccountDesk;
use teller_persist::ThreadStoreBuilder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    init_logging(&config);

    tracing::info!(base_url = %config.api.base_url, chat_url = %config.api.chat_url(), "Starting teller");
    if config.api.bearer_token.is_none() {
        tracing::warn!("TELLER_API_TOKEN not set, requests are sent unauthenticated");
    }

    let client = Arc::new(BankingClient::from_config(&config.api)?);
    let accounts: Arc<dyn AccountsApi> = client.clone();
    let chat_api: Arc<dyn ChatApi> = client;

    let store = ThreadStoreBuilder::from_config(&config.storage).build()?;
    let desk = AccountDesk::new(accounts, config.feed);
    let chat = ChatSession::open(store, chat_api);

    let mut repl = Repl::new(desk, chat);
    repl.run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;

    tracing::info!("Bye");
    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(env_filter);

    // stdout belongs to the REPL
    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}
