use std::sync::Arc;

use tracing::debug;

use gator::{register_commands, Command, Config, Database, FeedFetcher, State};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run() -> gator::Result<()> {
    let config = Config::load_default()?;

    if let Err(e) = gator::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        gator::logging::init_console_only(&config.logging.level);
    }
    debug!(path = ?config.path(), "Configuration loaded");

    let cmd = Command::from_args(std::env::args().skip(1))?;

    let db = Database::open(&config.database.url).await?;
    let fetcher = FeedFetcher::new(&config.fetch)?;
    let mut state = State::new(Arc::new(db.repository()), config, fetcher);

    register_commands().run(&mut state, &cmd).await
}
