//! Per-process command state.

use std::io::Write;
use std::sync::Arc;

use crate::config::Config;
use crate::db::Repository;
use crate::rss::FeedFetcher;

/// Output sink for command handlers.
pub type Output = Box<dyn Write + Send + Sync>;

/// Everything a command handler may touch.
///
/// Only `login` and `register` change the session user, through
/// `Config::set_user`.
pub struct State {
    repo: Arc<dyn Repository>,
    pub config: Config,
    pub fetcher: FeedFetcher,
    out: Output,
}

impl State {
    /// Create a state writing command output to stdout.
    pub fn new(repo: Arc<dyn Repository>, config: Config, fetcher: FeedFetcher) -> Self {
        Self::with_output(repo, config, fetcher, Box::new(std::io::stdout()))
    }

    /// Create a state writing command output to `out`.
    pub fn with_output(
        repo: Arc<dyn Repository>,
        config: Config,
        fetcher: FeedFetcher,
        out: Output,
    ) -> Self {
        Self {
            repo,
            config,
            fetcher,
            out,
        }
    }

    /// Shared handle to the repository.
    pub fn repo(&self) -> Arc<dyn Repository> {
        Arc::clone(&self.repo)
    }

    /// Command output sink.
    pub fn out(&mut self) -> &mut dyn Write {
        &mut self.out
    }
}

impl std::fmt::Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
