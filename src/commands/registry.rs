//! Command registry and dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::debug;

use crate::commands::{Command, State};
use crate::db::User;
use crate::subscription::SubscriptionService;
use crate::{GatorError, Result};

/// A boxed async command handler.
pub type Handler =
    Arc<dyn for<'a> Fn(&'a mut State, &'a Command) -> BoxFuture<'a, Result<()>> + Send + Sync>;

/// Box a closure as a `Handler`.
///
/// Closures passed here get their higher-ranked signature inferred.
pub fn handler<F>(f: F) -> Handler
where
    F: for<'a> Fn(&'a mut State, &'a Command) -> BoxFuture<'a, Result<()>> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wrap a handler that needs the logged-in user.
///
/// The session user is resolved before the inner handler runs; if that
/// fails the error is returned and the inner handler is never called.
pub fn logged_in<F>(f: F) -> Handler
where
    F: for<'a> Fn(&'a mut State, &'a Command, User) -> BoxFuture<'a, Result<()>>
        + Send
        + Sync
        + 'static,
{
    let inner = Arc::new(f);
    handler(move |state, cmd| {
        let inner = Arc::clone(&inner);
        async move {
            let name = state.config.current_user_name()?.to_string();
            let repo = state.repo();
            let user = SubscriptionService::new(repo.as_ref())
                .get_user(&name)
                .await?;
            (*inner)(state, cmd, user).await
        }
        .boxed()
    })
}

/// Name to handler mapping.
#[derive(Default)]
pub struct Commands {
    handlers: HashMap<String, Handler>,
}

impl Commands {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. A handler already registered under `name` is
    /// replaced.
    pub fn register(&mut self, name: impl Into<String>, handler: Handler) {
        self.handlers.insert(name.into(), handler);
    }

    /// Registered command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Dispatch `cmd` to its handler.
    pub async fn run(&self, state: &mut State, cmd: &Command) -> Result<()> {
        let handler = self
            .handlers
            .get(&cmd.name)
            .ok_or_else(|| GatorError::UnknownCommand(cmd.name.clone()))?;

        debug!(command = %cmd.name, args = ?cmd.args, "Running command");
        handler(state, cmd).await
    }
}

impl std::fmt::Debug for Commands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Commands")
            .field("names", &self.names())
            .finish()
    }
}
