//! CLI commands for Gator.
//!
//! A command line is parsed into a `Command`, looked up by name in the
//! `Commands` registry and run against the process `State`.

pub mod handlers;
pub mod registry;
pub mod state;

use futures::FutureExt;

pub use registry::{handler, logged_in, Commands, Handler};
pub use state::{Output, State};

use crate::{GatorError, Result};

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command name.
    pub name: String,
    /// Arguments following the name.
    pub args: Vec<String>,
}

impl Command {
    /// Create a command.
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Parse process arguments, excluding the program name.
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        let name = args
            .next()
            .ok_or_else(|| GatorError::Validation("usage: gator <command> [args...]".to_string()))?;
        Ok(Self::new(name, args.collect()))
    }

    /// The argument at `index`, or a usage error.
    pub fn arg(&self, index: usize, usage: &str) -> Result<&str> {
        self.args
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| GatorError::Validation(format!("usage: {usage}")))
    }
}

/// Build the registry of every Gator command.
pub fn register_commands() -> Commands {
    let mut commands = Commands::new();
    commands.register("login", handler(|s, c| handlers::login(s, c).boxed()));
    commands.register("register", handler(|s, c| handlers::register(s, c).boxed()));
    commands.register("reset", handler(|s, c| handlers::reset(s, c).boxed()));
    commands.register("users", handler(|s, c| handlers::users(s, c).boxed()));
    commands.register("agg", handler(|s, c| handlers::agg(s, c).boxed()));
    commands.register("feeds", handler(|s, c| handlers::feeds(s, c).boxed()));
    commands.register(
        "addfeed",
        logged_in(|s, c, u| handlers::add_feed(s, c, u).boxed()),
    );
    commands.register("follow", logged_in(|s, c, u| handlers::follow(s, c, u).boxed()));
    commands.register(
        "following",
        logged_in(|s, c, u| handlers::following(s, c, u).boxed()),
    );
    commands.register(
        "unfollow",
        logged_in(|s, c, u| handlers::unfollow(s, c, u).boxed()),
    );
    commands
}

#[cfg(test)]
pub(crate) use test_support::test_state;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_args() {
        let cmd = Command::from_args(["addfeed", "Tech", "https://example.com/feed.xml"]).unwrap();
        assert_eq!(cmd.name, "addfeed");
        assert_eq!(cmd.args, vec!["Tech", "https://example.com/feed.xml"]);

        let cmd = Command::from_args(["users"]).unwrap();
        assert!(cmd.args.is_empty());
    }

    #[test]
    fn test_from_args_empty() {
        let result = Command::from_args(Vec::<String>::new());
        assert!(matches!(result, Err(GatorError::Validation(_))));
    }

    #[test]
    fn test_arg() {
        let cmd = Command::new("login", vec!["alice".to_string()]);
        assert_eq!(cmd.arg(0, "login <name>").unwrap(), "alice");
        let err = cmd.arg(1, "login <name>").unwrap_err();
        assert_eq!(err.to_string(), "usage: login <name>");
    }

    #[test]
    fn test_register_commands() {
        let commands = register_commands();
        assert_eq!(
            commands.names(),
            vec![
                "addfeed",
                "agg",
                "feeds",
                "follow",
                "following",
                "login",
                "register",
                "reset",
                "unfollow",
                "users"
            ]
        );
    }
}
