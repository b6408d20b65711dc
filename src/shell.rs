//! A line-oriented shell around a single [`Map`].
//!
//! Each line is `<command> <value>...`, where values are written in their
//! inspect form (see [`crate::parser`]).
mod commands;

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use itertools::Itertools;
use log::debug;
use thiserror::Error;

use self::commands::CommandBuilder;
use crate::identity::{CacheConfig, TokenCache};
use crate::map::Map;
use crate::parser::parse_values;
use crate::value::{InternalError, MapError, Value};

#[derive(Error, Debug)]
pub enum ShellError {
    #[error(transparent)]
    Map(#[from] MapError),

    #[error("parse error: {0}")]
    Parse(#[from] anyhow::Error),

    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),

    #[error("type error: expected {expected}, got {actual}")]
    Type { expected: String, actual: String },

    #[error("integer overflow: {current} + {amount}")]
    Overflow { current: isize, amount: isize },

    #[error(
        "Command {name} takes {arity} arguments but got {num_args_provided}"
    )]
    Arity {
        name: String,
        arity: usize,
        num_args_provided: usize,
    },
}

/// Convenience - map a value conversion failure into a type error
impl From<InternalError> for ShellError {
    fn from(err: InternalError) -> Self {
        match err {
            InternalError::Conversion {
                builtin_type,
                rust_type,
            } => {
                ShellError::Type {
                    expected: rust_type,
                    actual: builtin_type,
                }
            },
        }
    }
}

pub type SResult<T> = Result<T, ShellError>;

/*****************\
|* Configuration *|
\*****************/
#[derive(Debug, Clone, PartialEq)]
pub struct ShellConfig {
    pub prompt: String,
    pub tab_stop: usize,
    pub auto_add_history: bool,
    pub bracketed_paste: bool,
    pub cache: CacheConfig,
}

impl Default for ShellConfig {
    fn default() -> Self {
        ShellConfig {
            prompt: ">> ".to_string(),
            tab_stop: 2,
            auto_add_history: true,
            bracketed_paste: true,
            cache: CacheConfig::default(),
        }
    }
}

impl ShellConfig {
    pub fn editor_config(&self) -> rustyline::Config {
        rustyline::Config::builder()
            .tab_stop(self.tab_stop)
            .auto_add_history(self.auto_add_history)
            .bracketed_paste(self.bracketed_paste)
            .build()
    }
}

/************\
|* Commands *|
\************/
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Arity {
    Fixed(usize),
    Variadic,
}

impl Arity {
    pub fn check(&self, name: &str, n_args: usize) -> SResult<()> {
        if let &Arity::Fixed(arity) = self {
            if n_args != arity {
                return Err(ShellError::Arity {
                    name: name.to_string(),
                    arity,
                    num_args_provided: n_args,
                });
            }
        };

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Command {
    pub name: String,
    pub arity: Arity,
    pub arguments: Vec<String>,
    pub eval: fn(&[Value], &mut Session) -> SResult<String>,
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        for arg in &self.arguments {
            write!(f, " {arg}")?;
        }
        if self.arity == Arity::Variadic {
            write!(f, "...")?;
        }
        Ok(())
    }
}

/// Command names (and aliases) to commands
#[derive(Debug, Clone, Default)]
pub struct Registry {
    commands: HashMap<String, Command>,
}

impl Registry {
    pub fn set(&mut self, name: &str, command: Command) {
        self.commands
            .insert(name.to_string(), command);
    }

    pub fn lookup(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn lookup_or_error(&self, name: &str) -> SResult<&Command> {
        self.lookup(name)
            .ok_or_else(|| ShellError::UnknownCommand(name.to_string()))
    }

    /// One usage line per command, aliases folded together
    pub fn usage(&self) -> Vec<String> {
        self.commands
            .values()
            .map(|command| command.to_string())
            .unique()
            .sorted()
            .collect()
    }
}

pub fn builtins() -> Registry {
    let mut registry = Registry::default();

    commands::InsertCommand::register(&mut registry);
    commands::GetCommand::register(&mut registry);
    commands::HasKeyCommand::register(&mut registry);
    commands::DeleteCommand::register(&mut registry);
    commands::SizeCommand::register(&mut registry);
    commands::ListCommand::register(&mut registry);
    commands::KeysCommand::register(&mut registry);
    commands::ValuesCommand::register(&mut registry);
    commands::ShowCommand::register(&mut registry);
    commands::TakeCommand::register(&mut registry);
    commands::DropCommand::register(&mut registry);
    commands::MergeCommand::register(&mut registry);
    commands::LoadCommand::register(&mut registry);
    commands::IncrCommand::register(&mut registry);
    commands::ClearCommand::register(&mut registry);
    commands::HelpCommand::register(&mut registry);

    registry
}

/***********\
|* Session *|
\***********/
#[derive(Debug, Clone)]
pub struct Session {
    pub map: Map,
    pub registry: Registry,
}

impl Default for Session {
    fn default() -> Self {
        Session::new(&ShellConfig::default())
    }
}

impl Session {
    pub fn new(config: &ShellConfig) -> Self {
        Session::with_map(Map::with_cache(TokenCache::shared(config.cache)))
    }

    pub fn with_map(map: Map) -> Self {
        Session {
            map,
            registry: builtins(),
        }
    }

    /// Evaluate one line of input, returning the text to print
    pub fn eval_line(&mut self, line: &str) -> SResult<String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(String::new());
        }

        let (name, rest) = line
            .split_once(char::is_whitespace)
            .unwrap_or((line, ""));
        let command = self.registry.lookup_or_error(name)?.clone();

        let args = parse_values(rest)?;
        command
            .arity
            .check(&command.name, args.len())?;

        debug!(
            "dispatching '{}' with {} argument(s)",
            command.name,
            args.len()
        );
        (command.eval)(&args, self)
    }
}
