//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

use crate::{
    catalog::{Catalog, GoalId},
    services::feedback::{DEFAULT_ENDPOINT, DEFAULT_MODEL},
};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "focus-session")]
#[command(about = "A state-managed HTTP server for focus sessions")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Goal selected at startup; defaults to the catalog's first goal
    #[arg(short, long)]
    pub goal: Option<GoalId>,

    /// File holding the persisted onboarding flag
    #[arg(long)]
    pub state_file: Option<PathBuf>,

    /// API key for feedback classification; feedback is only acknowledged without it
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Model used for feedback classification
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub gemini_model: String,

    /// Base URL of the classification API
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub gemini_endpoint: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Goal to start with: the explicit choice, else the catalog default
    pub fn initial_goal(&self, catalog: &Catalog) -> Option<GoalId> {
        self.goal.or_else(|| catalog.default_goal().map(|goal| goal.id))
    }

    /// Explicit state file, or `<config dir>/focus-session/state.json`
    pub fn state_path(&self) -> Option<PathBuf> {
        self.state_file.clone().or_else(|| {
            dirs::config_dir().map(|dir| dir.join("focus-session").join("state.json"))
        })
    }
}
