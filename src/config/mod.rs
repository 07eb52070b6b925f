//! Configuration management for `mjml-utils.toml`.
//!
//! The file is optional. When present it is found by searching upward from
//! the current directory, or given explicitly with `--config`.
//!
//! ```toml
//! [compiler]
//! # Program followed by fixed arguments; the source path is appended.
//! command = ["npx", "mjml"]
//! ```

mod error;
mod util;

pub use error::ConfigError;
use util::find_config_file;

use crate::{cli::Cli, debug, log};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

/// Config file name searched for when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "mjml-utils.toml";

/// Compiler used when nothing else is configured.
pub const DEFAULT_COMPILER: &str = "mjml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing mjml-utils.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// External compiler settings
    #[serde(default)]
    pub compiler: CompilerConfig,
}

/// `[compiler]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompilerConfig {
    /// Program followed by fixed arguments placed before the source path.
    #[serde(default = "default_command")]
    pub command: Vec<String>,
}

fn default_command() -> Vec<String> {
    vec![DEFAULT_COMPILER.to_string()]
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
        }
    }
}

impl CompilerConfig {
    /// Build a config for a single program with no extra arguments.
    #[cfg(test)]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            command: vec![program.into()],
        }
    }

    /// Program looked up on the search path.
    pub fn program(&self) -> &str {
        self.command.first().map_or(DEFAULT_COMPILER, String::as_str)
    }

    /// Arguments placed between the program and the source path.
    pub fn extra_args(&self) -> &[String] {
        self.command.get(1..).unwrap_or_default()
    }
}

impl Config {
    /// Load configuration for a CLI invocation.
    ///
    /// An explicit `--config` must exist; otherwise a missing file means
    /// defaults. CLI overrides are applied last.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let path = match &cli.config {
            Some(explicit) => {
                let path = cwd.join(explicit);
                if !path.is_file() {
                    return Err(ConfigError::NotFound(explicit.clone()).into());
                }
                Some(path)
            }
            None => find_config_file(&cwd, Path::new(DEFAULT_CONFIG)),
        };

        let mut config = match &path {
            Some(path) => {
                debug!("config"; "loading {}", path.display());
                Self::from_path(path)?
            }
            None => Self::default(),
        };

        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    #[cfg(test)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let (config, _) = Self::parse_with_ignored(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    /// Apply command line overrides.
    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(program) = &cli.compiler {
            match self.compiler.command.first_mut() {
                Some(first) => first.clone_from(program),
                None => self.compiler.command.push(program.clone()),
            }
        }
    }

    /// Check values that deserialize fine but cannot work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.compiler.command.first() {
            None => Err(ConfigError::Validation(
                "[compiler] command must name a program".into(),
            )),
            Some(program) if program.trim().is_empty() => Err(ConfigError::Validation(
                "[compiler] command has an empty program name".into(),
            )),
            Some(_) => Ok(()),
        }
    }
}

// ============================================================================
// tests
// ============================================================================
