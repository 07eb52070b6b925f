//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Watch and compile mjml templates, keeping template-engine headers
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Config file path (default: mjml-utils.toml, searched upward)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Compiler program, replacing the first word of the configured command
    #[arg(long, global = true, value_hint = clap::ValueHint::CommandName)]
    pub compiler: Option<String>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Watch a directory and recompile mjml files as they change
    #[command(visible_alias = "w")]
    Watch {
        /// Directory to watch
        #[arg(value_hint = clap::ValueHint::DirPath)]
        directory: PathBuf,
    },

    /// Compile every non-template mjml file under a directory
    #[command(name = "compile_all", visible_alias = "compile-all")]
    CompileAll {
        /// Path to directory
        #[arg(value_hint = clap::ValueHint::DirPath)]
        path: PathBuf,
    },

    /// Compile one mjml file, or its whole directory if it is a template
    #[command(visible_alias = "c")]
    Compile {
        /// Path to mjml file
        #[arg(value_hint = clap::ValueHint::FilePath)]
        path: PathBuf,
    },
}
