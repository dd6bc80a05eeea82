//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! Every comment input also reads the `INPUT_*` variable a workflow runner
//! sets for the matching step input, so the same binary works as a CLI
//! and as an action entrypoint. An explicit flag wins over the variable.
//!
//! # Global Flags
//!
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Warnings and errors only

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::core::config::Inputs;

/// Create, update or recreate a tagged comment on a pull request or issue
#[derive(Parser, Debug)]
#[command(name = "pr-comment")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
EXAMPLES:
    # Post or refresh the build report on PR #42
    pr-comment --repo octocat/hello --pr-number 42 \\
        --message 'Build passed' --comment-tag build-status

    # Replace the report with a fresh comment and react to it
    pr-comment --file-path report.md --comment-tag build-status \\
        --recreate true --reactions '+1,rocket'

    # Only touch an existing comment, never create one
    pr-comment --message 'Still green' --comment-tag build-status \\
        --create-if-not-exists false")]
pub struct Cli {
    /// Comment content
    #[arg(long, env = "INPUT_MESSAGE", hide_env_values = true)]
    pub message: Option<String>,

    /// Read comment content from this file
    #[arg(long, env = "INPUT_FILEPATH", value_name = "PATH")]
    pub file_path: Option<PathBuf>,

    /// Pull request or issue number (defaults to the triggering event)
    #[arg(long, env = "INPUT_PR_NUMBER", value_name = "NUMBER")]
    pub pr_number: Option<String>,

    /// Tag identifying the comment across runs
    #[arg(long, env = "INPUT_COMMENT_TAG", value_name = "TAG")]
    pub comment_tag: Option<String>,

    /// Comma-separated reactions to add (+1, -1, laugh, confused, heart, hooray, rocket, eyes)
    #[arg(long, env = "INPUT_REACTIONS", value_name = "LIST")]
    pub reactions: Option<String>,

    /// Delete a found comment and post a new one instead of editing it
    #[arg(
        long,
        env = "INPUT_RECREATE",
        value_name = "BOOL",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        default_value = "false"
    )]
    pub recreate: bool,

    /// Create the comment when no tagged comment is found
    #[arg(
        long,
        env = "INPUT_CREATE_IF_NOT_EXISTS",
        value_name = "BOOL",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        default_value = "true"
    )]
    pub create_if_not_exists: bool,

    /// API token (falls back to GITHUB_TOKEN)
    #[arg(long, env = "INPUT_GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Repository as owner/name (defaults to GITHUB_REPOSITORY)
    #[arg(long, value_name = "OWNER/NAME")]
    pub repo: Option<String>,

    /// Forge to talk to: github or gitea (defaults from GITEA_ACTIONS)
    #[arg(long, value_name = "PROVIDER")]
    pub forge: Option<String>,

    /// API base URL for GitHub, server URL for Gitea
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Give up after fetching this many pages of comments
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_pages: Option<u32>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Warnings and errors only
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// The explicit inputs this invocation carries.
    pub fn inputs(&self) -> Inputs {
        Inputs {
            message: self.message.clone(),
            file_path: self.file_path.clone(),
            pr_number: self.pr_number.clone(),
            comment_tag: self.comment_tag.clone(),
            reactions: self.reactions.clone(),
            recreate: self.recreate,
            create_if_not_exists: self.create_if_not_exists,
            token: self.token.clone(),
            repo: self.repo.clone(),
            forge: self.forge.clone(),
            api_url: self.api_url.clone(),
            max_pages: self.max_pages,
        }
    }
}
