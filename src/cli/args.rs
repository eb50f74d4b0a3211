//! Clap argument types and input validation.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use codecritic::models::LANGUAGE_OPTIONS;

/// AI-assisted code review CLI.
#[derive(Parser, Debug)]
#[command(name = "codecritic", version = codecritic::constants::VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Submit code for an AI review.
    Review(ReviewArgs),

    /// Browse and manage saved review history.
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Manage the snippet library.
    Snippets {
        #[command(subcommand)]
        action: SnippetsAction,
    },

    /// Manage the local comment thread for the current review.
    Comments {
        #[command(subcommand)]
        action: CommentsAction,
    },

    /// Create or decode shareable review links.
    Share {
        #[command(subcommand)]
        action: ShareAction,
    },

    /// Verify an email address with a token from a verification link.
    VerifyEmail {
        /// The token from the verification email.
        #[arg(required_unless_present = "resend", conflicts_with = "resend")]
        token: Option<String>,

        /// Request a fresh verification email instead.
        #[arg(long)]
        resend: bool,
    },

    /// Print version information.
    Version,
}

/// Arguments for the `review` subcommand.
#[derive(Parser, Debug)]
pub struct ReviewArgs {
    /// File to review. Reads stdin when absent or `-`.
    pub file: Option<PathBuf>,

    /// Programming language of the code.
    #[arg(long, short = 'l', default_value = "javascript")]
    pub language: String,

    /// Save the review to server-side history afterwards.
    #[arg(long, default_value_t = false)]
    pub save: bool,

    /// Output format.
    #[arg(long, default_value = "terminal")]
    pub format: OutputFormat,

    /// Start an interactive follow-up chat after the review.
    #[arg(long, default_value_t = false)]
    pub chat: bool,
}

impl ReviewArgs {
    /// Check the language against the supported set.
    pub fn validate_language(&self) -> Result<(), String> {
        if LANGUAGE_OPTIONS.contains(&self.language.as_str()) {
            Ok(())
        } else {
            Err(format!(
                "unsupported language '{}' (supported: {})",
                self.language,
                LANGUAGE_OPTIONS.join(", ")
            ))
        }
    }
}

/// History subcommands.
#[derive(clap::Subcommand, Debug)]
pub enum HistoryAction {
    /// List saved reviews, newest first.
    List,
    /// Show aggregate statistics (average score, trend).
    Stats,
    /// Print the full history as JSON.
    Export,
    /// Delete all saved reviews.
    Clear,
}

/// Snippet library subcommands.
#[derive(clap::Subcommand, Debug)]
pub enum SnippetsAction {
    /// Save a code file as a snippet.
    Add {
        /// File containing the snippet code.
        file: PathBuf,
        /// Snippet title.
        #[arg(long)]
        title: String,
        /// Programming language.
        #[arg(long, short = 'l', default_value = "javascript")]
        language: String,
        /// What the snippet does.
        #[arg(long, default_value = "")]
        description: String,
        /// What problem it fixes.
        #[arg(long, default_value = "")]
        fixes: String,
        /// Comma-separated tags.
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// List snippets, favorites and most-used first.
    List,
    /// Search snippets by text and tag.
    Search {
        /// Text to match against title, description and code.
        #[arg(default_value = "")]
        query: String,
        /// Restrict to one tag ("all" disables the filter).
        #[arg(long, default_value = "all")]
        tag: String,
    },
    /// Delete a snippet by id.
    Remove { id: String },
    /// Toggle a snippet's favorite flag.
    Favorite { id: String },
    /// Print a snippet's code and count the use.
    Copy { id: String },
    /// Suggest snippets relevant to a code file.
    Suggest {
        /// File to find suggestions for.
        file: PathBuf,
        /// Programming language.
        #[arg(long, short = 'l', default_value = "javascript")]
        language: String,
    },
}

/// Comment thread subcommands.
#[derive(clap::Subcommand, Debug)]
pub enum CommentsAction {
    /// Add a comment, optionally pinned to a code line.
    Add {
        /// Comment author name.
        #[arg(long)]
        author: String,
        /// Comment text.
        #[arg(long)]
        text: String,
        /// Code line the comment refers to.
        #[arg(long)]
        line: Option<u32>,
    },
    /// List all comments, oldest first.
    List,
}

/// Share link subcommands.
#[derive(clap::Subcommand, Debug)]
pub enum ShareAction {
    /// Emit a share URL for a code file.
    Create {
        /// File containing the code to share.
        file: PathBuf,
        /// Programming language.
        #[arg(long, short = 'l', default_value = "javascript")]
        language: String,
        /// Origin used to build the URL.
        #[arg(long, default_value = "https://codecritic.dev")]
        origin: String,
    },
    /// Decode a share token back into its snapshot.
    Decode {
        /// The token from a share URL.
        token: String,
    },
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Json,
}

impl OutputFormat {
    /// Render a result using the renderer for this format.
    pub fn render(&self, result: &codecritic::models::ReviewResult) -> String {
        use codecritic::output::OutputRenderer;
        match self {
            OutputFormat::Terminal => {
                codecritic::output::terminal::TerminalRenderer.render(result)
            }
            OutputFormat::Json => codecritic::output::json::JsonRenderer.render(result),
        }
    }
}
