//! codecritic — AI-assisted code review CLI.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use codecritic::analytics;
use codecritic::api;
use codecritic::comments;
use codecritic::config;
use codecritic::constants;
use codecritic::env;
use codecritic::models;
use codecritic::session;
use codecritic::share;
use codecritic::snippets;
use codecritic::store;

use std::io::{BufRead, Write};
use std::path::Path;
use std::process;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;

use api::http::HttpApi;
use api::{ReviewApi, VerifyOutcome};
use cli::args::{
    Cli, Command, CommentsAction, HistoryAction, OutputFormat, ReviewArgs, ShareAction,
    SnippetsAction,
};
use comments::CommentThread;
use config::Config;
use env::Env;
use session::{ReviewSession, SubmitOutcome};
use snippets::SnippetCatalog;
use store::FileStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Review(args) => run_review(args).await,
        Command::History { action } => run_history(action).await,
        Command::Snippets { action } => run_snippets(action),
        Command::Comments { action } => run_comments(action),
        Command::Share { action } => run_share(action).await,
        Command::VerifyEmail { token, resend } => run_verify_email(token.as_deref(), resend).await,
        Command::Version => run_version(),
    }
}

/// Print version information.
fn run_version() -> Result<()> {
    use colored::Colorize;
    println!("{} {}", "codecritic".bold(), constants::VERSION.green().bold());
    Ok(())
}

fn load_config() -> Result<Config> {
    let cwd = std::env::current_dir().ok();
    Config::load(cwd.as_deref(), &Env::real()).context("failed to load configuration")
}

fn build_api(config: &Config) -> Result<Arc<dyn ReviewApi>> {
    let api = HttpApi::new(&config.api.base_url, config.api.auth_token.clone())
        .context("failed to build API client")?;
    Ok(Arc::new(api))
}

/// Read code from a file argument, or stdin when absent or `-`.
fn read_code_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut code = String::new();
            std::io::Read::read_to_string(&mut std::io::stdin(), &mut code)
                .context("failed to read code from stdin")?;
            Ok(code)
        }
    }
}

async fn run_review(args: ReviewArgs) -> Result<()> {
    args.validate_language().map_err(|e| anyhow::anyhow!(e))?;
    let code = read_code_input(args.file.as_deref())?;

    let config = load_config()?;
    let api = build_api(&config)?;

    if args.format == OutputFormat::Terminal {
        cli::print_banner();
    }

    let mut session = ReviewSession::new(
        Arc::clone(&api),
        &args.language,
        config.chat.context_window,
    );
    session.set_code(&code);

    match session.submit_review().await {
        Ok(SubmitOutcome::Installed) => {}
        Ok(SubmitOutcome::Stale) => bail!("review was superseded by a newer submission"),
        Err(err) => bail!("{}", err.user_message()),
    }

    let result = session.result().context("review produced no result")?;
    print!("{}", args.format.render(result));

    if args.save {
        let result = result.clone();
        if let Err(err) = api.save_history(session.code(), &args.language, &result).await {
            eprintln!("Warning: failed to save review to history: {}", err.user_message());
        }
    }

    if args.chat {
        run_chat_loop(&mut session).await?;
    }

    Ok(())
}

/// Interactive follow-up chat. Empty lines are skipped; `exit` leaves;
/// `apply <n>` takes the n-th refactoring suggestion.
async fn run_chat_loop(session: &mut ReviewSession) -> Result<()> {
    use colored::Colorize;

    if let Some(chat) = session.chat() {
        if let Some(welcome) = chat.conversation().first() {
            println!("\n{}\n", welcome.content.dimmed());
        }
    }
    println!(
        "{}",
        "Ask about the review, `apply <n>` to take a refactoring suggestion, or `exit`.".dimmed()
    );

    let stdin = std::io::stdin();
    loop {
        print!("{} ", ">".cyan().bold());
        std::io::stdout().flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text == "exit" || text == "quit" {
            break;
        }
        if text == "apply" || text.starts_with("apply ") {
            apply_suggestion_command(session, text.trim_start_matches("apply").trim());
            continue;
        }

        match session.send_chat(text).await {
            Ok(reply) => println!("\n{reply}\n"),
            Err(err) => eprintln!("{err}"),
        }
    }
    Ok(())
}

/// Handle `apply <n>` in the chat loop: swap the session code for the
/// n-th (1-based, default first) refactoring suggestion's improved code.
fn apply_suggestion_command(session: &mut ReviewSession, arg: &str) {
    let suggestions = match session.result() {
        Some(result) => result.refactoring_suggestions.clone(),
        None => Vec::new(),
    };
    if suggestions.is_empty() {
        eprintln!("This review has no refactoring suggestions to apply.");
        return;
    }

    let index = if arg.is_empty() {
        1
    } else {
        match arg.parse::<usize>() {
            Ok(n) => n,
            Err(_) => {
                eprintln!("Usage: apply <n>");
                return;
            }
        }
    };
    let Some(suggestion) = index.checked_sub(1).and_then(|i| suggestions.get(i)) else {
        eprintln!(
            "No suggestion {index}; this review has {}.",
            suggestions.len()
        );
        return;
    };

    session.apply_improvement(suggestion);
    println!("\nApplied suggestion {index} ({}). Updated code:", suggestion.description);
    println!("{}\n", session.code());
}

async fn run_history(action: HistoryAction) -> Result<()> {
    use colored::Colorize;

    let config = load_config()?;
    let api = build_api(&config)?;

    match action {
        HistoryAction::List => {
            let records = api
                .list_history()
                .await
                .map_err(|e| anyhow::anyhow!("{}", e.user_message()))?;
            if records.is_empty() {
                println!("No saved reviews.");
                return Ok(());
            }
            for record in &records {
                println!(
                    "  {}  {}  {}  {}/100",
                    record.id.dimmed(),
                    record.timestamp.format("%Y-%m-%d %H:%M"),
                    record.language.bold(),
                    record.result.overall_score,
                );
                println!("     {}", record.result.summary.dimmed());
            }
        }
        HistoryAction::Stats => {
            let records = api
                .list_history()
                .await
                .map_err(|e| anyhow::anyhow!("{}", e.user_message()))?;
            println!("  {}  {}", "Reviews:".cyan(), records.len());
            println!(
                "  {}  {}",
                "Average score:".cyan(),
                analytics::average_score(&records)
            );
            println!("  {}  {}", "Trend:".cyan(), analytics::trend(&records));
        }
        HistoryAction::Export => {
            let records = api
                .list_history()
                .await
                .map_err(|e| anyhow::anyhow!("{}", e.user_message()))?;
            println!(
                "{}",
                serde_json::to_string_pretty(&records).context("failed to serialize history")?
            );
        }
        HistoryAction::Clear => {
            api.clear_history()
                .await
                .map_err(|e| anyhow::anyhow!("{}", e.user_message()))?;
            println!("History cleared.");
        }
    }
    Ok(())
}

fn open_catalog() -> Result<SnippetCatalog> {
    SnippetCatalog::load(FileStore::new("snippets")).context("failed to load snippet library")
}

fn print_snippet(snippet: &models::Snippet) {
    use colored::Colorize;
    let star = if snippet.is_favorite { "★".yellow().to_string() } else { " ".to_string() };
    println!(
        "  {star} {}  {}  {} use(s)",
        snippet.id.dimmed(),
        snippet.title.bold(),
        snippet.usage_count,
    );
    if !snippet.description.is_empty() {
        println!("       {}", snippet.description.dimmed());
    }
    if !snippet.tags.is_empty() {
        println!("       {}  {}", "tags:".cyan(), snippet.tags.join(", "));
    }
}

fn run_snippets(action: SnippetsAction) -> Result<()> {
    let mut catalog = open_catalog()?;

    match action {
        SnippetsAction::Add {
            file,
            title,
            language,
            description,
            fixes,
            tags,
        } => {
            let code = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let snippet = catalog.add(models::NewSnippet {
                title,
                code,
                language,
                tags,
                description,
                fixes,
                is_favorite: false,
            })?;
            println!("Added snippet {}.", snippet.id);
        }
        SnippetsAction::List => {
            if catalog.is_empty() {
                println!("No snippets saved.");
                return Ok(());
            }
            for snippet in catalog.all() {
                print_snippet(snippet);
            }
        }
        SnippetsAction::Search { query, tag } => {
            let hits = catalog.search(&query, &tag);
            if hits.is_empty() {
                println!("No matching snippets.");
                return Ok(());
            }
            for snippet in hits {
                print_snippet(snippet);
            }
        }
        SnippetsAction::Remove { id } => {
            catalog.remove(&id)?;
            println!("Removed snippet {id}.");
        }
        SnippetsAction::Favorite { id } => {
            let now = catalog.toggle_favorite(&id)?;
            println!(
                "Snippet {id} is {} a favorite.",
                if now { "now" } else { "no longer" }
            );
        }
        SnippetsAction::Copy { id } => {
            let code = catalog
                .get(&id)
                .map(|s| s.code.clone())
                .ok_or_else(|| anyhow::anyhow!("no snippet with id {id}"))?;
            catalog.record_usage(&id)?;
            print!("{code}");
        }
        SnippetsAction::Suggest { file, language } => {
            let code = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let suggestions = catalog.suggest(&code, &language);
            if suggestions.is_empty() {
                println!("No suggestions for this code.");
                return Ok(());
            }
            for snippet in suggestions {
                print_snippet(snippet);
            }
        }
    }
    Ok(())
}

fn run_comments(action: CommentsAction) -> Result<()> {
    use colored::Colorize;

    let mut thread = CommentThread::load(FileStore::new("comments"))
        .context("failed to load comment thread")?;

    match action {
        CommentsAction::Add { author, text, line } => {
            let comment = thread.add(&author, &text, line)?;
            println!("Added comment {}.", comment.id);
        }
        CommentsAction::List => {
            if thread.is_empty() {
                println!("No comments.");
                return Ok(());
            }
            for comment in thread.all() {
                let location = comment
                    .line
                    .map(|n| format!(" (line {n})"))
                    .unwrap_or_default();
                println!(
                    "  {}  {}{}",
                    comment.timestamp.format("%Y-%m-%d %H:%M"),
                    comment.author.bold(),
                    location.dimmed(),
                );
                println!("     {}", comment.text);
            }
        }
    }
    Ok(())
}

async fn run_share(action: ShareAction) -> Result<()> {
    match action {
        ShareAction::Create {
            file,
            language,
            origin,
        } => {
            let code = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let snapshot = share::ShareSnapshot::new(code, language, None);
            let token = share::encode(&snapshot);
            println!("{}", share::share_url(&origin, &token));
        }
        ShareAction::Decode { token } => {
            let snapshot = share::decode(&token).context("invalid share token")?;
            println!(
                "{}",
                serde_json::to_string_pretty(&snapshot).context("failed to render snapshot")?
            );
        }
    }
    Ok(())
}

async fn run_verify_email(token: Option<&str>, resend: bool) -> Result<()> {
    use colored::Colorize;

    let config = load_config()?;
    let api = build_api(&config)?;

    if resend {
        api.resend_verification()
            .await
            .map_err(|e| anyhow::anyhow!("{}", e.user_message()))?;
        println!(
            "  {} Verification email sent. Check your inbox.",
            "✔".green().bold()
        );
        return Ok(());
    }

    let token = token.context("a verification token is required")?;
    match api.verify_email(token).await {
        Ok(VerifyOutcome::Verified) => {
            println!("  {} Email verified. You're all set.", "✔".green().bold());
        }
        Ok(VerifyOutcome::AlreadyVerified { detail }) => {
            let message =
                detail.unwrap_or_else(|| "This email was already verified.".to_string());
            println!("  {} {message}", "✔".green().bold());
        }
        Err(err) => bail!("{}", err.user_message()),
    }
    Ok(())
}
