//! zendesk - command-line access to a Zendesk account
//!
//! Prints results as JSON lines on stdout; logs go to stderr.
//!
//! # Configuration
//!
//! Set the following environment variables (or use a `.env` file):
//!
//! - `ZENDESK_SUBDOMAIN`: account subdomain
//! - `ZENDESK_EMAIL`: agent email
//! - `ZENDESK_TOKEN`: API token
//!
//! # Usage
//!
//! ```bash
//! zendesk search "status:open priority:urgent" --limit 20
//! zendesk enriched 12345
//! zendesk enriched --search "status:pending" --limit 10
//! zendesk export user "role:agent"
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use futures::stream::BoxStream;
use futures::TryStreamExt;
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use zendesk_sdk::pagination::DEFAULT_PAGE_SIZE;
use zendesk_sdk::{Config, ZendeskClient, ZendeskError};

/// Command-line access to a Zendesk account
#[derive(Parser, Debug)]
#[command(name = "zendesk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Page size for paginated calls
    #[arg(long, global = true, default_value_t = DEFAULT_PAGE_SIZE)]
    per_page: u32,

    /// Maximum number of records to print
    #[arg(short, long, global = true)]
    limit: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check credentials and connectivity
    Check,

    /// Search tickets, users, organizations and groups
    Search {
        /// Zendesk search query
        query: String,
    },

    /// Tickets with their comments and users
    Enriched {
        /// Ticket ID
        #[arg(conflicts_with = "search", required_unless_present = "search")]
        ticket_id: Option<u64>,

        /// Enrich every ticket matching this search query instead
        #[arg(long)]
        search: Option<String>,
    },

    /// Export every matching record, past the search result window
    Export {
        /// Record type
        #[arg(value_enum)]
        kind: ExportKind,

        /// Zendesk search query (defaults to everything)
        #[arg(default_value = "")]
        query: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExportKind {
    Ticket,
    User,
    Organization,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore errors if not found)
    dotenvy::dotenv().ok();

    // stdout carries command output only
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("zendesk_sdk=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::debug!(endpoint = %config.endpoint(), "Configuration loaded");

    let client = ZendeskClient::new(&config).context("Failed to create Zendesk client")?;

    match cli.command {
        Command::Check => {
            client
                .test_connection()
                .await
                .context("Connection test failed")?;
            println!("{}", serde_json::json!({"status": "ok", "endpoint": config.endpoint()}));
        }
        Command::Search { query } => {
            let mut paginator = client.search.all(query, cli.per_page);
            if let Some(limit) = cli.limit {
                paginator = paginator.with_limit(limit);
            }
            print_stream(paginator.iterate()).await?;
        }
        Command::Enriched {
            ticket_id: Some(id),
            ..
        } => {
            let enriched = client
                .tickets
                .get_enriched(id)
                .await
                .with_context(|| format!("Failed to enrich ticket {}", id))?;
            print_line(&enriched)?;
        }
        Command::Enriched {
            search: Some(query),
            ..
        } => {
            print_stream(client.tickets.search_enriched(query, cli.per_page, cli.limit)).await?;
        }
        Command::Enriched { .. } => bail!("either a ticket ID or --search is required"),
        Command::Export { kind, query } => {
            let search = &client.search;
            match kind {
                ExportKind::Ticket => {
                    print_stream(limited(search.export_tickets(query, cli.per_page), cli.limit)).await?
                }
                ExportKind::User => {
                    print_stream(limited(search.export_users(query, cli.per_page), cli.limit)).await?
                }
                ExportKind::Organization => {
                    print_stream(limited(
                        search.export_organizations(query, cli.per_page),
                        cli.limit,
                    ))
                    .await?
                }
            }
        }
    }

    Ok(())
}

fn limited<T>(
    paginator: zendesk_sdk::ExportCursorPaginator<T>,
    limit: Option<usize>,
) -> BoxStream<'static, Result<T, ZendeskError>>
where
    T: serde::de::DeserializeOwned + Send + 'static,
{
    match limit {
        Some(limit) => paginator.with_limit(limit).iterate(),
        None => paginator.iterate(),
    }
}

async fn print_stream<T: Serialize>(
    mut stream: BoxStream<'static, Result<T, ZendeskError>>,
) -> Result<()> {
    let mut printed = 0usize;
    while let Some(item) = stream.try_next().await.context("Request failed")? {
        print_line(&item)?;
        printed += 1;
    }
    tracing::info!(records = printed, "Done");
    Ok(())
}

fn print_line<T: Serialize>(item: &T) -> Result<()> {
    println!("{}", serde_json::to_string(item).context("Failed to encode record")?);
    Ok(())
}
