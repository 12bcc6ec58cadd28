//! Author CLI commands.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use catalog_core::catalog::{AuthorUpdate, NewAuthor};

use super::OutputFormat;
use crate::output::{format_output, pretty};
use crate::state::Catalog;

/// Author management commands.
#[derive(Debug, Parser)]
pub struct AuthorsCommand {
    #[command(subcommand)]
    pub action: AuthorsAction,
}

/// Available author actions.
#[derive(Debug, Subcommand)]
pub enum AuthorsAction {
    /// List all authors.
    List,
    /// Get author by ID.
    Get {
        /// Author ID.
        id: i64,
    },
    /// Get an author together with its books.
    Books {
        /// Author ID.
        id: i64,
    },
    /// Create a new author.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        bio: String,
        /// Birth date (YYYY-MM-DD).
        #[arg(long)]
        birth_date: NaiveDate,
    },
    /// Update an author. Omitted fields keep their value.
    Update {
        /// Author ID.
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        /// Birth date (YYYY-MM-DD).
        #[arg(long)]
        birth_date: Option<NaiveDate>,
    },
    /// Delete an author and its books.
    Delete {
        /// Author ID.
        id: i64,
    },
}

pub async fn run(
    action: AuthorsAction,
    catalog: &Catalog,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<Option<String>> {
    let output = match action {
        AuthorsAction::List => {
            let authors = catalog.authors.get_all().await?;
            match format {
                OutputFormat::Json => format_output(&authors, format),
                OutputFormat::Pretty => pretty::format_authors(&authors),
            }
        }
        AuthorsAction::Get { id } => {
            let author = catalog.authors.get(id).await?;
            match format {
                OutputFormat::Json => format_output(&author, format),
                OutputFormat::Pretty => pretty::format_author(&author),
            }
        }
        AuthorsAction::Books { id } => {
            let joined = catalog.authors.get_with_books(id).await?;
            match format {
                OutputFormat::Json => format_output(&joined, format),
                OutputFormat::Pretty => pretty::format_author_with_books(&joined),
            }
        }
        AuthorsAction::Create {
            name,
            bio,
            birth_date,
        } => {
            let author = catalog
                .authors
                .create(&NewAuthor::new(name, bio, birth_date))
                .await?;
            match format {
                OutputFormat::Json => format_output(&author, format),
                OutputFormat::Pretty => format!("Created:\n{}", pretty::format_author(&author)),
            }
        }
        AuthorsAction::Update {
            id,
            name,
            bio,
            birth_date,
        } => {
            let changes = AuthorUpdate {
                name,
                bio,
                birth_date,
            };
            let author = catalog.authors.update(id, &changes).await?;
            match format {
                OutputFormat::Json => format_output(&author, format),
                OutputFormat::Pretty => format!("Updated:\n{}", pretty::format_author(&author)),
            }
        }
        AuthorsAction::Delete { id } => {
            catalog.authors.delete(id).await?;
            if quiet {
                return Ok(None);
            }
            format!("Deleted author {}", id)
        }
    };

    Ok(Some(output))
}
