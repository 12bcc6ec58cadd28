//! Book CLI commands.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use catalog_core::catalog::{BookUpdate, NewBook};

use super::OutputFormat;
use crate::output::{format_output, pretty};
use crate::state::Catalog;

/// Book management commands.
#[derive(Debug, Parser)]
pub struct BooksCommand {
    #[command(subcommand)]
    pub action: BooksAction,
}

/// Available book actions.
#[derive(Debug, Subcommand)]
pub enum BooksAction {
    /// List all books.
    List,
    /// Get book by ID.
    Get {
        /// Book ID.
        id: i64,
    },
    /// Create a new book.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Publish date (YYYY-MM-DD).
        #[arg(long)]
        publish_date: NaiveDate,
        /// Owning author ID.
        #[arg(long)]
        author_id: i64,
    },
    /// Update a book. Omitted fields keep their value.
    Update {
        /// Book ID.
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Publish date (YYYY-MM-DD).
        #[arg(long)]
        publish_date: Option<NaiveDate>,
        /// Move the book to another author.
        #[arg(long)]
        author_id: Option<i64>,
    },
    /// Delete book by ID.
    Delete {
        /// Book ID.
        id: i64,
    },
}

pub async fn run(
    action: BooksAction,
    catalog: &Catalog,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<Option<String>> {
    let output = match action {
        BooksAction::List => {
            let books = catalog.books.get_all().await?;
            match format {
                OutputFormat::Json => format_output(&books, format),
                OutputFormat::Pretty => pretty::format_books(&books),
            }
        }
        BooksAction::Get { id } => {
            let book = catalog.books.get(id).await?;
            match format {
                OutputFormat::Json => format_output(&book, format),
                OutputFormat::Pretty => pretty::format_book(&book),
            }
        }
        BooksAction::Create {
            title,
            description,
            publish_date,
            author_id,
        } => {
            let book = catalog
                .books
                .create(&NewBook::new(title, description, publish_date, author_id))
                .await?;
            match format {
                OutputFormat::Json => format_output(&book, format),
                OutputFormat::Pretty => format!("Created:\n{}", pretty::format_book(&book)),
            }
        }
        BooksAction::Update {
            id,
            title,
            description,
            publish_date,
            author_id,
        } => {
            let changes = BookUpdate {
                title,
                description,
                publish_date,
                author_id,
            };
            let book = catalog.books.update(id, &changes).await?;
            match format {
                OutputFormat::Json => format_output(&book, format),
                OutputFormat::Pretty => format!("Updated:\n{}", pretty::format_book(&book)),
            }
        }
        BooksAction::Delete { id } => {
            catalog.books.delete(id).await?;
            if quiet {
                return Ok(None);
            }
            format!("Deleted book {}", id)
        }
    };

    Ok(Some(output))
}
