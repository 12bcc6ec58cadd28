//! Pretty output formatting.

use catalog_core::catalog::{Author, AuthorWithBooks, Book};

/// Format an author for display.
pub fn format_author(author: &Author) -> String {
    format!(
        "{}\n  ID: {}\n  Born: {}\n  Bio: {}",
        author.name, author.id, author.birth_date, author.bio
    )
}

/// Format authors for display.
pub fn format_authors(authors: &[Author]) -> String {
    if authors.is_empty() {
        return "No authors found.".to_string();
    }
    let mut output = format!("AUTHORS ({})\n", authors.len());
    output.push_str(&"-".repeat(40));
    for author in authors {
        output.push_str(&format!("\n{}", format_author(author)));
        output.push('\n');
    }
    output
}

/// Format a book for display.
pub fn format_book(book: &Book) -> String {
    let mut output = format!(
        "{}\n  ID: {}\n  Author: {}\n  Published: {}",
        book.title, book.id, book.author_id, book.publish_date
    );
    if !book.description.is_empty() {
        output.push_str(&format!("\n  Description: {}", book.description));
    }
    output
}

/// Format books for display.
pub fn format_books(books: &[Book]) -> String {
    if books.is_empty() {
        return "No books found.".to_string();
    }
    let mut output = format!("BOOKS ({})\n", books.len());
    output.push_str(&"-".repeat(40));
    for book in books {
        output.push_str(&format!("\n{}", format_book(book)));
        output.push('\n');
    }
    output
}

/// Format an author followed by its books.
pub fn format_author_with_books(joined: &AuthorWithBooks) -> String {
    format!(
        "{}\n\n{}",
        format_author(&joined.author),
        format_books(&joined.books)
    )
}
