//! SQLite row conversion functions.
//!
//! Dates are stored as `YYYY-MM-DD` text, timestamps as RFC 3339 text.

use catalog_core::catalog::{Author, Book};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;

/// Convert a SQLite row to an Author.
///
/// Expected columns: id, name, bio, birth_date, created_at, updated_at
pub fn row_to_author(row: &Row) -> rusqlite::Result<Author> {
    let birth_date: String = row.get(3)?;
    let created_at: String = row.get(4)?;
    let updated_at: String = row.get(5)?;

    Ok(Author {
        id: row.get(0)?,
        name: row.get(1)?,
        bio: row.get(2)?,
        birth_date: parse_date(3, &birth_date)?,
        created_at: parse_datetime(4, &created_at)?,
        updated_at: parse_datetime(5, &updated_at)?,
    })
}

/// Convert a SQLite row to a Book.
///
/// Expected columns: id, title, description, publish_date, author_id, created_at, updated_at
pub fn row_to_book(row: &Row) -> rusqlite::Result<Book> {
    let publish_date: String = row.get(3)?;
    let created_at: String = row.get(5)?;
    let updated_at: String = row.get(6)?;

    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        publish_date: parse_date(3, &publish_date)?,
        author_id: row.get(4)?,
        created_at: parse_datetime(5, &created_at)?,
        updated_at: parse_datetime(6, &updated_at)?,
    })
}

fn parse_date(column: usize, s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_datetime(column: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

/// Format a DateTime<Utc> for SQLite storage (RFC 3339).
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// Format a NaiveDate for SQLite storage (YYYY-MM-DD).
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        assert_eq!(format_date(&date), "1990-01-01");
    }

    #[test]
    fn test_format_datetime_is_rfc3339() {
        let dt = DateTime::parse_from_rfc3339("2024-06-15T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let formatted = format_datetime(&dt);

        assert!(formatted.starts_with("2024-06-15T10:30:00"));
        assert_eq!(parse_datetime(0, &formatted).unwrap(), dt);
    }

    #[test]
    fn test_parse_date_valid() {
        assert_eq!(
            parse_date(0, "2024-06-21").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 21).unwrap()
        );
    }

    #[test]
    fn test_parse_date_reports_column() {
        let err = parse_date(3, "21/06/2024").unwrap_err();

        assert!(matches!(
            err,
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, _)
        ));
    }

    #[test]
    fn test_parse_datetime_invalid() {
        assert!(parse_datetime(4, "yesterday").is_err());
    }

    #[test]
    fn test_row_to_book() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let book = conn
            .query_row(
                "SELECT 7, 'X', 'About X', '2024-06-21', 1, \
                 '2024-06-15T10:30:00+00:00', '2024-06-16T10:30:00+00:00'",
                [],
                row_to_book,
            )
            .unwrap();

        assert_eq!(book.id, 7);
        assert_eq!(book.title, "X");
        assert_eq!(book.author_id, 1);
        assert_eq!(
            book.publish_date,
            NaiveDate::from_ymd_opt(2024, 6, 21).unwrap()
        );
        assert!(book.updated_at > book.created_at);
    }

    #[test]
    fn test_row_to_author_rejects_bad_date() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let result = conn.query_row(
            "SELECT 1, 'Jane', 'Novelist', 'not-a-date', \
             '2024-06-15T10:30:00+00:00', '2024-06-15T10:30:00+00:00'",
            [],
            row_to_author,
        );

        assert!(result.is_err());
    }
}
