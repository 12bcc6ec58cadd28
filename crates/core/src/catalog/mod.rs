mod error;
mod requests;
mod types;

pub use error::{CatalogError, Result, WriteOperation};
pub use requests::{AuthorUpdate, BookUpdate, NewAuthor, NewBook};
pub use types::{Author, AuthorWithBooks, Book, BookRevision, AUTHOR, BOOK};
