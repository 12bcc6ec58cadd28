//! Hand-written gateways for service tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use catalog_core::cache::{self, Cache, CacheError};
use catalog_core::catalog::{
    Author, AuthorUpdate, AuthorWithBooks, Book, BookRevision, BookUpdate, NewAuthor, NewBook,
    AUTHOR, BOOK,
};
use catalog_core::storage::{self, AuthorRepository, BookRepository, RepositoryError};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

type WriteHook = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct Rows {
    authors: BTreeMap<i64, Author>,
    books: BTreeMap<i64, Book>,
    last_author_id: i64,
    last_book_id: i64,
}

/// Store that counts calls and fails on demand.
#[derive(Default)]
pub struct MockStore {
    rows: Mutex<Rows>,
    reads: AtomicUsize,
    writes: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    before_next_write: Mutex<Option<WriteHook>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an author without counting a write.
    pub fn seed_author(&self, name: &str) -> Author {
        let mut rows = self.rows.lock().unwrap();
        rows.last_author_id += 1;
        let author = NewAuthor::new(name, "Novelist", date(1990, 1, 1))
            .into_author(rows.last_author_id, Utc::now());
        rows.authors.insert(author.id, author.clone());
        author
    }

    /// Inserts a book without counting a write.
    pub fn seed_book(&self, title: &str, author_id: i64) -> Book {
        let mut rows = self.rows.lock().unwrap();
        rows.last_book_id += 1;
        let book = NewBook::new(title, "About it", date(2024, 6, 21), author_id)
            .into_book(rows.last_book_id, Utc::now());
        rows.books.insert(book.id, book.clone());
        book
    }

    /// Moves a book to another author without counting a write.
    pub fn move_book(&self, book_id: i64, author_id: i64) {
        let mut rows = self.rows.lock().unwrap();
        if let Some(book) = rows.books.get_mut(&book_id) {
            book.author_id = author_id;
        }
    }

    /// Runs `hook` once, right before the next write touches the rows.
    ///
    /// Stands in for another writer committing between a service's own
    /// reads and its write.
    pub fn before_next_write(&self, hook: impl FnOnce() + Send + 'static) {
        *self.before_next_write.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn read(&self) -> storage::Result<std::sync::MutexGuard<'_, Rows>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RepositoryError::ConnectionFailed("store offline".to_string()));
        }
        Ok(self.rows.lock().unwrap())
    }

    fn write(&self) -> storage::Result<std::sync::MutexGuard<'_, Rows>> {
        let hook = self.before_next_write.lock().unwrap().take();
        if let Some(hook) = hook {
            hook();
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::QueryFailed("disk full".to_string()));
        }
        Ok(self.rows.lock().unwrap())
    }
}

#[async_trait]
impl AuthorRepository for MockStore {
    async fn get_authors(&self) -> storage::Result<Vec<Author>> {
        Ok(self.read()?.authors.values().cloned().collect())
    }

    async fn get_author(&self, id: i64) -> storage::Result<Option<Author>> {
        Ok(self.read()?.authors.get(&id).cloned())
    }

    async fn get_author_with_books(&self, id: i64) -> storage::Result<Option<AuthorWithBooks>> {
        let rows = self.read()?;
        Ok(rows.authors.get(&id).cloned().map(|author| {
            let books = rows
                .books
                .values()
                .filter(|b| b.author_id == id)
                .cloned()
                .collect();
            author.with_books(books)
        }))
    }

    async fn create_author(&self, author: &NewAuthor) -> storage::Result<Author> {
        let mut rows = self.write()?;
        rows.last_author_id += 1;
        let author = author.clone().into_author(rows.last_author_id, Utc::now());
        rows.authors.insert(author.id, author.clone());
        Ok(author)
    }

    async fn update_author(&self, id: i64, changes: &AuthorUpdate) -> storage::Result<Author> {
        let mut rows = self.write()?;
        let current = rows.authors.get(&id).cloned().ok_or(RepositoryError::NotFound {
            entity_type: AUTHOR,
            id,
        })?;
        let updated = changes.apply_to(current, Utc::now());
        rows.authors.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete_author(&self, id: i64) -> storage::Result<AuthorWithBooks> {
        let mut rows = self.write()?;
        let author = rows.authors.remove(&id).ok_or(RepositoryError::NotFound {
            entity_type: AUTHOR,
            id,
        })?;
        let books = rows
            .books
            .values()
            .filter(|b| b.author_id == id)
            .cloned()
            .collect();
        rows.books.retain(|_, b| b.author_id != id);
        Ok(author.with_books(books))
    }
}

#[async_trait]
impl BookRepository for MockStore {
    async fn get_books(&self) -> storage::Result<Vec<Book>> {
        Ok(self.read()?.books.values().cloned().collect())
    }

    async fn get_book(&self, id: i64) -> storage::Result<Option<Book>> {
        Ok(self.read()?.books.get(&id).cloned())
    }

    async fn create_book(&self, book: &NewBook) -> storage::Result<Book> {
        let mut rows = self.write()?;
        if !rows.authors.contains_key(&book.author_id) {
            return Err(RepositoryError::InvalidData("unknown author".to_string()));
        }
        rows.last_book_id += 1;
        let book = book.clone().into_book(rows.last_book_id, Utc::now());
        rows.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn update_book(&self, id: i64, changes: &BookUpdate) -> storage::Result<BookRevision> {
        let mut rows = self.write()?;
        let previous = rows.books.get(&id).cloned().ok_or(RepositoryError::NotFound {
            entity_type: BOOK,
            id,
        })?;
        let current = changes.apply_to(previous.clone(), Utc::now());
        rows.books.insert(id, current.clone());
        Ok(BookRevision { previous, current })
    }

    async fn delete_book(&self, id: i64) -> storage::Result<Book> {
        let mut rows = self.write()?;
        rows.books.remove(&id).ok_or(RepositoryError::NotFound {
            entity_type: BOOK,
            id,
        })
    }
}

/// Cache that records TTLs and deletions, with switchable failures.
#[derive(Default)]
pub struct MockCache {
    entries: Mutex<HashMap<String, (Vec<u8>, Duration)>>,
    deleted: Mutex<Vec<String>>,
    failing_deletes: Mutex<Vec<String>>,
    offline: AtomicBool,
}

impl MockCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every operation fail with a connection error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Makes deleting `key` fail while other keys still succeed.
    pub fn fail_deletes_of(&self, key: &str) {
        self.failing_deletes.lock().unwrap().push(key.to_string());
    }

    /// Stores raw bytes, bypassing the payload codec.
    pub fn insert_raw(&self, key: &str, bytes: &[u8]) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (bytes.to_vec(), Duration::from_secs(60)));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().unwrap().contains_key(key)
    }

    pub fn recorded_ttl(&self, key: &str) -> Option<Duration> {
        self.entries.lock().unwrap().get(key).map(|(_, ttl)| *ttl)
    }

    /// Every key passed to `delete`, in call order.
    pub fn deleted_keys(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    fn check_online(&self) -> cache::Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(CacheError::ConnectionFailed("cache offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Cache for MockCache {
    async fn exists(&self, key: &str) -> cache::Result<bool> {
        self.check_online()?;
        Ok(self.contains(key))
    }

    async fn get(&self, key: &str) -> cache::Result<Option<Vec<u8>>> {
        self.check_online()?;
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(key)
            .map(|(bytes, _)| bytes.clone()))
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> cache::Result<()> {
        self.check_online()?;
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_vec(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> cache::Result<()> {
        self.deleted.lock().unwrap().push(key.to_string());
        self.check_online()?;
        if self.failing_deletes.lock().unwrap().iter().any(|k| k == key) {
            return Err(CacheError::OperationFailed(format!("cannot delete {key}")));
        }
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn ttl(&self, key: &str) -> cache::Result<Option<Duration>> {
        self.check_online()?;
        Ok(self.recorded_ttl(key))
    }
}
