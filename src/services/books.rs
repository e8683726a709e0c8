//! Book management service

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookFilter, BookPayload, BookSummary},
    repository::Repository,
};

/// URL-safe alphabet used for book ids
const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Source of fresh book identifiers
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random ids drawn from a 64-symbol URL-safe alphabet
#[derive(Debug, Clone)]
pub struct NanoIdGenerator {
    length: usize,
}

impl NanoIdGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl IdGenerator for NanoIdGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..self.length)
            .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect()
    }
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Which operation a payload is validated for; selects the failure wording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BookAction {
    Add,
    Update,
}

impl BookAction {
    fn failure(self) -> &'static str {
        match self {
            BookAction::Add => "Failed to add book",
            BookAction::Update => "Failed to update book",
        }
    }
}

/// Check a create/update payload and hand back the book name.
///
/// Only an absent name is rejected; an empty string or null is kept as sent.
fn validate(payload: &BookPayload, action: BookAction) -> AppResult<Option<String>> {
    let name = payload.name.clone().ok_or_else(|| {
        AppError::MissingField(format!("{}. Please provide the book name", action.failure()))
    })?;

    if payload.read_page_exceeds_page_count() {
        return Err(AppError::InvalidRange(format!(
            "{}. readPage must not be greater than pageCount",
            action.failure()
        )));
    }

    Ok(name)
}

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl BooksService {
    pub fn new(repository: Repository, id_length: usize) -> Self {
        Self::with_parts(
            repository,
            Arc::new(NanoIdGenerator::new(id_length)),
            Arc::new(SystemClock),
        )
    }

    pub fn with_parts(
        repository: Repository,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            ids,
            clock,
        }
    }

    /// Validate and store a new book, returning its id
    pub async fn create(&self, payload: BookPayload) -> AppResult<String> {
        let name = validate(&payload, BookAction::Add).map_err(|e| {
            tracing::debug!("Book creation rejected: {}", e);
            e
        })?;

        let id = self.ids.generate();
        let book = Book::from_payload(id.clone(), name, payload, self.clock.now());

        let mut books = self.repository.books.write().await;
        books.append(book);

        if books.find_index_by_id(&id).is_none() {
            return Err(AppError::InsertionFailure(
                BookAction::Add.failure().to_string(),
            ));
        }

        tracing::info!("Book created id={} total={}", id, books.all().len());
        Ok(id)
    }

    /// List summaries of the books matching every present filter
    pub async fn list(&self, filter: &BookFilter) -> AppResult<Vec<BookSummary>> {
        let books = self.repository.books.read().await;
        let summaries: Vec<BookSummary> = books
            .all()
            .iter()
            .filter(|book| filter.matches(book))
            .map(Book::to_summary)
            .collect();

        tracing::debug!(
            "Listed {} of {} books (filter: {:?})",
            summaries.len(),
            books.all().len(),
            filter
        );
        Ok(summaries)
    }

    /// Get the full record of a book
    pub async fn get_by_id(&self, id: &str) -> AppResult<Book> {
        let books = self.repository.books.read().await;
        books
            .find_index_by_id(id)
            .and_then(|index| books.get(index))
            .cloned()
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    /// Replace every mutable field of a book
    pub async fn update(&self, id: &str, payload: BookPayload) -> AppResult<Book> {
        let name = validate(&payload, BookAction::Update).map_err(|e| {
            tracing::debug!("Book update rejected id={}: {}", id, e);
            e
        })?;

        let not_found =
            || AppError::NotFound(format!("{}. Id not found", BookAction::Update.failure()));

        let mut books = self.repository.books.write().await;
        let index = books.find_index_by_id(id).ok_or_else(not_found)?;
        let updated = books
            .get(index)
            .ok_or_else(not_found)?
            .replaced_with(name, payload, self.clock.now());

        books.replace_at(index, updated.clone());

        tracing::info!("Book updated id={}", id);
        Ok(updated)
    }

    /// Remove a book, returning the removed record
    pub async fn delete(&self, id: &str) -> AppResult<Book> {
        let not_found = || AppError::NotFound("Failed to delete book. Id not found".to_string());

        let mut books = self.repository.books.write().await;
        let index = books.find_index_by_id(id).ok_or_else(not_found)?;
        let removed = books.remove_at(index).ok_or_else(not_found)?;

        tracing::info!("Book deleted id={} remaining={}", id, books.all().len());
        Ok(removed)
    }

    pub async fn count(&self) -> usize {
        self.repository.books.len().await
    }
}
