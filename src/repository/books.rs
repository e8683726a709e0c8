//! Books repository (in-memory store)

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::book::Book;

/// Ordered, process-lifetime collection of books.
///
/// All access goes through [`BookStore::read`] or [`BookStore::write`]; a
/// lookup followed by a mutation must happen on the same write guard.
#[derive(Clone, Default)]
pub struct BookStore {
    books: Arc<RwLock<Vec<Book>>>,
}

impl BookStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> BooksReader<'_> {
        BooksReader(self.books.read().await)
    }

    pub async fn write(&self) -> BooksWriter<'_> {
        BooksWriter(self.books.write().await)
    }

    pub async fn len(&self) -> usize {
        self.books.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn position_of(books: &[Book], id: &str) -> Option<usize> {
    books.iter().position(|book| book.id == id)
}

/// Shared view of the store
pub struct BooksReader<'a>(RwLockReadGuard<'a, Vec<Book>>);

impl BooksReader<'_> {
    /// Live ordered sequence of records
    pub fn all(&self) -> &[Book] {
        &self.0
    }

    pub fn find_index_by_id(&self, id: &str) -> Option<usize> {
        position_of(&self.0, id)
    }

    pub fn get(&self, index: usize) -> Option<&Book> {
        self.0.get(index)
    }
}

/// Exclusive view of the store
pub struct BooksWriter<'a>(RwLockWriteGuard<'a, Vec<Book>>);

impl BooksWriter<'_> {
    pub fn all(&self) -> &[Book] {
        &self.0
    }

    pub fn find_index_by_id(&self, id: &str) -> Option<usize> {
        position_of(&self.0, id)
    }

    pub fn get(&self, index: usize) -> Option<&Book> {
        self.0.get(index)
    }

    /// Insert at the end. Ids are not checked for uniqueness here.
    pub fn append(&mut self, book: Book) {
        self.0.push(book);
    }

    /// Remove the record at `index`, shifting later records down
    pub fn remove_at(&mut self, index: usize) -> Option<Book> {
        (index < self.0.len()).then(|| self.0.remove(index))
    }

    /// Replace the record at `index`, returning the previous one
    pub fn replace_at(&mut self, index: usize, book: Book) -> Option<Book> {
        self.0
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, book))
    }
}
