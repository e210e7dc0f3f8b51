use async_trait::async_trait;
use serde::Serialize;

use shelfmate_core::{BookId, StoreResult};

use super::SerialTable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub category: String,
}

/// Partial update: `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
}

impl BookPatch {
    fn apply(self, book: &mut Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(author) = self.author {
            book.author = author;
        }
        if let Some(category) = self.category {
            book.category = category;
        }
    }
}

/// Case-insensitive listing filter; unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub category: Option<String>,
    pub author: Option<String>,
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        fn same(wanted: Option<&String>, actual: &str) -> bool {
            wanted.is_none_or(|w| w.to_lowercase() == actual.to_lowercase())
        }
        same(self.category.as_ref(), &book.category) && same(self.author.as_ref(), &book.author)
    }
}

/// Book catalog persistence port.
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn list(&self, filter: &BookFilter) -> StoreResult<Vec<Book>>;
    async fn get(&self, id: BookId) -> StoreResult<Option<Book>>;
    async fn insert(&self, draft: BookDraft) -> StoreResult<Book>;
    async fn update(&self, id: BookId, patch: BookPatch) -> StoreResult<Option<Book>>;
    async fn delete(&self, id: BookId) -> StoreResult<bool>;
}

#[derive(Debug, Default)]
pub struct InMemoryBookStore {
    table: SerialTable<Book>,
}

impl InMemoryBookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog preloaded with a handful of sample titles.
    pub fn seeded() -> StoreResult<Self> {
        let store = Self::new();
        for (title, author, category) in [
            ("Title One", "Author One", "science"),
            ("Title Two", "Author Two", "science"),
            ("Title Three", "Author Three", "history"),
            ("Title Four", "Author Four", "math"),
            ("Title Five", "Author Five", "math"),
            ("Title Six", "Author Two", "math"),
        ] {
            store.table.insert_with(
                |_| Ok(()),
                |id| Book {
                    id: BookId::new(id),
                    title: title.to_string(),
                    author: author.to_string(),
                    category: category.to_string(),
                },
            )?;
        }
        Ok(store)
    }
}

#[async_trait]
impl BookStore for InMemoryBookStore {
    async fn list(&self, filter: &BookFilter) -> StoreResult<Vec<Book>> {
        self.table.filter(|b| filter.matches(b))
    }

    async fn get(&self, id: BookId) -> StoreResult<Option<Book>> {
        self.table.get(id.get())
    }

    async fn insert(&self, draft: BookDraft) -> StoreResult<Book> {
        self.table.insert_with(
            |_| Ok(()),
            |id| Book {
                id: BookId::new(id),
                title: draft.title,
                author: draft.author,
                category: draft.category,
            },
        )
    }

    async fn update(&self, id: BookId, patch: BookPatch) -> StoreResult<Option<Book>> {
        self.table.update(id.get(), |_| true, |b| patch.apply(b))
    }

    async fn delete(&self, id: BookId) -> StoreResult<bool> {
        self.table.remove(id.get(), |_| true)
    }
}
