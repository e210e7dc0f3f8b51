//! Persistence ports (traits) and in-memory implementations for tests/dev.

pub mod books;
pub mod table;
pub mod todos;
pub mod users;

pub use books::{Book, BookDraft, BookFilter, BookPatch, BookStore, InMemoryBookStore};
pub use table::SerialTable;
pub use todos::{InMemoryTodoStore, Todo, TodoDraft, TodoStore};
pub use users::{InMemoryUserStore, NewUser, User, UserStore};
