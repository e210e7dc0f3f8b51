//! Infrastructure layer: persistence ports and their in-memory adapters.
//!
//! Handlers only see the traits in [`store`]; swapping the backing storage
//! does not touch authentication or error handling.

pub mod store;

pub use store::{
    BookStore, InMemoryBookStore, InMemoryTodoStore, InMemoryUserStore, TodoStore, UserStore,
};
