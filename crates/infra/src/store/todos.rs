use async_trait::async_trait;
use serde::Serialize;

use shelfmate_core::{AccountId, StoreResult, TodoId};

use super::SerialTable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: String,
    pub priority: i64,
    pub complete: bool,
    pub owner_id: AccountId,
}

/// Writable fields of a todo (create and full replace).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoDraft {
    pub title: String,
    pub description: String,
    pub priority: i64,
    pub complete: bool,
}

/// Todo persistence port.
///
/// The `*_owned` methods only see rows belonging to `owner`; a row owned by
/// someone else behaves exactly like a missing one.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn list_owned(&self, owner: AccountId) -> StoreResult<Vec<Todo>>;
    async fn get_owned(&self, id: TodoId, owner: AccountId) -> StoreResult<Option<Todo>>;
    async fn insert(&self, owner: AccountId, draft: TodoDraft) -> StoreResult<Todo>;
    async fn replace_owned(
        &self,
        id: TodoId,
        owner: AccountId,
        draft: TodoDraft,
    ) -> StoreResult<Option<Todo>>;
    async fn delete_owned(&self, id: TodoId, owner: AccountId) -> StoreResult<bool>;

    /// Every row regardless of owner (admin views).
    async fn list_all(&self) -> StoreResult<Vec<Todo>>;
    async fn delete_any(&self, id: TodoId) -> StoreResult<bool>;
}

#[derive(Debug, Default)]
pub struct InMemoryTodoStore {
    table: SerialTable<Todo>,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    async fn list_owned(&self, owner: AccountId) -> StoreResult<Vec<Todo>> {
        self.table.filter(|t| t.owner_id == owner)
    }

    async fn get_owned(&self, id: TodoId, owner: AccountId) -> StoreResult<Option<Todo>> {
        Ok(self.table.get(id.get())?.filter(|t| t.owner_id == owner))
    }

    async fn insert(&self, owner: AccountId, draft: TodoDraft) -> StoreResult<Todo> {
        self.table.insert_with(
            |_| Ok(()),
            |id| Todo {
                id: TodoId::new(id),
                title: draft.title,
                description: draft.description,
                priority: draft.priority,
                complete: draft.complete,
                owner_id: owner,
            },
        )
    }

    async fn replace_owned(
        &self,
        id: TodoId,
        owner: AccountId,
        draft: TodoDraft,
    ) -> StoreResult<Option<Todo>> {
        self.table.update(
            id.get(),
            |t| t.owner_id == owner,
            |t| {
                t.title = draft.title;
                t.description = draft.description;
                t.priority = draft.priority;
                t.complete = draft.complete;
            },
        )
    }

    async fn delete_owned(&self, id: TodoId, owner: AccountId) -> StoreResult<bool> {
        self.table.remove(id.get(), |t| t.owner_id == owner)
    }

    async fn list_all(&self) -> StoreResult<Vec<Todo>> {
        self.table.filter(|_| true)
    }

    async fn delete_any(&self, id: TodoId) -> StoreResult<bool> {
        self.table.remove(id.get(), |_| true)
    }
}
