//! Budget persistence port.
//!
//! The engine only talks to storage through [`BudgetStore`]. Every call is
//! scoped by owner: a budget owned by someone else behaves exactly like a
//! missing one.

use async_trait::async_trait;
use uuid::Uuid;

use crate::{Budget, BudgetFields, Category, CategoryFields, NewBudget, ResultEngine};

pub use sql::SqlBudgetStore;

mod sql;

#[async_trait]
pub trait BudgetStore: Send + Sync {
    /// Persist a new budget with no categories and return its identifier.
    async fn insert(&self, budget: &NewBudget) -> ResultEngine<Uuid>;

    async fn find_one(&self, owner_id: &str, budget_id: Uuid) -> ResultEngine<Option<Budget>>;

    async fn find_all_by_owner(&self, owner_id: &str) -> ResultEngine<Vec<Budget>>;

    /// Returns the number of deleted budgets (0 or 1).
    async fn delete(&self, owner_id: &str, budget_id: Uuid) -> ResultEngine<u64>;

    /// Returns `false` when no owned budget matched.
    async fn push_category(
        &self,
        owner_id: &str,
        budget_id: Uuid,
        category: &Category,
    ) -> ResultEngine<bool>;

    /// Returns `false` when nothing was removed.
    async fn pull_category(
        &self,
        owner_id: &str,
        budget_id: Uuid,
        category_id: Uuid,
    ) -> ResultEngine<bool>;

    async fn update_budget_fields(
        &self,
        owner_id: &str,
        budget_id: Uuid,
        fields: &BudgetFields,
    ) -> ResultEngine<bool>;

    async fn update_category_fields(
        &self,
        owner_id: &str,
        budget_id: Uuid,
        category_id: Uuid,
        fields: &CategoryFields,
    ) -> ResultEngine<bool>;
}
