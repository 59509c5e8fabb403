use uuid::Uuid;

use crate::{
    Budget, Category, CategoryFields, CategoryPatch, EngineError, LimitCents, ResultEngine,
    util::require_name,
};

use super::Engine;

impl Engine {
    /// Add a category to a budget and return the refreshed budget.
    ///
    /// Names are unique inside a budget with an exact, case-sensitive match:
    /// `Groceries` and `groceries` can live side by side.
    pub async fn add_category(
        &self,
        user_id: &str,
        budget_id: Uuid,
        name: &str,
        limit_minor: i64,
    ) -> ResultEngine<Budget> {
        let budget = self.require_owned_budget(user_id, budget_id).await?;

        let name = require_name(name, "category")?;
        if budget.has_category_named(&name) {
            tracing::debug!(user_id, %budget_id, "duplicate category name");
            return Err(EngineError::Conflict(format!(
                "category '{name}' already present"
            )));
        }

        let category = Category::new(name, LimitCents::normalized(limit_minor));
        if !self
            .store
            .push_category(user_id, budget_id, &category)
            .await?
        {
            return Err(EngineError::KeyNotFound("budget not exists".to_string()));
        }
        tracing::info!(user_id, %budget_id, category_id = %category.id, "category added");

        self.require_budget(user_id, budget_id).await
    }

    /// Apply a partial update to a category and return the refreshed budget.
    ///
    /// A new name is not checked against sibling categories.
    pub async fn update_category(
        &self,
        user_id: &str,
        budget_id: Uuid,
        category_id: Uuid,
        patch: CategoryPatch,
    ) -> ResultEngine<Budget> {
        if patch.is_empty() {
            return Err(EngineError::Validation(
                "provide at least one of name or limit".to_string(),
            ));
        }
        let budget = self.require_owned_budget(user_id, budget_id).await?;
        let current = budget
            .category(category_id)
            .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))?;

        let fields = CategoryFields {
            name: match patch.name.as_deref() {
                Some(name) => require_name(name, "category")?,
                None => current.name.clone(),
            },
            limit: patch
                .limit_minor
                .map_or(current.limit, LimitCents::normalized),
        };

        if !self
            .store
            .update_category_fields(user_id, budget_id, category_id, &fields)
            .await?
        {
            return Err(EngineError::KeyNotFound("category not exists".to_string()));
        }
        tracing::info!(user_id, %budget_id, %category_id, "category updated");

        self.require_budget(user_id, budget_id).await
    }

    /// Remove a category from a budget.
    pub async fn delete_category(
        &self,
        user_id: &str,
        budget_id: Uuid,
        category_id: Uuid,
    ) -> ResultEngine<()> {
        let budget = self.require_owned_budget(user_id, budget_id).await?;
        if budget.category(category_id).is_none() {
            return Err(EngineError::KeyNotFound("category not exists".to_string()));
        }

        if !self
            .store
            .pull_category(user_id, budget_id, category_id)
            .await?
        {
            return Err(EngineError::KeyNotFound("category not exists".to_string()));
        }
        tracing::info!(user_id, %budget_id, %category_id, "category deleted");
        Ok(())
    }
}
