use uuid::Uuid;

use crate::{
    Budget, BudgetPatch, BudgetWindow, EngineError, LimitCents, NewBudget, ResultEngine,
    util::require_name,
};

use super::Engine;

impl Engine {
    /// Create a budget for `user_id` and return its identifier.
    ///
    /// The window comes either from a period token anchored at the engine
    /// clock or from two explicit dates (swapped when given in reverse). The
    /// new window must not overlap any other budget of the same user.
    ///
    /// The overlap check and the insert are two separate store calls: two
    /// concurrent creations for the same user can both pass the check.
    pub async fn create_budget(
        &self,
        user_id: &str,
        name: &str,
        limit_minor: i64,
        window: BudgetWindow,
    ) -> ResultEngine<Uuid> {
        self.require_user_exists(user_id).await?;

        let name = require_name(name, "budget")?;
        let limit = LimitCents::normalized(limit_minor);
        let window = window.resolve(self.clock.now())?;

        let existing = self.store.find_all_by_owner(user_id).await?;
        if let Some(clash) = existing.iter().find(|b| b.window().overlaps(&window)) {
            tracing::debug!(user_id, budget_id = %clash.id, "budget window overlaps");
            return Err(EngineError::Conflict(format!(
                "budget overlaps with existing budget '{}'",
                clash.name
            )));
        }

        let id = self
            .store
            .insert(&NewBudget {
                owner_id: user_id.to_string(),
                name,
                limit,
                window,
            })
            .await?;
        tracing::info!(user_id, budget_id = %id, "budget created");
        Ok(id)
    }

    /// Return a budget snapshot owned by `user_id`.
    pub async fn budget(&self, user_id: &str, budget_id: Uuid) -> ResultEngine<Budget> {
        self.require_owned_budget(user_id, budget_id).await
    }

    /// Return every budget owned by `user_id`, in store order.
    pub async fn budgets(&self, user_id: &str) -> ResultEngine<Vec<Budget>> {
        self.require_user_exists(user_id).await?;
        self.store.find_all_by_owner(user_id).await
    }

    /// Apply a partial update and return the refreshed budget.
    ///
    /// Omitted fields keep their stored value; the merged window is
    /// re-ordered. Overlap with the user's other budgets is not checked here.
    pub async fn update_budget(
        &self,
        user_id: &str,
        budget_id: Uuid,
        patch: BudgetPatch,
    ) -> ResultEngine<Budget> {
        if patch.is_empty() {
            return Err(EngineError::Validation("no updates".to_string()));
        }
        let current = self.require_owned_budget(user_id, budget_id).await?;
        let fields = patch.merge(&current)?;

        if !self
            .store
            .update_budget_fields(user_id, budget_id, &fields)
            .await?
        {
            return Err(EngineError::KeyNotFound("budget not exists".to_string()));
        }
        tracing::info!(user_id, %budget_id, "budget updated");

        self.require_budget(user_id, budget_id).await
    }

    /// Permanently delete a budget together with its categories.
    pub async fn delete_budget(&self, user_id: &str, budget_id: Uuid) -> ResultEngine<()> {
        self.require_owned_budget(user_id, budget_id).await?;
        if self.store.delete(user_id, budget_id).await? == 0 {
            return Err(EngineError::KeyNotFound("budget not exists".to_string()));
        }
        tracing::info!(user_id, %budget_id, "budget deleted");
        Ok(())
    }
}
