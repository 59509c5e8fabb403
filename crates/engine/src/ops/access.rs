use uuid::Uuid;

use crate::{Budget, EngineError, ResultEngine, UserProfile};

use super::Engine;

impl Engine {
    pub(super) async fn require_user_exists(&self, user_id: &str) -> ResultEngine<UserProfile> {
        self.identity
            .resolve_user(user_id)
            .await?
            .ok_or_else(|| {
                tracing::debug!(user_id, "unknown user");
                EngineError::KeyNotFound("user not exists".to_string())
            })
    }

    /// Fetch a budget owned by `user_id`. Budgets owned by someone else are
    /// reported exactly like missing ones.
    pub(super) async fn require_budget(
        &self,
        user_id: &str,
        budget_id: Uuid,
    ) -> ResultEngine<Budget> {
        self.store
            .find_one(user_id, budget_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("budget not exists".to_string()))
    }

    /// Resolve the user, then the budget.
    pub(super) async fn require_owned_budget(
        &self,
        user_id: &str,
        budget_id: Uuid,
    ) -> ResultEngine<Budget> {
        self.require_user_exists(user_id).await?;
        self.require_budget(user_id, budget_id).await
    }
}
