use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{
    ActiveValue, ConnectionTrait, DatabaseConnection, QueryFilter, QueryOrder, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use crate::{
    Budget, BudgetFields, Category, CategoryFields, NewBudget, ResultEngine, budget_categories,
    budgets,
};

use super::BudgetStore;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

/// [`BudgetStore`] over the `budgets` and `budget_categories` tables.
///
/// Categories are rows keyed by their parent budget; every mutation first
/// checks the parent is owned by the caller, inside the same transaction.
#[derive(Clone, Debug)]
pub struct SqlBudgetStore {
    database: DatabaseConnection,
}

impl SqlBudgetStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    async fn owned_budget<C: ConnectionTrait>(
        db: &C,
        owner_id: &str,
        budget_id: Uuid,
    ) -> ResultEngine<Option<budgets::Model>> {
        budgets::Entity::find_by_id(budget_id.to_string())
            .filter(budgets::Column::OwnerId.eq(owner_id))
            .one(db)
            .await
            .map_err(Into::into)
    }
}

#[async_trait]
impl BudgetStore for SqlBudgetStore {
    async fn insert(&self, budget: &NewBudget) -> ResultEngine<Uuid> {
        let id = Uuid::new_v4();
        let active = budgets::ActiveModel {
            id: ActiveValue::Set(id.to_string()),
            owner_id: ActiveValue::Set(budget.owner_id.clone()),
            name: ActiveValue::Set(budget.name.clone()),
            limit_minor: ActiveValue::Set(budget.limit.cents()),
            valid_from: ActiveValue::Set(budget.window.from),
            valid_until: ActiveValue::Set(budget.window.until),
        };
        active.insert(&self.database).await?;
        Ok(id)
    }

    async fn find_one(&self, owner_id: &str, budget_id: Uuid) -> ResultEngine<Option<Budget>> {
        with_tx!(self, |db_tx| {
            match Self::owned_budget(&db_tx, owner_id, budget_id).await? {
                None => Ok(None),
                Some(model) => {
                    let categories = budget_categories::Entity::find()
                        .filter(budget_categories::Column::BudgetId.eq(model.id.clone()))
                        .all(&db_tx)
                        .await?;
                    Budget::from_models(model, categories).map(Some)
                }
            }
        })
    }

    async fn find_all_by_owner(&self, owner_id: &str) -> ResultEngine<Vec<Budget>> {
        with_tx!(self, |db_tx| {
            let models = budgets::Entity::find()
                .filter(budgets::Column::OwnerId.eq(owner_id))
                .order_by_asc(budgets::Column::ValidFrom)
                .all(&db_tx)
                .await?;

            let ids: Vec<String> = models.iter().map(|m| m.id.clone()).collect();
            let mut by_budget: HashMap<String, Vec<budget_categories::Model>> = HashMap::new();
            if !ids.is_empty() {
                for category in budget_categories::Entity::find()
                    .filter(budget_categories::Column::BudgetId.is_in(ids))
                    .all(&db_tx)
                    .await?
                {
                    by_budget
                        .entry(category.budget_id.clone())
                        .or_default()
                        .push(category);
                }
            }

            models
                .into_iter()
                .map(|model| {
                    let categories = by_budget.remove(&model.id).unwrap_or_default();
                    Budget::from_models(model, categories)
                })
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    async fn delete(&self, owner_id: &str, budget_id: Uuid) -> ResultEngine<u64> {
        with_tx!(self, |db_tx| {
            match Self::owned_budget(&db_tx, owner_id, budget_id).await? {
                None => Ok(0),
                Some(model) => {
                    budget_categories::Entity::delete_many()
                        .filter(budget_categories::Column::BudgetId.eq(model.id.clone()))
                        .exec(&db_tx)
                        .await?;
                    let res = budgets::Entity::delete_by_id(model.id)
                        .exec(&db_tx)
                        .await?;
                    Ok(res.rows_affected)
                }
            }
        })
    }

    async fn push_category(
        &self,
        owner_id: &str,
        budget_id: Uuid,
        category: &Category,
    ) -> ResultEngine<bool> {
        with_tx!(self, |db_tx| {
            match Self::owned_budget(&db_tx, owner_id, budget_id).await? {
                None => Ok(false),
                Some(model) => {
                    let position = budget_categories::Entity::find()
                        .filter(budget_categories::Column::BudgetId.eq(model.id.clone()))
                        .order_by_desc(budget_categories::Column::Position)
                        .one(&db_tx)
                        .await?
                        .map_or(0, |last| last.position + 1);

                    let active = budget_categories::ActiveModel {
                        id: ActiveValue::Set(category.id.to_string()),
                        budget_id: ActiveValue::Set(model.id),
                        name: ActiveValue::Set(category.name.clone()),
                        limit_minor: ActiveValue::Set(category.limit.cents()),
                        position: ActiveValue::Set(position),
                    };
                    active.insert(&db_tx).await?;
                    Ok(true)
                }
            }
        })
    }

    async fn pull_category(
        &self,
        owner_id: &str,
        budget_id: Uuid,
        category_id: Uuid,
    ) -> ResultEngine<bool> {
        with_tx!(self, |db_tx| {
            match Self::owned_budget(&db_tx, owner_id, budget_id).await? {
                None => Ok(false),
                Some(model) => {
                    let res = budget_categories::Entity::delete_many()
                        .filter(budget_categories::Column::Id.eq(category_id.to_string()))
                        .filter(budget_categories::Column::BudgetId.eq(model.id))
                        .exec(&db_tx)
                        .await?;
                    Ok(res.rows_affected > 0)
                }
            }
        })
    }

    async fn update_budget_fields(
        &self,
        owner_id: &str,
        budget_id: Uuid,
        fields: &BudgetFields,
    ) -> ResultEngine<bool> {
        let active = budgets::ActiveModel {
            name: ActiveValue::Set(fields.name.clone()),
            limit_minor: ActiveValue::Set(fields.limit.cents()),
            valid_from: ActiveValue::Set(fields.window.from),
            valid_until: ActiveValue::Set(fields.window.until),
            ..Default::default()
        };
        let res = budgets::Entity::update_many()
            .set(active)
            .filter(budgets::Column::Id.eq(budget_id.to_string()))
            .filter(budgets::Column::OwnerId.eq(owner_id))
            .exec(&self.database)
            .await?;
        Ok(res.rows_affected > 0)
    }

    async fn update_category_fields(
        &self,
        owner_id: &str,
        budget_id: Uuid,
        category_id: Uuid,
        fields: &CategoryFields,
    ) -> ResultEngine<bool> {
        with_tx!(self, |db_tx| {
            match Self::owned_budget(&db_tx, owner_id, budget_id).await? {
                None => Ok(false),
                Some(model) => {
                    let active = budget_categories::ActiveModel {
                        name: ActiveValue::Set(fields.name.clone()),
                        limit_minor: ActiveValue::Set(fields.limit.cents()),
                        ..Default::default()
                    };
                    let res = budget_categories::Entity::update_many()
                        .set(active)
                        .filter(budget_categories::Column::Id.eq(category_id.to_string()))
                        .filter(budget_categories::Column::BudgetId.eq(model.id))
                        .exec(&db_tx)
                        .await?;
                    Ok(res.rows_affected > 0)
                }
            }
        })
    }
}
