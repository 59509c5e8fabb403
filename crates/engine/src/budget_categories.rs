//! Categories embedded in a budget.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{EngineError, LimitCents, util::parse_uuid};

/// A named sub-limit inside exactly one budget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub limit: LimitCents,
}

impl Category {
    /// Creates a category with a fresh identifier.
    pub fn new(name: String, limit: LimitCents) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            limit,
        }
    }
}

/// Partial category update: `None` keeps the stored value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub limit_minor: Option<i64>,
}

impl CategoryPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.limit_minor.is_none()
    }
}

/// Complete set of mutable category fields written by an update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryFields {
    pub name: String,
    pub limit: LimitCents,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budget_categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub budget_id: String,
    pub name: String,
    pub limit_minor: i64,
    /// Insertion order inside the budget.
    pub position: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::budgets::Entity",
        from = "Column::BudgetId",
        to = "super::budgets::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Budget,
}

impl Related<super::budgets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budget.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Category {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "category")?,
            name: model.name,
            limit: LimitCents::normalized(model.limit_minor),
        })
    }
}
