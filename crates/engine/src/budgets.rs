//! The module contains `Budget` struct and its implementation.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{
    Category, LimitCents, Period, ResultEngine, Window, budget_categories,
    period::parse_date,
    util::{require_name, parse_uuid},
};

/// A time-bounded spending limit owned by a single user.
///
/// The validity window is half-open: a budget is active from `valid_from`
/// (included) to `valid_until` (excluded). Categories are embedded and share
/// the budget lifetime.
#[derive(Clone, Debug, PartialEq)]
pub struct Budget {
    /// Identifier assigned by the store on creation.
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub limit: LimitCents,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub categories: Vec<Category>,
}

impl Budget {
    pub fn window(&self) -> Window {
        Window {
            from: self.valid_from,
            until: self.valid_until,
        }
    }

    pub fn category(&self, category_id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == category_id)
    }

    /// Case-sensitive, exact name lookup.
    pub fn has_category_named(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c.name == name)
    }

    pub(crate) fn from_models(
        model: Model,
        mut categories: Vec<budget_categories::Model>,
    ) -> ResultEngine<Self> {
        categories.sort_by_key(|c| c.position);
        Ok(Self {
            id: parse_uuid(&model.id, "budget")?,
            owner_id: model.owner_id,
            name: model.name,
            limit: LimitCents::normalized(model.limit_minor),
            valid_from: model.valid_from,
            valid_until: model.valid_until,
            categories: categories
                .into_iter()
                .map(Category::try_from)
                .collect::<ResultEngine<Vec<_>>>()?,
        })
    }
}

/// How the window of a new budget is chosen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BudgetWindow {
    /// Period token (`day`, `week`, `month`, `year`) anchored at the engine
    /// clock. Parsed when the window is resolved.
    Period(String),
    /// Explicit `YYYY-MM-DD` bounds, in any order.
    Dates { start: String, end: String },
}

impl BudgetWindow {
    pub fn period(token: impl Into<String>) -> Self {
        Self::Period(token.into())
    }

    pub fn dates(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self::Dates {
            start: start.into(),
            end: end.into(),
        }
    }

    pub(crate) fn resolve(&self, now: DateTime<Utc>) -> ResultEngine<Window> {
        match self {
            Self::Period(token) => token.parse::<Period>()?.window(now),
            Self::Dates { start, end } => Window::ordered(parse_date(start)?, parse_date(end)?),
        }
    }
}

/// A validated budget ready to be inserted.
#[derive(Clone, Debug, PartialEq)]
pub struct NewBudget {
    pub owner_id: String,
    pub name: String,
    pub limit: LimitCents,
    pub window: Window,
}

/// Complete set of mutable budget fields written by an update.
#[derive(Clone, Debug, PartialEq)]
pub struct BudgetFields {
    pub name: String,
    pub limit: LimitCents,
    pub window: Window,
}

/// Partial budget update: `None` keeps the stored value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BudgetPatch {
    pub name: Option<String>,
    pub limit_minor: Option<i64>,
    /// `YYYY-MM-DD`
    pub start: Option<String>,
    /// `YYYY-MM-DD`
    pub end: Option<String>,
}

impl BudgetPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.limit_minor.is_none()
            && self.start.is_none()
            && self.end.is_none()
    }

    /// Merge the patch over the stored budget and re-order the window.
    pub(crate) fn merge(&self, current: &Budget) -> ResultEngine<BudgetFields> {
        let name = match self.name.as_deref() {
            Some(name) => require_name(name, "budget")?,
            None => current.name.clone(),
        };
        let limit = self
            .limit_minor
            .map_or(current.limit, LimitCents::normalized);
        let start = match self.start.as_deref() {
            Some(start) => parse_date(start)?,
            None => current.valid_from,
        };
        let end = match self.end.as_deref() {
            Some(end) => parse_date(end)?,
            None => current.valid_until,
        };
        Ok(BudgetFields {
            name,
            limit,
            window: Window::ordered(start, end)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub limit_minor: i64,
    pub valid_from: DateTimeUtc,
    pub valid_until: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::budget_categories::Entity")]
    Categories,
}

impl Related<super::budget_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::EngineError;

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn stored() -> Budget {
        Budget {
            id: Uuid::new_v4(),
            owner_id: "u1".to_string(),
            name: "Food".to_string(),
            limit: LimitCents::normalized(5000),
            valid_from: date(2024, 1, 1),
            valid_until: date(2024, 1, 10),
            categories: Vec::new(),
        }
    }

    #[test]
    fn omitted_fields_are_retained() {
        let current = stored();
        let patch = BudgetPatch {
            limit_minor: Some(7500),
            ..Default::default()
        };
        let fields = patch.merge(&current).unwrap();
        assert_eq!(fields.name, "Food");
        assert_eq!(fields.limit.cents(), 7500);
        assert_eq!(fields.window, current.window());
    }

    #[test]
    fn merged_window_is_reordered() {
        let patch = BudgetPatch {
            start: Some("2024-02-01".to_string()),
            ..Default::default()
        };
        let fields = patch.merge(&stored()).unwrap();
        assert_eq!(fields.window.from, date(2024, 1, 10));
        assert_eq!(fields.window.until, date(2024, 2, 1));
    }

    #[test]
    fn merge_normalizes_and_validates() {
        let patch = BudgetPatch {
            limit_minor: Some(-300),
            ..Default::default()
        };
        assert_eq!(patch.merge(&stored()).unwrap().limit.cents(), 300);

        let patch = BudgetPatch {
            end: Some("10/01/2024".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            patch.merge(&stored()),
            Err(EngineError::Validation(_))
        ));

        let patch = BudgetPatch {
            name: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            patch.merge(&stored()),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(BudgetPatch::default().is_empty());
        assert!(
            !BudgetPatch {
                end: Some("2024-01-01".to_string()),
                ..Default::default()
            }
            .is_empty()
        );
    }

    #[test]
    fn window_from_dates_in_reverse_order() {
        let window = BudgetWindow::dates("2024-01-10", "2024-01-01")
            .resolve(Utc::now())
            .unwrap();
        assert_eq!(window.from, date(2024, 1, 1));
        assert_eq!(window.until, date(2024, 1, 10));
        assert_eq!(
            BudgetWindow::period("quarter").resolve(Utc::now()),
            Err(EngineError::Validation("invalid period: quarter".to_string()))
        );
    }
}
