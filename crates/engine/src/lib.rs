//! Budget engine.
//!
//! Owns every business rule applied to budgets and their categories before a
//! change reaches storage: period resolution, overlap detection across a
//! user's budgets, partial update merging and category uniqueness. Users are
//! resolved through an [`IdentityLookup`] and budgets persisted through a
//! [`BudgetStore`].

pub use budget_categories::{Category, CategoryFields, CategoryPatch};
pub use budgets::{Budget, BudgetFields, BudgetPatch, BudgetWindow, NewBudget};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::EngineError;
pub use identity::{HttpIdentity, IdentityLookup, UserProfile, UserTable};
pub use limit::LimitCents;
pub use ops::{Engine, EngineBuilder};
pub use period::{DATE_FORMAT, Period, Window, format_date, parse_date};
pub use store::{BudgetStore, SqlBudgetStore};

mod budget_categories;
mod budgets;
mod clock;
mod error;
mod identity;
mod limit;
mod ops;
mod period;
mod store;
mod users;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
