//! JSON bodies exchanged with the budgets HTTP API.
//!
//! Dates are `YYYY-MM-DD` strings, limits are integer cents. The caller's
//! user id travels in the `user-id` header, never in the body.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "user-id";

pub mod budget {
    use super::*;

    /// Request body to create a budget.
    ///
    /// Provide either `period` (`day`, `week`, `month`, `year`) or both
    /// `start` and `end`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct BudgetNew {
        pub name: String,
        pub limit_minor: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub period: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub start: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub end: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetCreated {
        pub id: Uuid,
    }

    /// Partial update: omitted fields keep their stored value.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct BudgetUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub limit_minor: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub start: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub end: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: Uuid,
        pub name: String,
        pub limit_minor: i64,
        /// Inclusive start date.
        pub start: String,
        /// Exclusive end date.
        pub end: String,
        pub categories: Vec<super::category::CategoryView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetListResponse {
        pub budgets: Vec<BudgetView>,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        pub limit_minor: i64,
    }

    /// Partial update: at least one field must be present.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub limit_minor: Option<i64>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        pub limit_minor: i64,
    }
}
