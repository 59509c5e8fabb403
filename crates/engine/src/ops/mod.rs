use std::{fmt, sync::Arc};

use sea_orm::DatabaseConnection;

use crate::{
    BudgetStore, Clock, EngineError, IdentityLookup, ResultEngine, SqlBudgetStore, SystemClock,
    UserTable,
};

mod access;
mod budgets;
mod categories;

/// The budget engine.
///
/// Stateless between calls: it holds shared handles to its collaborators and
/// nothing else, so one instance can serve concurrent requests.
pub struct Engine {
    identity: Arc<dyn IdentityLookup>,
    store: Arc<dyn BudgetStore>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine").finish_non_exhaustive()
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: Option<DatabaseConnection>,
    identity: Option<Arc<dyn IdentityLookup>>,
    store: Option<Arc<dyn BudgetStore>>,
    clock: Option<Arc<dyn Clock>>,
}

impl EngineBuilder {
    /// Pass the database. Used for the budget store and, unless another
    /// identity lookup is given, for the `users` table lookup.
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = Some(db);
        self
    }

    pub fn identity(mut self, identity: Arc<dyn IdentityLookup>) -> EngineBuilder {
        self.identity = Some(identity);
        self
    }

    pub fn store(mut self, store: Arc<dyn BudgetStore>) -> EngineBuilder {
        self.store = Some(store);
        self
    }

    /// Override the clock used to anchor period windows.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> EngineBuilder {
        self.clock = Some(clock);
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> ResultEngine<Engine> {
        let store: Arc<dyn BudgetStore> = match (self.store, &self.database) {
            (Some(store), _) => store,
            (None, Some(db)) => Arc::new(SqlBudgetStore::new(db.clone())),
            (None, None) => {
                return Err(EngineError::Validation(
                    "engine requires a budget store or a database".to_string(),
                ));
            }
        };
        let identity: Arc<dyn IdentityLookup> = match (self.identity, self.database) {
            (Some(identity), _) => identity,
            (None, Some(db)) => Arc::new(UserTable::new(db)),
            (None, None) => {
                return Err(EngineError::Validation(
                    "engine requires an identity lookup or a database".to_string(),
                ));
            }
        };
        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock),
        };
        Ok(Engine {
            identity,
            store,
            clock,
        })
    }
}
