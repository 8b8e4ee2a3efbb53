//! # Household Backend
//!
//! Domain services and storage for a shared household planner. The backend
//! is synchronous and has no transport layer: callers hold a [`Backend`] and
//! call its services directly, passing the caller's principal where an
//! operation is ownership-checked.

pub mod config;
pub mod domain;
pub mod storage;

pub use config::HouseholdConfig;
pub use domain::HouseholdError;
pub use storage::{Connection, MemoryConnection, Snapshot};

/// Main backend struct that wires every service to one storage connection
#[derive(Clone)]
pub struct Backend<C: Connection> {
    connection: C,
    pub task_service: domain::TaskService<C>,
    pub chore_service: domain::ChoreService<C>,
    pub cooking_service: domain::CookingService<C>,
    pub profile_service: domain::ProfileService<C>,
    pub calendar_service: domain::CalendarService<C>,
    pub seed_service: domain::SeedService<C>,
}

impl<C: Connection> Backend<C> {
    pub fn new(connection: C) -> Self {
        Self {
            task_service: domain::TaskService::new(&connection),
            chore_service: domain::ChoreService::new(&connection),
            cooking_service: domain::CookingService::new(&connection),
            profile_service: domain::ProfileService::new(&connection),
            calendar_service: domain::CalendarService::new(&connection),
            seed_service: domain::SeedService::new(&connection),
            connection,
        }
    }
}

impl Backend<MemoryConnection> {
    /// Backend over an in-memory store seeded from `snapshot`
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self::new(MemoryConnection::from_snapshot(snapshot))
    }

    /// Current state of every record, ready to be saved
    pub fn snapshot(&self) -> anyhow::Result<Snapshot> {
        self.connection.to_snapshot()
    }
}
