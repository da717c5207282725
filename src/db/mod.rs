pub mod fleet;
pub mod memory;
pub mod users;

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;

use crate::models::{
    car::{Car, NewCar},
    car_request::{CarRequest, CarRequestFilter, NewCarRequest},
    user::{NewUser, User},
};

pub use fleet::PgFleetStore;
pub use memory::MemoryStore;
pub use users::PgUserStore;

/// Deadline applied to every store operation.
pub const STORE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store operation timed out")]
    Timeout,

    /// Unique or reference constraint violated; the message is client-safe.
    #[error("{0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Identity Provider persistence.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` when the email is already taken.
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;
    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn user_by_id(&self, id: i64) -> StoreResult<Option<User>>;
    /// Writes every mutable column of `user`; last write wins.
    async fn update_user(&self, user: &User) -> StoreResult<User>;
    async fn ping(&self) -> StoreResult<()>;
}

/// Resource Service persistence for cars and car requests.
#[async_trait]
pub trait FleetStore: Send + Sync {
    async fn insert_car(&self, car: NewCar) -> StoreResult<Car>;
    async fn car_by_id(&self, id: i64) -> StoreResult<Option<Car>>;
    async fn cars_by_owner(&self, owner_id: i64, active: bool) -> StoreResult<Vec<Car>>;
    async fn update_car(&self, car: &Car) -> StoreResult<Car>;
    /// Hard delete. Fails with `Conflict` while a car request references the car.
    async fn delete_car(&self, id: i64) -> StoreResult<()>;

    async fn insert_car_request(&self, req: NewCarRequest) -> StoreResult<CarRequest>;
    async fn car_request_by_id(&self, id: i64) -> StoreResult<Option<CarRequest>>;
    /// Newest first.
    async fn car_requests(&self, filter: &CarRequestFilter) -> StoreResult<Vec<CarRequest>>;
    /// Active requests assigned to any car owned by `driver_id`, newest first.
    async fn car_requests_for_driver(&self, driver_id: i64) -> StoreResult<Vec<CarRequest>>;
    /// Fails with `Conflict` when `car_id` names no existing car.
    async fn update_car_request(&self, req: &CarRequest) -> StoreResult<CarRequest>;
    async fn ping(&self) -> StoreResult<()>;
}

pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(STORE_TIMEOUT)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Run the identity migrations embedded from ./migrations/identity
pub async fn run_identity_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations/identity").run(pool).await?;
    Ok(())
}

/// Run the resource migrations embedded from ./migrations/resource
pub async fn run_resource_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations/resource").run(pool).await?;
    Ok(())
}

/// Bound a store future by `STORE_TIMEOUT`.
pub(crate) async fn with_deadline<T, F>(fut: F) -> StoreResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(STORE_TIMEOUT, fut).await {
        Ok(result) => result.map_err(StoreError::from),
        Err(_) => Err(StoreError::Timeout),
    }
}

/// Translate constraint violations into client-safe conflicts.
pub(crate) fn conflict_on_violation(err: StoreError, message: &str) -> StoreError {
    match err {
        StoreError::Database(sqlx::Error::Database(db_err))
            if db_err.is_unique_violation() || db_err.is_foreign_key_violation() =>
        {
            StoreError::Conflict(message.to_string())
        }
        other => other,
    }
}
