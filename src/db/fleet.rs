use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{conflict_on_violation, with_deadline, FleetStore, StoreResult};
use crate::models::{
    car::{Car, NewCar},
    car_request::{CarRequest, CarRequestFilter, NewCarRequest},
};

const CAR_COLUMNS: &str = "id, user_id, car_name, city, car_type, active, created_at, updated_at";
const CAR_REQUEST_COLUMNS: &str =
    "id, user_id, user_name, car_type, car_id, city, address, active, rating, created_at, updated_at";

#[derive(Clone)]
pub struct PgFleetStore {
    pool: PgPool,
}

impl PgFleetStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FleetStore for PgFleetStore {
    async fn insert_car(&self, car: NewCar) -> StoreResult<Car> {
        let sql = format!(
            "INSERT INTO cars (user_id, car_name, city, car_type, active)
             VALUES ($1, $2, $3, $4, TRUE)
             RETURNING {CAR_COLUMNS}"
        );
        with_deadline(
            sqlx::query_as::<_, Car>(&sql)
                .bind(car.user_id)
                .bind(&car.car_name)
                .bind(&car.city)
                .bind(&car.car_type)
                .fetch_one(&self.pool),
        )
        .await
    }

    async fn car_by_id(&self, id: i64) -> StoreResult<Option<Car>> {
        let sql = format!("SELECT {CAR_COLUMNS} FROM cars WHERE id = $1");
        with_deadline(sqlx::query_as::<_, Car>(&sql).bind(id).fetch_optional(&self.pool)).await
    }

    async fn cars_by_owner(&self, owner_id: i64, active: bool) -> StoreResult<Vec<Car>> {
        let sql = format!(
            "SELECT {CAR_COLUMNS} FROM cars
             WHERE user_id = $1 AND active = $2
             ORDER BY created_at DESC"
        );
        with_deadline(
            sqlx::query_as::<_, Car>(&sql)
                .bind(owner_id)
                .bind(active)
                .fetch_all(&self.pool),
        )
        .await
    }

    async fn update_car(&self, car: &Car) -> StoreResult<Car> {
        let sql = format!(
            "UPDATE cars
             SET car_name = $1, city = $2, car_type = $3, active = $4, updated_at = NOW()
             WHERE id = $5
             RETURNING {CAR_COLUMNS}"
        );
        with_deadline(
            sqlx::query_as::<_, Car>(&sql)
                .bind(&car.car_name)
                .bind(&car.city)
                .bind(&car.car_type)
                .bind(car.active)
                .bind(car.id)
                .fetch_one(&self.pool),
        )
        .await
    }

    async fn delete_car(&self, id: i64) -> StoreResult<()> {
        with_deadline(
            sqlx::query("DELETE FROM cars WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await
        .map_err(|e| conflict_on_violation(e, "car is referenced by a car request"))?;
        Ok(())
    }

    async fn insert_car_request(&self, req: NewCarRequest) -> StoreResult<CarRequest> {
        let sql = format!(
            "INSERT INTO car_requests (user_id, user_name, car_type, car_id, city, address, active, rating)
             VALUES ($1, $2, $3, NULL, $4, $5, TRUE, 0)
             RETURNING {CAR_REQUEST_COLUMNS}"
        );
        with_deadline(
            sqlx::query_as::<_, CarRequest>(&sql)
                .bind(req.user_id)
                .bind(&req.user_name)
                .bind(&req.car_type)
                .bind(&req.city)
                .bind(&req.address)
                .fetch_one(&self.pool),
        )
        .await
    }

    async fn car_request_by_id(&self, id: i64) -> StoreResult<Option<CarRequest>> {
        let sql = format!("SELECT {CAR_REQUEST_COLUMNS} FROM car_requests WHERE id = $1");
        with_deadline(
            sqlx::query_as::<_, CarRequest>(&sql)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn car_requests(&self, filter: &CarRequestFilter) -> StoreResult<Vec<CarRequest>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {CAR_REQUEST_COLUMNS} FROM car_requests WHERE active = "
        ));
        qb.push_bind(filter.active);
        if let Some(city) = &filter.city {
            qb.push(" AND city = ").push_bind(city);
        }
        if let Some(car_type) = &filter.car_type {
            qb.push(" AND car_type = ").push_bind(car_type);
        }
        if let Some(user_id) = filter.user_id {
            qb.push(" AND user_id = ").push_bind(user_id);
        }
        qb.push(" ORDER BY created_at DESC");

        with_deadline(qb.build_query_as::<CarRequest>().fetch_all(&self.pool)).await
    }

    async fn car_requests_for_driver(&self, driver_id: i64) -> StoreResult<Vec<CarRequest>> {
        let sql = format!(
            "SELECT {} FROM car_requests cr
             JOIN cars c ON c.id = cr.car_id
             WHERE c.user_id = $1 AND cr.active = TRUE
             ORDER BY cr.created_at DESC",
            prefixed(CAR_REQUEST_COLUMNS, "cr")
        );
        with_deadline(
            sqlx::query_as::<_, CarRequest>(&sql)
                .bind(driver_id)
                .fetch_all(&self.pool),
        )
        .await
    }

    async fn update_car_request(&self, req: &CarRequest) -> StoreResult<CarRequest> {
        let sql = format!(
            "UPDATE car_requests
             SET car_id = $1, active = $2, rating = $3, updated_at = NOW()
             WHERE id = $4
             RETURNING {CAR_REQUEST_COLUMNS}"
        );
        with_deadline(
            sqlx::query_as::<_, CarRequest>(&sql)
                .bind(req.car_id)
                .bind(req.active)
                .bind(req.rating)
                .bind(req.id)
                .fetch_one(&self.pool),
        )
        .await
        .map_err(|e| conflict_on_violation(e, "car not found"))
    }

    async fn ping(&self) -> StoreResult<()> {
        with_deadline(sqlx::query("SELECT 1").execute(&self.pool)).await?;
        Ok(())
    }
}

/// Qualify a comma-separated column list with a table alias.
fn prefixed(columns: &str, alias: &str) -> String {
    columns
        .split(", ")
        .map(|c| format!("{alias}.{c}"))
        .collect::<Vec<_>>()
        .join(", ")
}
