//! In-process store with the same constraints as the PostgreSQL schema.
//!
//! Backs the router tests; ids are assigned sequentially from 1.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use super::{FleetStore, StoreError, StoreResult, UserStore};
use crate::models::{
    car::{Car, NewCar},
    car_request::{CarRequest, CarRequestFilter, NewCarRequest},
    user::{NewUser, User},
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    cars: BTreeMap<i64, Car>,
    car_requests: BTreeMap<i64, CarRequest>,
    next_user_id: i64,
    next_car_id: i64,
    next_car_request_id: i64,
    /// Monotonic tick so that insertion order is reflected in `created_at`.
    clock: i64,
}

impl Tables {
    fn now(&mut self) -> chrono::DateTime<Utc> {
        self.clock += 1;
        Utc::now() + Duration::microseconds(self.clock)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(mut rows: Vec<CarRequest>) -> Vec<CarRequest> {
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    rows
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut t = self.tables.write().await;
        if t.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("email already exists".into()));
        }
        t.next_user_id += 1;
        let now = t.now();
        let row = User {
            id: t.next_user_id,
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            city: user.city,
            role: user.role,
            active: true,
            created_at: now,
            updated_at: now,
        };
        t.users.insert(row.id, row.clone());
        Ok(row)
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users.values().find(|u| u.email == email).cloned())
    }

    async fn user_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn update_user(&self, user: &User) -> StoreResult<User> {
        let mut t = self.tables.write().await;
        if t.users.values().any(|u| u.email == user.email && u.id != user.id) {
            return Err(StoreError::Conflict("email already exists".into()));
        }
        let now = t.now();
        let row = t
            .users
            .get_mut(&user.id)
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))?;
        row.email = user.email.clone();
        row.first_name = user.first_name.clone();
        row.last_name = user.last_name.clone();
        row.city = user.city.clone();
        row.active = user.active;
        row.updated_at = now;
        Ok(row.clone())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl FleetStore for MemoryStore {
    async fn insert_car(&self, car: NewCar) -> StoreResult<Car> {
        let mut t = self.tables.write().await;
        t.next_car_id += 1;
        let now = t.now();
        let row = Car {
            id: t.next_car_id,
            user_id: car.user_id,
            car_name: car.car_name,
            city: car.city,
            car_type: car.car_type,
            active: true,
            created_at: now,
            updated_at: now,
        };
        t.cars.insert(row.id, row.clone());
        Ok(row)
    }

    async fn car_by_id(&self, id: i64) -> StoreResult<Option<Car>> {
        Ok(self.tables.read().await.cars.get(&id).cloned())
    }

    async fn cars_by_owner(&self, owner_id: i64, active: bool) -> StoreResult<Vec<Car>> {
        let t = self.tables.read().await;
        let mut cars: Vec<Car> = t
            .cars
            .values()
            .filter(|c| c.user_id == owner_id && c.active == active)
            .cloned()
            .collect();
        cars.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(cars)
    }

    async fn update_car(&self, car: &Car) -> StoreResult<Car> {
        let mut t = self.tables.write().await;
        let now = t.now();
        let row = t
            .cars
            .get_mut(&car.id)
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))?;
        row.car_name = car.car_name.clone();
        row.city = car.city.clone();
        row.car_type = car.car_type.clone();
        row.active = car.active;
        row.updated_at = now;
        Ok(row.clone())
    }

    async fn delete_car(&self, id: i64) -> StoreResult<()> {
        let mut t = self.tables.write().await;
        if t.car_requests.values().any(|r| r.car_id == Some(id)) {
            return Err(StoreError::Conflict("car is referenced by a car request".into()));
        }
        t.cars.remove(&id);
        Ok(())
    }

    async fn insert_car_request(&self, req: NewCarRequest) -> StoreResult<CarRequest> {
        let mut t = self.tables.write().await;
        t.next_car_request_id += 1;
        let now = t.now();
        let row = CarRequest {
            id: t.next_car_request_id,
            user_id: req.user_id,
            user_name: req.user_name,
            car_type: req.car_type,
            car_id: None,
            city: req.city,
            address: req.address,
            active: true,
            rating: 0,
            created_at: now,
            updated_at: now,
        };
        t.car_requests.insert(row.id, row.clone());
        Ok(row)
    }

    async fn car_request_by_id(&self, id: i64) -> StoreResult<Option<CarRequest>> {
        Ok(self.tables.read().await.car_requests.get(&id).cloned())
    }

    async fn car_requests(&self, filter: &CarRequestFilter) -> StoreResult<Vec<CarRequest>> {
        let t = self.tables.read().await;
        let rows = t
            .car_requests
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        Ok(newest_first(rows))
    }

    async fn car_requests_for_driver(&self, driver_id: i64) -> StoreResult<Vec<CarRequest>> {
        let t = self.tables.read().await;
        let rows = t
            .car_requests
            .values()
            .filter(|r| r.active)
            .filter(|r| {
                r.car_id
                    .and_then(|car_id| t.cars.get(&car_id))
                    .is_some_and(|car| car.user_id == driver_id)
            })
            .cloned()
            .collect();
        Ok(newest_first(rows))
    }

    async fn update_car_request(&self, req: &CarRequest) -> StoreResult<CarRequest> {
        let mut t = self.tables.write().await;
        if let Some(car_id) = req.car_id {
            if !t.cars.contains_key(&car_id) {
                return Err(StoreError::Conflict("car not found".into()));
            }
        }
        let now = t.now();
        let row = t
            .car_requests
            .get_mut(&req.id)
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))?;
        row.car_id = req.car_id;
        row.active = req.active;
        row.rating = req.rating;
        row.updated_at = now;
        Ok(row.clone())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
