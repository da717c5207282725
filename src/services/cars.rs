use tracing::info;

use super::access::{require_car_owner, require_driver};
use crate::{
    db::FleetStore,
    error::AppError,
    models::{
        auth::Claims,
        car::{Car, CreateCarRequest, NewCar, UpdateCarRequest},
    },
};

pub struct CarService;

impl CarService {
    pub async fn create(
        store: &dyn FleetStore,
        caller: &Claims,
        req: &CreateCarRequest,
    ) -> Result<Car, AppError> {
        require_driver(caller, "create cars")?;
        let car = store
            .insert_car(NewCar {
                user_id: caller.id,
                car_name: req.car_name.clone(),
                city: req.city.clone(),
                car_type: req.car_type.clone(),
            })
            .await?;
        info!("Driver {} created car {}", caller.id, car.id);
        Ok(car)
    }

    /// The caller's own cars.
    pub async fn list(
        store: &dyn FleetStore,
        caller: &Claims,
        active: bool,
    ) -> Result<Vec<Car>, AppError> {
        require_driver(caller, "retrieve your cars")?;
        Ok(store.cars_by_owner(caller.id, active).await?)
    }

    pub async fn get(store: &dyn FleetStore, id: i64) -> Result<Car, AppError> {
        store
            .car_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("car not found"))
    }

    pub async fn update(
        store: &dyn FleetStore,
        caller: &Claims,
        id: i64,
        req: &UpdateCarRequest,
    ) -> Result<Car, AppError> {
        require_driver(caller, "update cars")?;
        let mut car = Self::get(store, id).await?;
        require_car_owner(caller, &car)?;

        car.apply(req);
        Ok(store.update_car(&car).await?)
    }

    pub async fn delete(store: &dyn FleetStore, caller: &Claims, id: i64) -> Result<(), AppError> {
        require_driver(caller, "delete cars")?;
        let car = Self::get(store, id).await?;
        require_car_owner(caller, &car)?;

        store.delete_car(car.id).await?;
        info!("Driver {} deleted car {}", caller.id, car.id);
        Ok(())
    }
}
