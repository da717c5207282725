use tracing::info;

use super::access::{require_car_request_access, require_driver, require_listing_scope};
use super::metrics::CAR_REQUEST_UPDATES_COUNTER;
use crate::{
    db::FleetStore,
    error::AppError,
    models::{
        auth::Claims,
        car_request::{
            CarRequest, CarRequestFilter, CreateCarRequestBody, ListCarRequestsQuery,
            NewCarRequest, UpdateCarRequestBody,
        },
    },
};

pub struct CarRequestService;

impl CarRequestService {
    /// Open a request. Requester id and name are taken from the verified claims.
    pub async fn create(
        store: &dyn FleetStore,
        caller: &Claims,
        req: &CreateCarRequestBody,
    ) -> Result<CarRequest, AppError> {
        let created = store
            .insert_car_request(NewCarRequest {
                user_id: caller.id,
                user_name: caller.username.clone(),
                car_type: req.car_type.clone(),
                city: req.city.clone(),
                address: req.address.clone(),
            })
            .await?;
        info!("User {} opened car request {}", caller.id, created.id);
        Ok(created)
    }

    pub async fn list(
        store: &dyn FleetStore,
        caller: &Claims,
        query: &ListCarRequestsQuery,
    ) -> Result<Vec<CarRequest>, AppError> {
        require_listing_scope(caller, query.user_id)?;
        Ok(store.car_requests(&CarRequestFilter::from(query)).await?)
    }

    /// Active requests assigned to one of the calling driver's cars.
    pub async fn list_assigned(
        store: &dyn FleetStore,
        caller: &Claims,
    ) -> Result<Vec<CarRequest>, AppError> {
        require_driver(caller, "see the car requests assigned to you")?;
        Ok(store.car_requests_for_driver(caller.id).await?)
    }

    pub async fn get(
        store: &dyn FleetStore,
        caller: &Claims,
        id: i64,
    ) -> Result<CarRequest, AppError> {
        let req = Self::find(store, id).await?;
        require_car_request_access(caller, &req)?;
        Ok(req)
    }

    /// Apply a lifecycle update: assign a car, close, rate, or any combination.
    pub async fn update(
        store: &dyn FleetStore,
        caller: &Claims,
        id: i64,
        update: &UpdateCarRequestBody,
    ) -> Result<CarRequest, AppError> {
        let mut req = Self::find(store, id).await?;
        require_car_request_access(caller, &req)?;

        if let Some(car_id) = update.car_id.filter(|c| req.car_id != Some(*c)) {
            if store.car_by_id(car_id).await?.is_none() {
                return Err(AppError::not_found("car not found"));
            }
        }

        let before = req.state();
        req.apply(update)?;
        let updated = store.update_car_request(&req).await?;

        let after = updated.state();
        let state_label = after.to_string();
        CAR_REQUEST_UPDATES_COUNTER
            .with_label_values(&[state_label.as_str()])
            .inc();
        info!(
            "User {} moved car request {} from {} to {}",
            caller.id, updated.id, before, after
        );
        Ok(updated)
    }

    async fn find(store: &dyn FleetStore, id: i64) -> Result<CarRequest, AppError> {
        store
            .car_request_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("car request not found"))
    }
}
