use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};

use crate::{
    error::AppError,
    middleware::auth::BearerToken,
    models::{
        car::{Car, CarList, CreateCarRequest, ListCarsQuery, UpdateCarRequest},
        envelope::{accepted, Accepted},
    },
    services::cars::CarService,
    state::ResourceState,
};

pub async fn create_car(
    State(state): State<ResourceState>,
    BearerToken(token): BearerToken,
    payload: Result<Json<CreateCarRequest>, JsonRejection>,
) -> Result<Accepted<Car>, AppError> {
    let Json(body) = payload?;
    body.validate()?;
    let caller = state.verifier.check(&token).await?;
    CarService::create(state.store.as_ref(), &caller, &body)
        .await
        .map(|car| accepted("Car has been created", car))
}

pub async fn list_cars(
    State(state): State<ResourceState>,
    BearerToken(token): BearerToken,
    query: Result<Query<ListCarsQuery>, QueryRejection>,
) -> Result<Accepted<CarList>, AppError> {
    let Query(query) = query?;
    let caller = state.verifier.check(&token).await?;
    CarService::list(state.store.as_ref(), &caller, query.active.unwrap_or(true))
        .await
        .map(|cars| accepted("Cars have been retrieved", CarList { cars }))
}

pub async fn get_car(
    State(state): State<ResourceState>,
    BearerToken(token): BearerToken,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Accepted<Car>, AppError> {
    let Path(id) = id?;
    state.verifier.check(&token).await?;
    CarService::get(state.store.as_ref(), id)
        .await
        .map(|car| accepted("The car has been retrieved", car))
}

pub async fn update_car(
    State(state): State<ResourceState>,
    BearerToken(token): BearerToken,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateCarRequest>, JsonRejection>,
) -> Result<Accepted<Car>, AppError> {
    let Path(id) = id?;
    let Json(body) = payload?;
    let caller = state.verifier.check(&token).await?;
    CarService::update(state.store.as_ref(), &caller, id, &body)
        .await
        .map(|car| accepted("The car has been updated", car))
}

pub async fn delete_car(
    State(state): State<ResourceState>,
    BearerToken(token): BearerToken,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Accepted<()>, AppError> {
    let Path(id) = id?;
    let caller = state.verifier.check(&token).await?;
    CarService::delete(state.store.as_ref(), &caller, id)
        .await
        .map(|_| accepted("The car has been deleted", ()))
}
