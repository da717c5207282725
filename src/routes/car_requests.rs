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
        car_request::{
            CarRequest, CarRequestList, CreateCarRequestBody, ListCarRequestsQuery,
            UpdateCarRequestBody,
        },
        envelope::{accepted, Accepted},
    },
    services::car_requests::CarRequestService,
    state::ResourceState,
};

pub async fn create_car_request(
    State(state): State<ResourceState>,
    BearerToken(token): BearerToken,
    payload: Result<Json<CreateCarRequestBody>, JsonRejection>,
) -> Result<Accepted<CarRequest>, AppError> {
    let Json(body) = payload?;
    body.validate()?;
    let caller = state.verifier.check(&token).await?;
    CarRequestService::create(state.store.as_ref(), &caller, &body)
        .await
        .map(|req| accepted("Car request has been created", req))
}

pub async fn list_car_requests(
    State(state): State<ResourceState>,
    BearerToken(token): BearerToken,
    query: Result<Query<ListCarRequestsQuery>, QueryRejection>,
) -> Result<Accepted<CarRequestList>, AppError> {
    let Query(query) = query?;
    let caller = state.verifier.check(&token).await?;
    CarRequestService::list(state.store.as_ref(), &caller, &query)
        .await
        .map(|car_requests| {
            accepted("Car requests have been retrieved", CarRequestList { car_requests })
        })
}

pub async fn list_assigned_car_requests(
    State(state): State<ResourceState>,
    BearerToken(token): BearerToken,
) -> Result<Accepted<CarRequestList>, AppError> {
    let caller = state.verifier.check(&token).await?;
    CarRequestService::list_assigned(state.store.as_ref(), &caller)
        .await
        .map(|car_requests| {
            accepted("Car requests have been retrieved", CarRequestList { car_requests })
        })
}

pub async fn get_car_request(
    State(state): State<ResourceState>,
    BearerToken(token): BearerToken,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Accepted<CarRequest>, AppError> {
    let Path(id) = id?;
    let caller = state.verifier.check(&token).await?;
    CarRequestService::get(state.store.as_ref(), &caller, id)
        .await
        .map(|req| accepted("The car request has been retrieved", req))
}

pub async fn update_car_request(
    State(state): State<ResourceState>,
    BearerToken(token): BearerToken,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateCarRequestBody>, JsonRejection>,
) -> Result<Accepted<CarRequest>, AppError> {
    let Path(id) = id?;
    let Json(body) = payload?;
    body.validate()?;
    let caller = state.verifier.check(&token).await?;
    CarRequestService::update(state.store.as_ref(), &caller, id, &body)
        .await
        .map(|req| accepted("The car request has been updated", req))
}
