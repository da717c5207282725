mod common;

use axum::{
    http::{Method, StatusCode},
    Router,
};
use serde_json::{json, Value};

use common::{resource_app, send, token_for};
use ridehail::models::user::UserRole;

fn car(name: &str) -> Value {
    json!({ "car_name": name, "city": "Paris", "car_type": "sedan" })
}

async fn create_car(app: &Router, token: &str, name: &str) -> i64 {
    let (status, body) = send(app, Method::POST, "/cars", Some(token), Some(car(name))).await;
    assert_eq!(status, StatusCode::ACCEPTED, "{body}");
    body["data"]["id"].as_i64().unwrap()
}

async fn open_request(app: &Router, token: &str, city: &str, car_type: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/car_requests",
        Some(token),
        Some(json!({ "car_type": car_type, "city": city, "address": "1 rue de Rivoli" })),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED, "{body}");
    body["data"].clone()
}

#[tokio::test]
async fn test_customer_cannot_create_car() {
    let app = resource_app();
    let customer = token_for(1, UserRole::Customer);

    let (status, body) = send(&app, Method::POST, "/cars", Some(&customer), Some(car("Clio"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], true);
    assert!(body["message"].as_str().unwrap().contains("driver account"));
}

#[tokio::test]
async fn test_car_owner_comes_from_token_not_body() {
    let app = resource_app();
    let driver = token_for(5, UserRole::Driver);

    let mut body = car("Clio");
    body["user_id"] = json!(7);
    let (status, body) = send(&app, Method::POST, "/cars", Some(&driver), Some(body)).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["data"]["user_id"], 5);
    assert_eq!(body["data"]["active"], true);
}

#[tokio::test]
async fn test_missing_or_invalid_token_is_unauthorized() {
    let app = resource_app();

    let (status, _) = send(&app, Method::POST, "/cars", None, Some(car("Clio"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(&app, Method::GET, "/car_requests", Some("forged"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "invalid token");
}

#[tokio::test]
async fn test_invalid_body_is_rejected_before_token_check() {
    let app = resource_app();
    // an invalid token would be a 401; local validation answers first
    let (status, body) = send(
        &app,
        Method::POST,
        "/cars",
        Some("forged"),
        Some(json!({ "car_name": "", "city": "Paris", "car_type": "sedan" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "car name should not be empty");
}

#[tokio::test]
async fn test_only_the_owner_updates_or_deletes_a_car() {
    let app = resource_app();
    let owner = token_for(7, UserRole::Driver);
    let other = token_for(5, UserRole::Driver);
    let foreign_car = create_car(&app, &owner, "Clio").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/cars/{foreign_car}"),
        Some(&other),
        Some(json!({ "car_name": "Stolen" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "the car does not belong to you");

    let (status, _) = send(&app, Method::DELETE, &format!("/cars/{foreign_car}"), Some(&other), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let own_car = create_car(&app, &other, "Zoe").await;
    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/cars/{own_car}"),
        Some(&other),
        Some(json!({ "car_name": "Zoe II" })),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["data"]["car_name"], "Zoe II");
    assert_eq!(body["data"]["city"], "Paris");

    let (status, _) = send(&app, Method::DELETE, &format!("/cars/{own_car}"), Some(&other), None).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (status, body) = send(&app, Method::GET, &format!("/cars/{own_car}"), Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "car not found");
}

#[tokio::test]
async fn test_list_cars_returns_own_cars_by_active_flag() {
    let app = resource_app();
    let driver = token_for(5, UserRole::Driver);
    let retired = create_car(&app, &driver, "Clio").await;
    create_car(&app, &driver, "Zoe").await;
    create_car(&app, &token_for(7, UserRole::Driver), "Megane").await;

    send(
        &app,
        Method::PUT,
        &format!("/cars/{retired}"),
        Some(&driver),
        Some(json!({ "active": false })),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/cars", Some(&driver), None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let cars = body["data"]["cars"].as_array().unwrap();
    assert_eq!(cars.len(), 1);
    assert_eq!(cars[0]["car_name"], "Zoe");

    let (_, body) = send(&app, Method::GET, "/cars?active=false", Some(&driver), None).await;
    let cars = body["data"]["cars"].as_array().unwrap();
    assert_eq!(cars.len(), 1);
    assert_eq!(cars[0]["id"], retired);

    let (status, _) = send(&app, Method::GET, "/cars?active=maybe", Some(&driver), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_car_request_lifecycle() {
    let app = resource_app();
    let customer = token_for(1, UserRole::Customer);
    let driver = token_for(5, UserRole::Driver);
    let car_id = create_car(&app, &driver, "Clio").await;

    let req = open_request(&app, &customer, "Paris", "sedan").await;
    let id = req["id"].as_i64().unwrap();
    assert_eq!(req["active"], true);
    assert!(req["car_id"].is_null());
    assert_eq!(req["user_id"], 1);
    assert_eq!(req["user_name"], "User1");

    // open requests cannot be rated
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/car_requests/{id}"),
        Some(&customer),
        Some(json!({ "rating": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/car_requests/{id}"),
        Some(&driver),
        Some(json!({ "car_id": car_id })),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["data"]["car_id"], car_id);
    assert_eq!(body["data"]["active"], true);

    let (_, body) = send(&app, Method::GET, "/driver/car_requests", Some(&driver), None).await;
    assert_eq!(body["data"]["car_requests"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/car_requests/{id}"),
        Some(&customer),
        Some(json!({ "active": false, "rating": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["data"]["active"], false);
    assert_eq!(body["data"]["rating"], 5);
    assert_eq!(body["data"]["car_id"], car_id);

    let (_, body) = send(&app, Method::GET, "/driver/car_requests", Some(&driver), None).await;
    assert!(body["data"]["car_requests"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_open_request_closes_directly() {
    let app = resource_app();
    let customer = token_for(1, UserRole::Customer);
    let id = open_request(&app, &customer, "Paris", "sedan").await["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/car_requests/{id}"),
        Some(&customer),
        Some(json!({ "active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["data"]["active"], false);
    assert!(body["data"]["car_id"].is_null());
}

#[tokio::test]
async fn test_rating_out_of_range_is_rejected() {
    let app = resource_app();
    let customer = token_for(1, UserRole::Customer);
    let id = open_request(&app, &customer, "Paris", "sedan").await["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/car_requests/{id}"),
        Some(&customer),
        Some(json!({ "active": false, "rating": 9 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "rating should be between 1 and 5");
}

#[tokio::test]
async fn test_assigning_unknown_car_is_not_found() {
    let app = resource_app();
    let customer = token_for(1, UserRole::Customer);
    let driver = token_for(5, UserRole::Driver);
    let id = open_request(&app, &customer, "Paris", "sedan").await["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/car_requests/{id}"),
        Some(&driver),
        Some(json!({ "car_id": 42 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "car not found");
}

#[tokio::test]
async fn test_other_customers_cannot_touch_a_request() {
    let app = resource_app();
    let owner = token_for(1, UserRole::Customer);
    let stranger = token_for(2, UserRole::Customer);
    let id = open_request(&app, &owner, "Paris", "sedan").await["id"].as_i64().unwrap();

    let (status, _) = send(&app, Method::GET, &format!("/car_requests/{id}"), Some(&stranger), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/car_requests/{id}"),
        Some(&stranger),
        Some(json!({ "active": false })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::GET, &format!("/car_requests/{id}"), Some(&owner), None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["data"]["id"], id);
}

#[tokio::test]
async fn test_listing_filters_by_city_type_and_active() {
    let app = resource_app();
    let customer = token_for(1, UserRole::Customer);
    let driver = token_for(5, UserRole::Driver);

    let wanted = open_request(&app, &customer, "Paris", "sedan").await["id"].as_i64().unwrap();
    open_request(&app, &customer, "Paris", "van").await;
    open_request(&app, &customer, "Lyon", "sedan").await;
    let closed = open_request(&app, &customer, "Paris", "sedan").await["id"].as_i64().unwrap();
    send(
        &app,
        Method::PUT,
        &format!("/car_requests/{closed}"),
        Some(&customer),
        Some(json!({ "active": false })),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/car_requests?city=Paris&car_type=sedan",
        Some(&driver),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let ids: Vec<i64> = body["data"]["car_requests"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![wanted]);

    let (_, body) = send(
        &app,
        Method::GET,
        "/car_requests?city=Paris&car_type=sedan&active=false",
        Some(&driver),
        None,
    )
    .await;
    let ids: Vec<i64> = body["data"]["car_requests"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![closed]);
}

#[tokio::test]
async fn test_customer_listing_is_scoped_to_self() {
    let app = resource_app();
    let customer = token_for(1, UserRole::Customer);
    open_request(&app, &customer, "Paris", "sedan").await;
    open_request(&app, &token_for(2, UserRole::Customer), "Paris", "sedan").await;

    let (status, _) = send(&app, Method::GET, "/car_requests", Some(&customer), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/car_requests?user_id=2", Some(&customer), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::GET, "/car_requests?user_id=1", Some(&customer), None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let requests = body["data"]["car_requests"].as_array().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["user_id"], 1);
}

#[tokio::test]
async fn test_assigned_car_cannot_be_deleted() {
    let app = resource_app();
    let customer = token_for(1, UserRole::Customer);
    let driver = token_for(5, UserRole::Driver);
    let car_id = create_car(&app, &driver, "Clio").await;
    let id = open_request(&app, &customer, "Paris", "sedan").await["id"].as_i64().unwrap();
    send(
        &app,
        Method::PUT,
        &format!("/car_requests/{id}"),
        Some(&driver),
        Some(json!({ "car_id": car_id })),
    )
    .await;

    let (status, body) = send(&app, Method::DELETE, &format!("/cars/{car_id}"), Some(&driver), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "car is referenced by a car request");
}

#[tokio::test]
async fn test_driver_listing_requires_driver() {
    let app = resource_app();
    let (status, _) = send(
        &app,
        Method::GET,
        "/driver/car_requests",
        Some(&token_for(1, UserRole::Customer)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_metrics_exposes_lifecycle_counter() {
    let app = resource_app();
    let customer = token_for(1, UserRole::Customer);
    let id = open_request(&app, &customer, "Paris", "sedan").await["id"].as_i64().unwrap();
    send(
        &app,
        Method::PUT,
        &format!("/car_requests/{id}"),
        Some(&customer),
        Some(json!({ "active": false })),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/metrics", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_str().unwrap().contains("ridehail_car_request_updates_total"));
}

#[tokio::test]
async fn test_rating_bounds_are_checked_before_token() {
    let app = resource_app();
    // no request 1 exists and the token is forged; the body is rejected first
    let (status, body) = send(
        &app,
        Method::PUT,
        "/car_requests/1",
        Some("forged.token.here"),
        Some(json!({ "rating": 9 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "rating should be between 1 and 5");
}
