pub mod auth;
pub mod car;
pub mod car_request;
pub mod envelope;
pub mod user;
