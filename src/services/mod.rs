pub mod access;
pub mod auth;
pub mod car_requests;
pub mod cars;
pub mod gateway;
pub mod metrics;
pub mod token;
pub mod verifier;
