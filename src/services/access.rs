//! Role and ownership rules applied after the caller's token has been verified.

use tracing::warn;

use crate::{
    error::AppError,
    models::{auth::Claims, car::Car, car_request::CarRequest, user::UserRole},
};

/// Car create, update, delete and listing are reserved to drivers.
pub fn require_driver(caller: &Claims, action: &str) -> Result<(), AppError> {
    if caller.role != UserRole::Driver {
        warn!("User {} ({}) denied: {}", caller.id, caller.role, action);
        return Err(AppError::permission(format!(
            "you are on a customer account, log in on a driver account to {action}"
        )));
    }
    Ok(())
}

/// Cars are mutated only by their owner.
pub fn require_car_owner(caller: &Claims, car: &Car) -> Result<(), AppError> {
    if caller.id != car.user_id {
        warn!("User {} denied on car {} owned by {}", caller.id, car.id, car.user_id);
        return Err(AppError::permission("the car does not belong to you"));
    }
    Ok(())
}

/// A car request is readable and mutable by its requester or by any driver.
pub fn require_car_request_access(caller: &Claims, req: &CarRequest) -> Result<(), AppError> {
    if caller.id != req.user_id && !caller.is_driver() {
        warn!("User {} denied on car request {}", caller.id, req.id);
        return Err(AppError::permission(
            "the car request does not belong to you and you are not a driver",
        ));
    }
    Ok(())
}

/// Customers may only list their own requests, and must say so explicitly.
pub fn require_listing_scope(caller: &Claims, user_id: Option<i64>) -> Result<(), AppError> {
    if caller.is_driver() || user_id == Some(caller.id) {
        return Ok(());
    }
    warn!("User {} denied listing car requests of {:?}", caller.id, user_id);
    Err(AppError::permission(
        "you do not have the permissions to get those car requests",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::Utc;

    fn claims(id: i64, role: UserRole) -> Claims {
        Claims {
            id,
            username: "someone".into(),
            email: "someone@example.com".into(),
            role,
            exp: Utc::now().timestamp() + 3600,
        }
    }

    fn car(owner: i64) -> Car {
        let now = Utc::now();
        Car {
            id: 1,
            user_id: owner,
            car_name: "Clio".into(),
            city: "Paris".into(),
            car_type: "sedan".into(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn request(owner: i64) -> CarRequest {
        let now = Utc::now();
        CarRequest {
            id: 3,
            user_id: owner,
            user_name: "someone".into(),
            car_type: "sedan".into(),
            car_id: None,
            city: "Paris".into(),
            address: "here".into(),
            active: true,
            rating: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_customer_cannot_act_as_driver() {
        let err = require_driver(&claims(1, UserRole::Customer), "create cars").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Auth);
        assert!(require_driver(&claims(1, UserRole::Driver), "create cars").is_ok());
    }

    #[test]
    fn test_only_owner_mutates_car() {
        let driver = claims(5, UserRole::Driver);
        assert!(require_car_owner(&driver, &car(5)).is_ok());
        let err = require_car_owner(&driver, &car(7)).unwrap_err();
        assert_eq!(err.to_string(), "the car does not belong to you");
    }

    #[test]
    fn test_requester_or_any_driver_mutates_request() {
        assert!(require_car_request_access(&claims(9, UserRole::Customer), &request(9)).is_ok());
        assert!(require_car_request_access(&claims(2, UserRole::Driver), &request(9)).is_ok());
        assert!(require_car_request_access(&claims(8, UserRole::Customer), &request(9)).is_err());
    }

    #[test]
    fn test_customer_listing_scope() {
        let customer = claims(9, UserRole::Customer);
        assert!(require_listing_scope(&customer, Some(9)).is_ok());
        assert!(require_listing_scope(&customer, Some(10)).is_err());
        assert!(require_listing_scope(&customer, None).is_err());
        assert!(require_listing_scope(&claims(2, UserRole::Driver), None).is_ok());
    }
}
