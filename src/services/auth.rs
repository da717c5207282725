use lazy_static::lazy_static;
use tracing::{info, warn};

use super::metrics::AUTHENTICATIONS_COUNTER;
use super::token::TokenKeys;
use crate::{
    db::UserStore,
    error::AppError,
    models::{
        auth::Claims,
        user::{AuthenticateResponse, NewUser, RegisterRequest, UpdateUserRequest, User},
    },
};

lazy_static! {
    /// Compared against on unknown or inactive accounts so that every
    /// rejected login pays for one bcrypt verification.
    static ref DUMMY_HASH: String =
        bcrypt::hash("ridehail-dummy-password", bcrypt::DEFAULT_COST).unwrap_or_default();
}

pub struct AuthService;

impl AuthService {
    /// Create an account. Input checks run before the store is consulted.
    pub async fn register(
        store: &dyn UserStore,
        req: &RegisterRequest,
        bcrypt_cost: u32,
    ) -> Result<User, AppError> {
        req.validate()?;

        if store.user_by_email(&req.email).await?.is_some() {
            return Err(AppError::validation("email already exists"));
        }

        let password_hash = bcrypt::hash(&req.password, bcrypt_cost)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("password hashing failed: {e}")))?;

        // A concurrent registration can still win the race; the store reports it as a conflict.
        let user = store
            .insert_user(NewUser {
                email: req.email.clone(),
                password_hash,
                first_name: req.first_name.clone(),
                last_name: req.last_name.clone(),
                city: req.city.clone(),
                role: req.role.unwrap_or_default(),
            })
            .await?;

        info!("Registered user {} as {}", user.id, user.role);
        Ok(user)
    }

    /// Check credentials and issue a token.
    pub async fn authenticate(
        store: &dyn UserStore,
        keys: &TokenKeys,
        email: &str,
        password: &str,
    ) -> Result<AuthenticateResponse, AppError> {
        let Some(user) = store.user_by_email(email).await?.filter(|u| u.active) else {
            let _ = bcrypt::verify(password, &DUMMY_HASH);
            AUTHENTICATIONS_COUNTER.with_label_values(&["rejected"]).inc();
            warn!("Authentication failed: unknown or inactive account");
            return Err(AppError::InvalidCredentials);
        };

        // bcrypt::verify compares digests in constant time
        let valid = bcrypt::verify(password, &user.password_hash).unwrap_or(false);
        if !valid {
            AUTHENTICATIONS_COUNTER.with_label_values(&["rejected"]).inc();
            warn!("Authentication failed for user {}", user.id);
            return Err(AppError::InvalidCredentials);
        }

        let token = keys.issue(&user)?;
        AUTHENTICATIONS_COUNTER.with_label_values(&["accepted"]).inc();
        Ok(AuthenticateResponse { user, token })
    }

    /// Update the caller's own profile.
    pub async fn update_user(
        store: &dyn UserStore,
        caller: &Claims,
        id: i64,
        req: &UpdateUserRequest,
    ) -> Result<User, AppError> {
        req.validate()?;

        if caller.id != id {
            warn!("User {} attempted to update user {}", caller.id, id);
            return Err(AppError::permission("you can only update your own account"));
        }

        let mut user = store
            .user_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("user not found"))?;

        if let Some(email) = req.email.as_ref().filter(|e| **e != user.email) {
            if store.user_by_email(email).await?.is_some() {
                return Err(AppError::validation("email already exists"));
            }
            user.email = email.clone();
        }
        if let Some(first_name) = &req.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &req.last_name {
            user.last_name = last_name.clone();
        }
        if let Some(city) = &req.city {
            user.city = city.clone();
        }

        Ok(store.update_user(&user).await?)
    }
}
