use async_trait::async_trait;
use sqlx::PgPool;

use super::{conflict_on_violation, with_deadline, StoreResult, UserStore};
use crate::models::user::{NewUser, User};

const USER_COLUMNS: &str =
    "id, email, password_hash, first_name, last_name, city, role, active, created_at, updated_at";

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let sql = format!(
            "INSERT INTO users (email, password_hash, first_name, last_name, city, role, active)
             VALUES ($1, $2, $3, $4, $5, $6, TRUE)
             RETURNING {USER_COLUMNS}"
        );
        with_deadline(
            sqlx::query_as::<_, User>(&sql)
                .bind(&user.email)
                .bind(&user.password_hash)
                .bind(&user.first_name)
                .bind(&user.last_name)
                .bind(&user.city)
                .bind(user.role.to_string())
                .fetch_one(&self.pool),
        )
        .await
        .map_err(|e| conflict_on_violation(e, "email already exists"))
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        with_deadline(
            sqlx::query_as::<_, User>(&sql)
                .bind(email)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn user_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        with_deadline(
            sqlx::query_as::<_, User>(&sql)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn update_user(&self, user: &User) -> StoreResult<User> {
        let sql = format!(
            "UPDATE users
             SET email = $1, first_name = $2, last_name = $3, city = $4,
                 active = $5, updated_at = NOW()
             WHERE id = $6
             RETURNING {USER_COLUMNS}"
        );
        with_deadline(
            sqlx::query_as::<_, User>(&sql)
                .bind(&user.email)
                .bind(&user.first_name)
                .bind(&user.last_name)
                .bind(&user.city)
                .bind(user.active)
                .bind(user.id)
                .fetch_one(&self.pool),
        )
        .await
        .map_err(|e| conflict_on_violation(e, "email already exists"))
    }

    async fn ping(&self) -> StoreResult<()> {
        with_deadline(sqlx::query("SELECT 1").execute(&self.pool)).await?;
        Ok(())
    }
}
