use crate::error::{is_unique_violation, AppError, Result};
use crate::models::{CreateUserRequest, Pagination, UpdateUserRequest, User};
use crate::services::password::hash_password;
use sqlx::SqlitePool;

const USER_COLUMNS: &str = "id, username, email, password";

pub struct UserService {
    db: SqlitePool,
}

impl UserService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create(&self, req: CreateUserRequest) -> Result<User> {
        let password_hash = hash_password(&req.password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, password) VALUES (?, ?, ?) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&req.username)
        .bind(&req.email)
        .bind(&password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(duplicate_user)?;

        tracing::info!(user_id = user.id, "Created user '{}'", user.username);
        Ok(user)
    }

    pub async fn get(&self, id: i64) -> Result<User> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("User"))
    }

    pub async fn list(&self, page: Pagination) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY id LIMIT ? OFFSET ?",
            USER_COLUMNS
        ))
        .bind(page.limit())
        .bind(page.skip())
        .fetch_all(&self.db)
        .await?;

        Ok(users)
    }

    /// Apply the non-blank fields of `req`. An empty update returns the user unchanged.
    pub async fn update(&self, id: i64, req: UpdateUserRequest) -> Result<User> {
        let mut user = self.get(id).await?;
        let req = req.normalized();

        if req.username.is_none() && req.email.is_none() {
            return Ok(user);
        }
        if let Some(username) = req.username {
            user.username = username;
        }
        if let Some(email) = req.email {
            user.email = email;
        }

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET username = ?, email = ? WHERE id = ? RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&user.username)
        .bind(&user.email)
        .bind(id)
        .fetch_one(&self.db)
        .await
        .map_err(duplicate_user)?;

        tracing::debug!(user_id = id, "Updated user");
        Ok(user)
    }

    /// Remove the user together with the music and playlists they own.
    pub async fn delete(&self, id: i64) -> Result<User> {
        let user = self.get(id).await?;

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        tracing::info!(user_id = id, "Deleted user '{}'", user.username);
        Ok(user)
    }
}

pub(crate) async fn user_exists(db: &SqlitePool, id: i64) -> Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = ?")
        .bind(id)
        .fetch_one(db)
        .await?;

    if count == 0 {
        return Err(AppError::not_found("User"));
    }
    Ok(())
}

fn duplicate_user(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e) {
        AppError::AlreadyExists("Username or email already exists".to_string())
    } else {
        AppError::Database(e)
    }
}
