use crate::error::StoreError;
use chrono::Utc;
use serde::Serialize;
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use std::future::Future;
use std::pin::Pin;

/// A registered account. The password hash never leaves the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing)]
    pub created_at: String,
    #[serde(skip_serializing)]
    pub updated_at: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Async account persistence contract.
pub trait UserStore: Send + Sync {
    /// Insert a user. Fails with [`StoreError::DuplicateEmail`] when the
    /// email is already taken.
    fn create<'a>(
        &'a self,
        user: NewUser,
    ) -> Pin<Box<dyn Future<Output = Result<User, StoreError>> + Send + 'a>>;

    fn find_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<User>, StoreError>> + Send + 'a>>;

    fn find_by_id<'a>(
        &'a self,
        id: i64,
    ) -> Pin<Box<dyn Future<Output = Result<Option<User>, StoreError>> + Send + 'a>>;
}

/// SQLite-backed user store. Expects the schema from [`crate::db::connect`].
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn map_user_row(row: &SqliteRow) -> Result<User, StoreError> {
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

impl UserStore for SqliteUserStore {
    fn create<'a>(
        &'a self,
        user: NewUser,
    ) -> Pin<Box<dyn Future<Output = Result<User, StoreError>> + Send + 'a>> {
        Box::pin(async move {
            let timestamp = Utc::now().to_rfc3339();
            let result = sqlx::query(
                "INSERT INTO users (name, email, password_hash, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $4)",
            )
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&timestamp)
            .execute(&self.pool)
            .await;

            let done = match result {
                Ok(done) => done,
                Err(err) if is_unique_violation(&err) => return Err(StoreError::DuplicateEmail),
                Err(err) => return Err(err.into()),
            };

            Ok(User {
                id: done.last_insert_rowid(),
                name: user.name,
                email: user.email,
                password_hash: user.password_hash,
                created_at: timestamp.clone(),
                updated_at: timestamp,
            })
        })
    }

    fn find_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<User>, StoreError>> + Send + 'a>> {
        Box::pin(async move {
            let row = sqlx::query(
                "SELECT id, name, email, password_hash, created_at, updated_at
                 FROM users
                 WHERE email = $1",
            )
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

            row.map(|r| map_user_row(&r)).transpose()
        })
    }

    fn find_by_id<'a>(
        &'a self,
        id: i64,
    ) -> Pin<Box<dyn Future<Output = Result<Option<User>, StoreError>> + Send + 'a>> {
        Box::pin(async move {
            let row = sqlx::query(
                "SELECT id, name, email, password_hash, created_at, updated_at
                 FROM users
                 WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

            row.map(|r| map_user_row(&r)).transpose()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store() -> SqliteUserStore {
        let pool = crate::db::connect("sqlite::memory:", 1).await.unwrap();
        SqliteUserStore::new(pool)
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ada".into(),
            email: email.into(),
            password_hash: "pbkdf2-sha256$1000$00$00".into(),
        }
    }

    #[tokio::test]
    async fn create_assigns_ids_and_timestamps() {
        let store = store().await;
        let first = store.create(new_user("ada@example.com")).await.unwrap();
        let second = store.create(new_user("bob@example.com")).await.unwrap();

        assert!(first.id > 0);
        assert_ne!(first.id, second.id);
        assert_eq!(first.created_at, first.updated_at);
        assert!(chrono::DateTime::parse_from_rfc3339(&first.created_at).is_ok());
    }

    #[tokio::test]
    async fn duplicate_email_is_reported() {
        let store = store().await;
        store.create(new_user("ada@example.com")).await.unwrap();
        let err = store.create(new_user("ada@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[tokio::test]
    async fn lookups_by_email_and_id() {
        let store = store().await;
        let created = store.create(new_user("ada@example.com")).await.unwrap();

        let by_email = store.find_by_email("ada@example.com").await.unwrap();
        let by_id = store.find_by_id(created.id).await.unwrap();
        assert_eq!(by_email.as_ref(), Some(&created));
        assert_eq!(by_id, Some(created));

        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
        assert!(store.find_by_id(9_999).await.unwrap().is_none());
    }

    #[test]
    fn serialized_user_hides_secrets() {
        let user = User {
            id: 1,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: "secret".into(),
            created_at: String::new(),
            updated_at: String::new(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 1, "name": "Ada", "email": "ada@example.com"})
        );
    }
}
