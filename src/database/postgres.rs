use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Bookmark, BookmarkChanges, BookmarkCount, Collection, CollectionSummary, NewBookmark,
    NewCollection, NewUser, User,
};
use crate::database::repository::Store;

const BOOKMARK_COLUMNS: &str =
    "id, url, title, description, tags, collection_id, user_id, created_at";

#[derive(sqlx::FromRow)]
struct CollectionCountRow {
    id: Uuid,
    name: String,
    user_id: String,
    created_at: chrono::DateTime<Utc>,
    bookmark_count: i64,
}

impl From<CollectionCountRow> for CollectionSummary {
    fn from(row: CollectionCountRow) -> Self {
        CollectionSummary {
            collection: Collection {
                id: row.id,
                name: row.name,
                user_id: row.user_id,
                created_at: row.created_at,
            },
            count: BookmarkCount {
                bookmarks: row.bookmark_count,
            },
        }
    }
}

/// PostgreSQL-backed store sharing one connection pool across requests
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn upsert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let insert_name = user.insert_name();

        let row = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, name, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
                SET email = EXCLUDED.email,
                    name = COALESCE($5, users.name)
            RETURNING id, email, name, created_at
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&insert_name)
        .bind(Utc::now())
        .bind(user.name.as_deref().filter(|n| !n.trim().is_empty()))
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_collection(&self, collection: NewCollection) -> Result<Collection, DatabaseError> {
        let row = sqlx::query_as::<_, Collection>(
            r#"
            INSERT INTO collections (id, name, user_id, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, user_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&collection.name)
        .bind(&collection.user_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_collection(&self, id: Uuid) -> Result<Option<Collection>, DatabaseError> {
        let row = sqlx::query_as::<_, Collection>(
            "SELECT id, name, user_id, created_at FROM collections WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_collections(&self, user_id: &str) -> Result<Vec<CollectionSummary>, DatabaseError> {
        let rows = sqlx::query_as::<_, CollectionCountRow>(
            r#"
            SELECT c.id, c.name, c.user_id, c.created_at,
                   COUNT(b.id) AS bookmark_count
            FROM collections c
            LEFT JOIN bookmarks b ON b.collection_id = c.id
            WHERE c.user_id = $1
            GROUP BY c.id
            ORDER BY c.created_at DESC, c.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CollectionSummary::from).collect())
    }

    async fn delete_collection(&self, id: Uuid) -> Result<u64, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM bookmarks WHERE collection_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM collections WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Err(DatabaseError::NotFound("Collection not found".to_string()));
        }

        tx.commit().await?;
        Ok(removed)
    }

    async fn create_bookmark(&self, bookmark: NewBookmark) -> Result<Bookmark, DatabaseError> {
        let sql = format!(
            r#"
            INSERT INTO bookmarks (id, url, title, description, tags, collection_id, user_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {BOOKMARK_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, Bookmark>(&sql)
            .bind(Uuid::new_v4())
            .bind(&bookmark.url)
            .bind(&bookmark.title)
            .bind(&bookmark.description)
            .bind(&bookmark.tags)
            .bind(bookmark.collection_id)
            .bind(&bookmark.user_id)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    async fn find_bookmark(&self, id: Uuid) -> Result<Option<Bookmark>, DatabaseError> {
        let sql = format!("SELECT {BOOKMARK_COLUMNS} FROM bookmarks WHERE id = $1");
        let row = sqlx::query_as::<_, Bookmark>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn list_bookmarks(&self, user_id: &str) -> Result<Vec<Bookmark>, DatabaseError> {
        let sql = format!(
            "SELECT {BOOKMARK_COLUMNS} FROM bookmarks WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, Bookmark>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn list_collection_bookmarks(&self, collection_id: Uuid) -> Result<Vec<Bookmark>, DatabaseError> {
        let sql = format!(
            "SELECT {BOOKMARK_COLUMNS} FROM bookmarks WHERE collection_id = $1 ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, Bookmark>(&sql)
            .bind(collection_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn update_bookmark(&self, id: Uuid, changes: BookmarkChanges) -> Result<Bookmark, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE bookmarks
            SET url = $2, title = $3, description = $4, tags = $5, collection_id = $6
            WHERE id = $1
            RETURNING {BOOKMARK_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Bookmark>(&sql)
            .bind(id)
            .bind(&changes.url)
            .bind(&changes.title)
            .bind(&changes.description)
            .bind(&changes.tags)
            .bind(changes.collection_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("Bookmark not found".to_string()))
    }

    async fn delete_bookmark(&self, id: Uuid) -> Result<(), DatabaseError> {
        let deleted = sqlx::query("DELETE FROM bookmarks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(DatabaseError::NotFound("Bookmark not found".to_string()));
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
