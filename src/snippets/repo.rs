use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::StoreError;
use crate::snippets::repo_types::{
    NewSnippet, PublicSnippet, PublicSnippetRow, Snippet, SnippetChanges,
};

/// Snippet persistence. Every id-addressed operation is scoped by owner:
/// a row owned by someone else behaves exactly like a missing row.
#[async_trait]
pub trait SnippetStore: Send + Sync {
    /// Newest first.
    async fn list_for_owner(&self, owner: Uuid) -> Result<Vec<Snippet>, StoreError>;
    async fn find_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Snippet>, StoreError>;
    async fn create(&self, owner: Uuid, new: NewSnippet) -> Result<Snippet, StoreError>;
    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: SnippetChanges,
    ) -> Result<Option<Snippet>, StoreError>;
    /// Returns whether a row was removed.
    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError>;
    /// Public snippets of all users, newest first.
    async fn list_public(&self) -> Result<Vec<PublicSnippet>, StoreError>;
}

#[derive(Clone)]
pub struct PgSnippetStore {
    db: PgPool,
}

impl PgSnippetStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SnippetStore for PgSnippetStore {
    async fn list_for_owner(&self, owner: Uuid) -> Result<Vec<Snippet>, StoreError> {
        let rows = sqlx::query_as::<_, Snippet>(
            r#"
            SELECT id, user_id, title, description, code, language, tags, is_public,
                   created_at, updated_at
            FROM snippets
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Snippet>, StoreError> {
        let row = sqlx::query_as::<_, Snippet>(
            r#"
            SELECT id, user_id, title, description, code, language, tags, is_public,
                   created_at, updated_at
            FROM snippets
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn create(&self, owner: Uuid, new: NewSnippet) -> Result<Snippet, StoreError> {
        let row = sqlx::query_as::<_, Snippet>(
            r#"
            INSERT INTO snippets (user_id, title, description, code, language, tags, is_public)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, title, description, code, language, tags, is_public,
                      created_at, updated_at
            "#,
        )
        .bind(owner)
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.code)
        .bind(&new.language)
        .bind(&new.tags)
        .bind(new.is_public)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: SnippetChanges,
    ) -> Result<Option<Snippet>, StoreError> {
        let mut tx = self.db.begin().await?;

        let current = sqlx::query_as::<_, Snippet>(
            r#"
            SELECT id, user_id, title, description, code, language, tags, is_public,
                   created_at, updated_at
            FROM snippets
            WHERE id = $1 AND user_id = $2
            FOR UPDATE
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(mut snippet) = current else {
            return Ok(None);
        };
        changes.apply(&mut snippet);

        let updated = sqlx::query_as::<_, Snippet>(
            r#"
            UPDATE snippets
            SET title = $2, description = $3, code = $4, language = $5, tags = $6,
                is_public = $7, updated_at = now()
            WHERE id = $1
            RETURNING id, user_id, title, description, code, language, tags, is_public,
                      created_at, updated_at
            "#,
        )
        .bind(snippet.id)
        .bind(&snippet.title)
        .bind(&snippet.description)
        .bind(&snippet.code)
        .bind(&snippet.language)
        .bind(&snippet.tags)
        .bind(snippet.is_public)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM snippets WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_public(&self) -> Result<Vec<PublicSnippet>, StoreError> {
        let rows = sqlx::query_as::<_, PublicSnippetRow>(
            r#"
            SELECT s.id, s.user_id, s.title, s.description, s.code, s.language, s.tags,
                   s.is_public, s.created_at, s.updated_at,
                   u.name AS owner_name, u.email AS owner_email
            FROM snippets s
            JOIN users u ON u.id = s.user_id
            WHERE s.is_public
            ORDER BY s.created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(PublicSnippet::from).collect())
    }
}
