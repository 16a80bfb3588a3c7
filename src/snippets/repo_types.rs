use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub code: String,
    pub language: String,
    pub tags: Vec<String>,
    pub is_public: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Public projection of a snippet's owner.
#[derive(Debug, Clone, Serialize)]
pub struct OwnerInfo {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicSnippet {
    #[serde(flatten)]
    pub snippet: Snippet,
    pub user: OwnerInfo,
}

/// Join row for the public listing.
#[derive(Debug, FromRow)]
pub struct PublicSnippetRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub code: String,
    pub language: String,
    pub tags: Vec<String>,
    pub is_public: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub owner_name: Option<String>,
    pub owner_email: String,
}

impl From<PublicSnippetRow> for PublicSnippet {
    fn from(r: PublicSnippetRow) -> Self {
        Self {
            user: OwnerInfo {
                id: r.user_id,
                name: r.owner_name,
                email: r.owner_email,
            },
            snippet: Snippet {
                id: r.id,
                user_id: r.user_id,
                title: r.title,
                description: r.description,
                code: r.code,
                language: r.language,
                tags: r.tags,
                is_public: r.is_public,
                created_at: r.created_at,
                updated_at: r.updated_at,
            },
        }
    }
}

/// Already-normalized input for an insert.
#[derive(Debug, Clone)]
pub struct NewSnippet {
    pub title: String,
    pub description: Option<String>,
    pub code: String,
    pub language: String,
    pub tags: Vec<String>,
    pub is_public: bool,
}

/// Partial update; `None` leaves a column untouched.
#[derive(Debug, Clone, Default)]
pub struct SnippetChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub code: Option<String>,
    pub language: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_public: Option<bool>,
}

impl SnippetChanges {
    pub fn apply(self, snippet: &mut Snippet) {
        if let Some(title) = self.title {
            snippet.title = title;
        }
        if let Some(description) = self.description {
            snippet.description = description;
        }
        if let Some(code) = self.code {
            snippet.code = code;
        }
        if let Some(language) = self.language {
            snippet.language = language;
        }
        if let Some(tags) = self.tags {
            snippet.tags = tags;
        }
        if let Some(is_public) = self.is_public {
            snippet.is_public = is_public;
        }
    }
}
