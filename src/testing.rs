//! In-memory stores and fixtures for exercising handlers without Postgres.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo::UserStore;
use crate::auth::repo_types::{NewUser, User, UserChanges};
use crate::config::{AppConfig, Environment, JwtConfig};
use crate::error::StoreError;
use crate::snippets::repo::SnippetStore;
use crate::snippets::repo_types::{
    NewSnippet, OwnerInfo, PublicSnippet, Snippet, SnippetChanges,
};
use crate::state::AppState;

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
}

impl MemoryUserStore {
    pub fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(&self, new: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == new.email) {
            return Err(StoreError::Conflict);
        }
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            email: new.email,
            password_hash: new.password_hash,
            name: new.name,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, StoreError> {
        let mut users = self.users.lock().unwrap();
        if let Some(email) = &changes.email {
            if users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(StoreError::Conflict);
            }
        }
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(name) = changes.name {
            user.name = name;
        }
        user.updated_at = OffsetDateTime::now_utc();
        Ok(Some(user.clone()))
    }
}

/// User store whose lookups never see existing rows, so duplicate emails
/// only surface when the insert or update hits the unique constraint.
pub struct RacingUserStore {
    pub inner: Arc<MemoryUserStore>,
}

#[async_trait]
impl UserStore for RacingUserStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, StoreError> {
        Ok(None)
    }

    async fn create(&self, new: NewUser) -> Result<User, StoreError> {
        self.inner.create(new).await
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, StoreError> {
        self.inner.update(id, changes).await
    }
}

pub struct MemorySnippetStore {
    users: Arc<MemoryUserStore>,
    snippets: Mutex<Vec<Snippet>>,
}

impl MemorySnippetStore {
    pub fn new(users: Arc<MemoryUserStore>) -> Self {
        Self {
            users,
            snippets: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SnippetStore for MemorySnippetStore {
    async fn list_for_owner(&self, owner: Uuid) -> Result<Vec<Snippet>, StoreError> {
        Ok(self
            .snippets
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|s| s.user_id == owner)
            .cloned()
            .collect())
    }

    async fn find_owned(&self, id: Uuid, owner: Uuid) -> Result<Option<Snippet>, StoreError> {
        Ok(self
            .snippets
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id && s.user_id == owner)
            .cloned())
    }

    async fn create(&self, owner: Uuid, new: NewSnippet) -> Result<Snippet, StoreError> {
        let now = OffsetDateTime::now_utc();
        let snippet = Snippet {
            id: Uuid::new_v4(),
            user_id: owner,
            title: new.title,
            description: new.description,
            code: new.code,
            language: new.language,
            tags: new.tags,
            is_public: new.is_public,
            created_at: now,
            updated_at: now,
        };
        self.snippets.lock().unwrap().push(snippet.clone());
        Ok(snippet)
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: SnippetChanges,
    ) -> Result<Option<Snippet>, StoreError> {
        let mut snippets = self.snippets.lock().unwrap();
        let Some(snippet) = snippets
            .iter_mut()
            .find(|s| s.id == id && s.user_id == owner)
        else {
            return Ok(None);
        };
        changes.apply(snippet);
        snippet.updated_at = OffsetDateTime::now_utc();
        Ok(Some(snippet.clone()))
    }

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError> {
        let mut snippets = self.snippets.lock().unwrap();
        let before = snippets.len();
        snippets.retain(|s| !(s.id == id && s.user_id == owner));
        Ok(snippets.len() < before)
    }

    async fn list_public(&self) -> Result<Vec<PublicSnippet>, StoreError> {
        let public: Vec<Snippet> = self
            .snippets
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|s| s.is_public)
            .cloned()
            .collect();

        let mut out = Vec::with_capacity(public.len());
        for snippet in public {
            let owner = self
                .users
                .find_by_id(snippet.user_id)
                .await?
                .expect("snippet owner exists");
            out.push(PublicSnippet {
                user: OwnerInfo {
                    id: owner.id,
                    name: owner.name,
                    email: owner.email,
                },
                snippet,
            });
        }
        Ok(out)
    }
}

pub fn test_config(environment: Environment) -> AppConfig {
    AppConfig {
        database_url: "postgres://unused".into(),
        db_max_connections: 1,
        jwt: JwtConfig {
            secret: "test-secret".into(),
            issuer: "codevault".into(),
            audience: "codevault-users".into(),
        },
        environment,
        host: "127.0.0.1".into(),
        port: 0,
        frontend_url: None,
    }
}

pub fn test_state_with(environment: Environment) -> (AppState, Arc<MemoryUserStore>) {
    let users = Arc::new(MemoryUserStore::default());
    let snippets = Arc::new(MemorySnippetStore::new(users.clone()));
    let state = AppState::from_parts(test_config(environment), users.clone(), snippets);
    (state, users)
}

/// State whose user store misses duplicates on lookup.
pub fn racing_state() -> (AppState, Arc<MemoryUserStore>) {
    let users = Arc::new(MemoryUserStore::default());
    let snippets = Arc::new(MemorySnippetStore::new(users.clone()));
    let racing = Arc::new(RacingUserStore {
        inner: users.clone(),
    });
    let state = AppState::from_parts(test_config(Environment::Development), racing, snippets);
    (state, users)
}

pub fn test_state() -> AppState {
    test_state_with(Environment::Development).0
}
