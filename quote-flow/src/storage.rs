use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use uuid::Uuid;

use crate::{error::Result, form::FormState, present::Presentation};

/// Form state belonging to one user.
#[derive(Debug, Clone, Serialize)]
pub struct FormSession {
    pub id: String,
    pub form: FormState,
    pub last_presentation: Option<Presentation>,
    /// Stamped by the store on every save.
    pub updated_at: DateTime<Utc>,
}

impl FormSession {
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            form: FormState::new(),
            last_presentation: None,
            updated_at: Utc::now(),
        }
    }
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Where form sessions live between requests. Implementations keep sessions isolated
/// by id; callers serialise writes to one session themselves.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn save(&self, session: FormSession) -> Result<()>;
    async fn get(&self, id: &str) -> Result<Option<FormSession>>;
    async fn delete(&self, id: &str) -> Result<()>;
}

/// Process-local store; sessions vanish with the process.
#[derive(Default)]
pub struct InMemorySessionStorage {
    sessions: DashMap<String, FormSession>,
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStorage for InMemorySessionStorage {
    async fn save(&self, mut session: FormSession) -> Result<()> {
        session.updated_at = Utc::now();
        self.sessions.insert(session.id.clone(), session);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<FormSession>> {
        Ok(self.sessions.get(id).map(|entry| entry.value().clone()))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.sessions.remove(id);
        Ok(())
    }
}
