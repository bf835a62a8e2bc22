//! In-memory `UpdateStore` double and fixtures shared by the pipeline suites.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use competeaware_core::{
    CandidateUpdate, Classification, Competitor, PendingUpdate, UpdateStore, PENDING_CATEGORY,
};

#[derive(Debug, Clone, PartialEq)]
pub struct StoredUpdate {
    pub id: i64,
    pub competitor_id: i64,
    pub title: String,
    pub content: Option<String>,
    pub category: Option<String>,
    pub impact_score: f64,
    pub detected_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    competitors: Vec<Competitor>,
    updates: Vec<StoredUpdate>,
    next_id: i64,
    fail_inserts: bool,
    fail_pending: bool,
    apply_calls: usize,
}

#[derive(Debug)]
pub struct MemoryStoreError(pub &'static str);

impl std::fmt::Display for MemoryStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "memory store: {}", self.0)
    }
}

impl std::error::Error for MemoryStoreError {}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn with_competitors(competitors: Vec<Competitor>) -> Self {
        let store = Self::default();
        store.state.lock().unwrap().competitors = competitors;
        store
    }

    pub fn updates(&self) -> Vec<StoredUpdate> {
        self.state.lock().unwrap().updates.clone()
    }

    pub fn apply_calls(&self) -> usize {
        self.state.lock().unwrap().apply_calls
    }

    pub fn fail_inserts(&self) {
        self.state.lock().unwrap().fail_inserts = true;
    }

    pub fn fail_pending(&self) {
        self.state.lock().unwrap().fail_pending = true;
    }

    /// Stores a row directly, bypassing the pipeline.
    pub fn seed_update(
        &self,
        competitor_id: i64,
        content: Option<&str>,
        category: Option<&str>,
        detected_at: DateTime<Utc>,
    ) -> i64 {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        state.updates.push(StoredUpdate {
            id,
            competitor_id,
            title: "seeded".to_string(),
            content: content.map(str::to_string),
            category: category.map(str::to_string),
            impact_score: 0.0,
            detected_at,
        });
        id
    }
}

impl UpdateStore for MemoryStore {
    type Error = MemoryStoreError;

    async fn list_active_competitors(&self) -> Result<Vec<Competitor>, MemoryStoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .competitors
            .iter()
            .filter(|c| c.is_active)
            .cloned()
            .collect())
    }

    async fn insert_update(&self, update: &CandidateUpdate) -> Result<i64, MemoryStoreError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_inserts {
            return Err(MemoryStoreError("insert refused"));
        }
        state.next_id += 1;
        let id = state.next_id;
        state.updates.push(StoredUpdate {
            id,
            competitor_id: update.competitor_id,
            title: update.title.clone(),
            content: Some(update.content.clone()),
            category: Some(update.category.clone()),
            impact_score: 0.0,
            detected_at: update.detected_at,
        });
        Ok(id)
    }

    async fn find_recent_match(
        &self,
        competitor_id: i64,
        needle: &str,
        since: DateTime<Utc>,
    ) -> Result<Option<i64>, MemoryStoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .updates
            .iter()
            .filter(|u| u.competitor_id == competitor_id && u.detected_at > since)
            .find(|u| u.content.as_deref().is_some_and(|c| c.contains(needle)))
            .map(|u| u.id))
    }

    async fn list_pending_updates(&self) -> Result<Vec<PendingUpdate>, MemoryStoreError> {
        let state = self.state.lock().unwrap();
        if state.fail_pending {
            return Err(MemoryStoreError("pending query refused"));
        }
        Ok(state
            .updates
            .iter()
            .filter(|u| u.category.as_deref().is_none_or(|c| c == PENDING_CATEGORY))
            .map(|u| PendingUpdate {
                id: u.id,
                content: u.content.clone(),
            })
            .collect())
    }

    async fn apply_classifications(
        &self,
        batch: &[Classification],
    ) -> Result<usize, MemoryStoreError> {
        let mut state = self.state.lock().unwrap();
        state.apply_calls += 1;
        let mut changed = 0;
        for classification in batch {
            if let Some(update) = state
                .updates
                .iter_mut()
                .find(|u| u.id == classification.update_id)
            {
                update.category = Some(classification.category.as_str().to_string());
                update.impact_score = classification.confidence;
                changed += 1;
            }
        }
        Ok(changed)
    }
}

pub fn competitor(id: i64, name: &str, website: Option<&str>) -> Competitor {
    Competitor {
        id,
        name: name.to_string(),
        website: website.map(str::to_string),
        social_handles: serde_json::json!({}),
        is_active: true,
        created_at: Utc::now(),
    }
}

/// A unique, not-yet-existing classifier artifact path.
pub fn temp_model_path() -> PathBuf {
    std::env::temp_dir().join(format!(
        "competeaware-pipeline-model-{}.json",
        uuid::Uuid::new_v4()
    ))
}

pub struct Cleanup(pub PathBuf);

impl Drop for Cleanup {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}
