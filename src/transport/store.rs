use crate::foundation::error::{LuminaError, LuminaResult};
use crate::model::intent::DesignIntent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named design as persisted for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDesign {
    pub design_id: String,
    pub name: String,
    pub intent: DesignIntent,
    pub updated_at: DateTime<Utc>,
}

impl StoredDesign {
    pub fn new(
        design_id: impl Into<String>,
        name: impl Into<String>,
        intent: DesignIntent,
    ) -> Self {
        Self {
            design_id: design_id.into(),
            name: name.into(),
            intent,
            updated_at: Utc::now(),
        }
    }
}

/// Persistence for designs, keyed by user id and design id.
pub trait DesignStore {
    /// Insert or replace.
    fn save(&mut self, user_id: &str, design: StoredDesign) -> LuminaResult<()>;
    fn load(&self, user_id: &str, design_id: &str) -> LuminaResult<Option<StoredDesign>>;
    /// Returns whether a design was removed.
    fn delete(&mut self, user_id: &str, design_id: &str) -> LuminaResult<bool>;
    /// All of a user's designs, most recently updated first.
    fn list(&self, user_id: &str) -> LuminaResult<Vec<StoredDesign>>;
}

/// In-memory store, used by tests and short-lived sessions.
#[derive(Debug, Default)]
pub struct MemoryDesignStore {
    designs: BTreeMap<(String, String), StoredDesign>,
}

impl MemoryDesignStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.designs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.designs.is_empty()
    }
}

fn require_id(kind: &str, id: &str) -> LuminaResult<()> {
    if id.trim().is_empty() {
        return Err(LuminaError::validation(format!("{kind} id must be non-empty")));
    }
    Ok(())
}

impl DesignStore for MemoryDesignStore {
    fn save(&mut self, user_id: &str, design: StoredDesign) -> LuminaResult<()> {
        require_id("user", user_id)?;
        require_id("design", &design.design_id)?;
        tracing::debug!(user_id, design_id = design.design_id.as_str(), "saved design");
        self.designs
            .insert((user_id.to_string(), design.design_id.clone()), design);
        Ok(())
    }

    fn load(&self, user_id: &str, design_id: &str) -> LuminaResult<Option<StoredDesign>> {
        require_id("user", user_id)?;
        Ok(self
            .designs
            .get(&(user_id.to_string(), design_id.to_string()))
            .cloned())
    }

    fn delete(&mut self, user_id: &str, design_id: &str) -> LuminaResult<bool> {
        require_id("user", user_id)?;
        Ok(self
            .designs
            .remove(&(user_id.to_string(), design_id.to_string()))
            .is_some())
    }

    fn list(&self, user_id: &str) -> LuminaResult<Vec<StoredDesign>> {
        require_id("user", user_id)?;
        let mut out: Vec<StoredDesign> = self
            .designs
            .iter()
            .filter(|((owner, _), _)| owner == user_id)
            .map(|(_, d)| d.clone())
            .collect();
        out.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transport/store.rs"]
mod tests;
