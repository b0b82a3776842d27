//! Entities returned by the service after an upload

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

/// Evaluation status of one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntityStatus {
    Pending,
    Evaluating,
    Evaluated,
    Failed,
}

impl fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "Pending",
            Self::Evaluating => "Evaluating",
            Self::Evaluated => "Evaluated",
            Self::Failed => "Failed",
        };
        f.write_str(label)
    }
}

/// One row of the service's entity listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityRecord {
    pub id: String,
    /// Primitive fields shown next to the id (e.g. `companyName`)
    pub display_fields: Map<String, Value>,
}

impl EntityRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.display_fields.insert(key.into(), value.into());
        self
    }

    /// Build a record from a listing object
    ///
    /// Returns `None` when `id_field` is missing or not a string. Nested
    /// arrays and objects are not display fields and are dropped.
    pub fn from_object(object: &Map<String, Value>, id_field: &str) -> Option<Self> {
        let id = object.get(id_field)?.as_str()?.to_string();
        let display_fields = object
            .iter()
            .filter(|(key, value)| key.as_str() != id_field && !value.is_array() && !value.is_object())
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Some(Self { id, display_fields })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    pub id: String,
    pub display_fields: Map<String, Value>,
    pub status: EntityStatus,
}

impl Entity {
    /// Display field as text, if present
    pub fn field(&self, key: &str) -> Option<String> {
        self.display_fields.get(key).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// Ordered id → entity mapping
///
/// Order is the order the service listed the entities in. A duplicate id
/// keeps the first occurrence's position and takes the later record's fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry with every entity `Pending`
    pub fn from_records(records: impl IntoIterator<Item = EntityRecord>) -> Self {
        let mut registry = Self::new();
        for record in records {
            registry.insert(record);
        }
        registry
    }

    /// Insert or overwrite an entity, status reset to `Pending`
    pub fn insert(&mut self, record: EntityRecord) {
        let entity = Entity {
            id: record.id,
            display_fields: record.display_fields,
            status: EntityStatus::Pending,
        };

        if let Some(&position) = self.index.get(&entity.id) {
            self.entities[position] = entity;
        } else {
            self.index.insert(entity.id.clone(), self.entities.len());
            self.entities.push(entity);
        }
    }

    /// Change an entity's status; unknown ids are ignored
    pub fn set_status(&mut self, id: &str, status: EntityStatus) {
        if let Some(&position) = self.index.get(id) {
            self.entities[position].status = status;
        }
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.index.get(id).map(|&position| &self.entities[position])
    }

    pub fn status(&self, id: &str) -> Option<EntityStatus> {
        self.get(id).map(|entity| entity.status)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.entities.iter().map(|entity| entity.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
