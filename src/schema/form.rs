use super::{DependencyGraph, Field};
use crate::error::SchemaError;
use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction for moving a field one slot in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Field counts shown when saving a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormSummary {
    pub fields: usize,
    pub required: usize,
    pub derived: usize,
}

/// The saved definition of a form: its ordered fields and metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    pub id: String,
    pub name: String,
    pub fields: Vec<Field>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FormSchema {
    /// Creates an empty form with a fresh id.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            fields: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Fields sorted by `order`; ties keep insertion order.
    pub fn sorted_fields(&self) -> Vec<&Field> {
        self.fields.iter().sorted_by_key(|f| f.order).collect()
    }

    /// Checks field id uniqueness and every derived configuration.
    pub fn check(&self) -> Result<DependencyGraph, SchemaError> {
        DependencyGraph::build(&self.fields)
    }

    pub fn summary(&self) -> FormSummary {
        FormSummary {
            fields: self.fields.len(),
            required: self.fields.iter().filter(|f| f.required).count(),
            derived: self.fields.iter().filter(|f| f.is_derived()).count(),
        }
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    pub fn add_field(&mut self, field: Field) -> Result<(), SchemaError> {
        if self.field(&field.id).is_some() {
            return Err(SchemaError::DuplicateFieldId(field.id));
        }
        self.fields.push(field);
        self.touch();
        Ok(())
    }

    /// Applies `edit` to the field with the given id.
    ///
    /// The field's id and type cannot change; an edit that changes either is
    /// rejected and the field is left untouched.
    pub fn update_field<F>(&mut self, id: &str, edit: F) -> Result<(), SchemaError>
    where
        F: FnOnce(&mut Field),
    {
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| SchemaError::FieldNotFound(id.to_string()))?;

        let mut edited = field.clone();
        edit(&mut edited);
        if edited.field_type != field.field_type {
            return Err(SchemaError::TypeChange {
                field_id: id.to_string(),
                from: field.field_type.to_string(),
                to: edited.field_type.to_string(),
            });
        }
        if edited.id != field.id {
            return Err(SchemaError::IdChange {
                from: field.id.clone(),
                to: edited.id,
            });
        }
        *field = edited;
        self.touch();
        Ok(())
    }

    /// Removes a field and returns it.
    pub fn delete_field(&mut self, id: &str) -> Result<Field, SchemaError> {
        let index = self
            .fields
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| SchemaError::FieldNotFound(id.to_string()))?;
        let removed = self.fields.remove(index);
        self.touch();
        Ok(removed)
    }

    /// Rearranges fields into the order of `ids` and renumbers `order` from 0.
    ///
    /// `ids` must name every field exactly once.
    pub fn reorder_fields(&mut self, ids: &[String]) -> Result<(), SchemaError> {
        if let Some(duplicate) = ids.iter().duplicates().next() {
            return Err(SchemaError::DuplicateFieldId(duplicate.clone()));
        }
        let mut reordered = Vec::with_capacity(self.fields.len());
        for id in ids {
            let field = self
                .field(id)
                .ok_or_else(|| SchemaError::FieldNotFound(id.clone()))?;
            reordered.push(field.clone());
        }
        if let Some(missing) = self.fields.iter().find(|f| !ids.contains(&f.id)) {
            return Err(SchemaError::FieldNotFound(missing.id.clone()));
        }

        for (index, field) in reordered.iter_mut().enumerate() {
            field.order = index as i64;
        }
        self.fields = reordered;
        self.touch();
        Ok(())
    }

    /// Swaps a field with its neighbour in display order.
    ///
    /// Returns `false` when the field is already at that edge.
    pub fn move_field(&mut self, id: &str, direction: MoveDirection) -> Result<bool, SchemaError> {
        let mut ids: Vec<String> = self.sorted_fields().iter().map(|f| f.id.clone()).collect();
        let current = ids
            .iter()
            .position(|f| f == id)
            .ok_or_else(|| SchemaError::FieldNotFound(id.to_string()))?;
        let target = match direction {
            MoveDirection::Up if current > 0 => current - 1,
            MoveDirection::Down if current + 1 < ids.len() => current + 1,
            _ => return Ok(false),
        };
        ids.swap(current, target);
        self.reorder_fields(&ids)?;
        Ok(true)
    }
}
