//! Persistence of saved forms.
//!
//! Saved forms live as one JSON-encoded list under a single well-known key
//! of a string key-value backend, the way browser local storage holds them.
//! Every `KeyValueStore` is a `FormStore`.

use crate::error::StoreError;
use crate::schema::FormSchema;
use itertools::Itertools;
use tracing::{debug, info};

mod file;
mod memory;

pub use file::{JsonFileStore, JsonFileStoreBuilder};
pub use memory::MemoryStore;

/// The key the saved-form list is stored under.
pub const FORMS_STORAGE_KEY: &str = "formBuilder_savedForms";

/// A string key-value backend holding the form list under `forms_key()`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;

    fn forms_key(&self) -> &str {
        FORMS_STORAGE_KEY
    }
}

/// Operations required of a saved-form store.
pub trait FormStore {
    /// Every saved form, in storage order.
    fn list_all(&self) -> Result<Vec<FormSchema>, StoreError>;

    /// Saves a form, replacing any saved form with the same id.
    fn upsert(&mut self, schema: &FormSchema) -> Result<(), StoreError>;

    /// Removes the form with the given id. Returns whether a form was removed.
    fn delete_by_id(&mut self, id: &str) -> Result<bool, StoreError>;

    fn get_by_id(&self, id: &str) -> Result<Option<FormSchema>, StoreError> {
        Ok(self.list_all()?.into_iter().find(|f| f.id == id))
    }

    /// Saved forms, most recently updated first.
    fn list_sorted_by_updated(&self) -> Result<Vec<FormSchema>, StoreError> {
        Ok(self
            .list_all()?
            .into_iter()
            .sorted_by(|a, b| b.updated_at.cmp(&a.updated_at))
            .collect())
    }

    /// Saved forms whose name contains `term`, ignoring case, most recent first.
    fn search(&self, term: &str) -> Result<Vec<FormSchema>, StoreError> {
        let needle = term.to_lowercase();
        Ok(self
            .list_sorted_by_updated()?
            .into_iter()
            .filter(|f| f.name.to_lowercase().contains(&needle))
            .collect())
    }
}

fn write_forms<S: KeyValueStore + ?Sized>(store: &mut S, forms: &[FormSchema]) -> Result<(), StoreError> {
    let encoded = serde_json::to_string(forms)?;
    let key = store.forms_key().to_string();
    store.set(&key, encoded)
}

impl<S: KeyValueStore> FormStore for S {
    fn list_all(&self) -> Result<Vec<FormSchema>, StoreError> {
        match self.get(self.forms_key())? {
            Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
            _ => Ok(Vec::new()),
        }
    }

    fn upsert(&mut self, schema: &FormSchema) -> Result<(), StoreError> {
        let mut forms = self.list_all()?;
        match forms.iter_mut().find(|f| f.id == schema.id) {
            Some(existing) => *existing = schema.clone(),
            None => forms.push(schema.clone()),
        }
        write_forms(self, &forms)?;
        info!(form = %schema.id, name = %schema.name, fields = schema.fields.len(), "form saved");
        Ok(())
    }

    fn delete_by_id(&mut self, id: &str) -> Result<bool, StoreError> {
        let mut forms = self.list_all()?;
        let before = forms.len();
        forms.retain(|f| f.id != id);
        if forms.len() == before {
            debug!(form = %id, "delete requested for unknown form");
            return Ok(false);
        }
        write_forms(self, &forms)?;
        info!(form = %id, "form deleted");
        Ok(true)
    }
}
