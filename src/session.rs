//! The editing and filling state of one form.
//!
//! A `FormSession` owns the form being built, the values entered into it and
//! the errors of the last submit. It is the only thing that mutates that
//! state: every value change recomputes derived fields, and every schema
//! change is checked before it is applied, so the session never holds a form
//! with a broken derived configuration.

use crate::ast::{FieldValue, FormValues};
use crate::error::{SchemaError, StoreError};
use crate::evaluator::{Clock, DerivedOutcome, SystemClock, compute_derived_outcome, recompute_derived};
use crate::schema::{Field, FormSchema, MoveDirection};
use crate::store::FormStore;
use crate::validation::{FieldError, validate_form};
use std::sync::Arc;
use tracing::{debug, warn};

/// The result of submitting a form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubmitOutcome {
    pub errors: Vec<FieldError>,
}

impl SubmitOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct FormSessionBuilder {
    clock: Arc<dyn Clock>,
    form: Option<FormSchema>,
}

impl FormSessionBuilder {
    pub fn new() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            form: None,
        }
    }

    /// Sets the clock date-dependent formulas are evaluated against.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Starts the session on an existing form instead of a blank one.
    pub fn with_form(mut self, form: FormSchema) -> Self {
        self.form = Some(form);
        self
    }

    pub fn build(self) -> Result<FormSession, SchemaError> {
        let mut session = FormSession {
            clock: self.clock,
            ..FormSession::default()
        };
        if let Some(form) = self.form {
            session.set_current_form(form)?;
        }
        Ok(session)
    }
}

impl Default for FormSessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct FormSession {
    form: FormSchema,
    values: FormValues,
    errors: Vec<FieldError>,
    preview: bool,
    clock: Arc<dyn Clock>,
}

impl Default for FormSession {
    fn default() -> Self {
        Self {
            form: FormSchema::new(""),
            values: FormValues::new(),
            errors: Vec::new(),
            preview: false,
            clock: Arc::new(SystemClock),
        }
    }
}

impl FormSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> FormSessionBuilder {
        FormSessionBuilder::new()
    }

    pub fn form(&self) -> &FormSchema {
        &self.form
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, field_id: &str) -> Option<&FieldValue> {
        self.values.get(field_id)
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Messages currently recorded against one field.
    pub fn errors_for(&self, field_id: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field_id == field_id)
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn is_preview(&self) -> bool {
        self.preview
    }

    /// Replaces the current form. Values reset to the field defaults with
    /// derived fields computed, and errors are cleared.
    pub fn set_current_form(&mut self, form: FormSchema) -> Result<(), SchemaError> {
        if let Err(err) = form.check() {
            warn!(form = %form.id, error = %err, "rejected form with invalid fields");
            return Err(err);
        }
        debug!(form = %form.id, fields = form.fields.len(), "current form set");
        self.form = form;
        self.values = self
            .form
            .fields
            .iter()
            .map(|f| (f.id.clone(), f.default_value.clone()))
            .collect();
        self.errors.clear();
        self.recompute();
        Ok(())
    }

    /// Starts over with a blank, unnamed form.
    pub fn reset_form(&mut self) {
        self.form = FormSchema::new("");
        self.values.clear();
        self.errors.clear();
        self.preview = false;
    }

    /// Applies a schema change to a copy of the form and keeps it only if the
    /// resulting form still checks out.
    fn edit_form<T>(
        &mut self,
        edit: impl FnOnce(&mut FormSchema) -> Result<T, SchemaError>,
    ) -> Result<T, SchemaError> {
        let mut candidate = self.form.clone();
        let result = edit(&mut candidate)?;
        candidate.check()?;
        self.form = candidate;
        Ok(result)
    }

    pub fn add_field(&mut self, field: Field) -> Result<(), SchemaError> {
        let id = field.id.clone();
        let default = field.default_value.clone();
        self.edit_form(|form| form.add_field(field))?;
        self.values.entry(id).or_insert(default);
        self.recompute();
        Ok(())
    }

    pub fn update_field<F>(&mut self, id: &str, edit: F) -> Result<(), SchemaError>
    where
        F: FnOnce(&mut Field),
    {
        self.edit_form(|form| form.update_field(id, edit))?;
        self.recompute();
        Ok(())
    }

    /// Removes a field with its value and errors. A field that a derived
    /// field reads cannot be removed.
    pub fn delete_field(&mut self, id: &str) -> Result<Field, SchemaError> {
        let removed = self.edit_form(|form| form.delete_field(id))?;
        self.values.remove(id);
        self.errors.retain(|e| e.field_id != id);
        Ok(removed)
    }

    pub fn reorder_fields(&mut self, ids: &[String]) -> Result<(), SchemaError> {
        self.form.reorder_fields(ids)
    }

    pub fn move_field(&mut self, id: &str, direction: MoveDirection) -> Result<bool, SchemaError> {
        self.form.move_field(id, direction)
    }

    /// Stores a value entered into a field, clears that field's errors and
    /// recomputes derived fields. Returns the derived values that changed.
    pub fn set_field_value(
        &mut self,
        field_id: &str,
        value: impl Into<FieldValue>,
    ) -> Result<Vec<(String, FieldValue)>, SchemaError> {
        if self.form.field(field_id).is_none() {
            return Err(SchemaError::FieldNotFound(field_id.to_string()));
        }
        self.values.insert(field_id.to_string(), value.into());
        self.errors.retain(|e| e.field_id != field_id);
        Ok(self.recompute())
    }

    /// Replaces all values at once and recomputes derived fields.
    pub fn set_values(&mut self, values: FormValues) -> Vec<(String, FieldValue)> {
        self.values = values;
        self.recompute()
    }

    /// Switches to filling the form. Every field starts from its entered
    /// value, or its default when nothing was entered.
    pub fn enter_preview(&mut self) {
        for field in &self.form.fields {
            let missing = self.values.get(&field.id).is_none_or(FieldValue::is_null);
            if missing {
                self.values.insert(field.id.clone(), field.default_value.clone());
            }
        }
        self.errors.clear();
        self.preview = true;
        self.recompute();
    }

    pub fn leave_preview(&mut self) {
        self.preview = false;
    }

    /// Validates the current values and records the errors.
    pub fn submit(&mut self) -> SubmitOutcome {
        self.recompute();
        self.errors = validate_form(&self.form.fields, &self.values);
        debug!(form = %self.form.id, errors = self.errors.len(), "form submitted");
        SubmitOutcome {
            errors: self.errors.clone(),
        }
    }

    /// How every derived field's current value is computed, in evaluation order.
    pub fn explain(&self) -> Vec<(String, DerivedOutcome)> {
        let Ok(graph) = self.form.check() else {
            return Vec::new();
        };
        let today = self.clock.today();
        graph
            .evaluation_order()
            .iter()
            .filter_map(|id| self.form.field(id))
            .map(|field| (field.id.clone(), compute_derived_outcome(field, &self.values, today)))
            .collect()
    }

    /// Saves the current form under `name`.
    ///
    /// The name is trimmed and must not be empty. The session's form is only
    /// updated once the store has accepted it.
    pub fn save(&mut self, store: &mut impl FormStore, name: &str) -> Result<(), StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidSchema {
                id: self.form.id.clone(),
                source: SchemaError::EmptyName,
            });
        }
        self.form.check().map_err(|source| StoreError::InvalidSchema {
            id: self.form.id.clone(),
            source,
        })?;

        let mut saved = self.form.clone();
        saved.rename(name);
        store.upsert(&saved)?;
        self.form = saved;
        Ok(())
    }

    /// Makes a saved form the current one.
    pub fn load(&mut self, store: &impl FormStore, id: &str) -> Result<(), StoreError> {
        let form = store
            .get_by_id(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.set_current_form(form)
            .map_err(|source| StoreError::InvalidSchema {
                id: id.to_string(),
                source,
            })
    }

    fn recompute(&mut self) -> Vec<(String, FieldValue)> {
        recompute_derived(&self.form.fields, &mut self.values, self.clock.today())
    }
}
