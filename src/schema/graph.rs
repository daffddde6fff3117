use super::{DerivedFieldConfig, Field};
use crate::compiler::is_age_formula;
use crate::error::SchemaError;
use ahash::{AHashMap, AHashSet};

/// The parents a derived configuration actually reads.
pub(crate) fn formula_dependencies(config: &DerivedFieldConfig) -> &[String] {
    if is_age_formula(&config.formula) {
        let end = config.parent_fields.len().min(1);
        &config.parent_fields[..end]
    } else {
        &config.parent_fields
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VisitState {
    InProgress,
    Done,
}

/// Dependency graph between the derived fields of a form.
///
/// Building the graph validates the form's field ids and derived
/// configurations, and yields an evaluation order in which every derived
/// field comes after the derived fields it reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyGraph {
    order: Vec<String>,
}

impl DependencyGraph {
    pub fn build(fields: &[Field]) -> Result<Self, SchemaError> {
        let mut known: AHashSet<&str> = AHashSet::with_capacity(fields.len());
        for field in fields {
            if !known.insert(field.id.as_str()) {
                return Err(SchemaError::DuplicateFieldId(field.id.clone()));
            }
        }

        let mut derived: AHashMap<&str, &Field> = AHashMap::new();
        for field in fields {
            let Some(config) = field.derivation() else {
                continue;
            };
            for parent in &config.parent_fields {
                if parent == &field.id {
                    return Err(SchemaError::SelfReference(field.id.clone()));
                }
                if !known.contains(parent.as_str()) {
                    return Err(SchemaError::UnknownParent {
                        field_id: field.id.clone(),
                        parent_id: parent.clone(),
                    });
                }
            }
            derived.insert(field.id.as_str(), field);
        }

        let mut states: AHashMap<&str, VisitState> = AHashMap::new();
        let mut path: Vec<&str> = Vec::new();
        let mut order = Vec::with_capacity(derived.len());
        for field in fields.iter().filter(|f| f.is_derived()) {
            Self::visit(field, &derived, &mut states, &mut path, &mut order)?;
        }

        Ok(Self { order })
    }

    /// Depth-first post-order walk; a node met again while in progress closes a cycle.
    fn visit<'a>(
        field: &'a Field,
        derived: &AHashMap<&'a str, &'a Field>,
        states: &mut AHashMap<&'a str, VisitState>,
        path: &mut Vec<&'a str>,
        order: &mut Vec<String>,
    ) -> Result<(), SchemaError> {
        match states.get(field.id.as_str()) {
            Some(VisitState::Done) => return Ok(()),
            Some(VisitState::InProgress) => {
                let start = path
                    .iter()
                    .position(|id| *id == field.id)
                    .unwrap_or_default();
                let mut cycle: Vec<String> = path[start..].iter().map(|s| s.to_string()).collect();
                cycle.push(field.id.clone());
                return Err(SchemaError::DependencyCycle(cycle));
            }
            None => {}
        }

        states.insert(field.id.as_str(), VisitState::InProgress);
        path.push(field.id.as_str());
        for parent in field.dependencies() {
            if let Some(parent_field) = derived.get(parent.as_str()) {
                Self::visit(*parent_field, derived, states, path, order)?;
            }
        }
        path.pop();
        states.insert(field.id.as_str(), VisitState::Done);
        order.push(field.id.clone());
        Ok(())
    }

    /// Derived field ids, parents before children.
    pub fn evaluation_order(&self) -> &[String] {
        &self.order
    }
}
