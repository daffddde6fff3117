//! Tests for the form session: editing, filling in, submitting and saving.
mod common;
use common::*;
use shiki::prelude::*;

fn order_session() -> FormSession {
    FormSession::builder()
        .with_clock(FixedClock(date(2024, 6, 15)))
        .with_form(create_order_form())
        .build()
        .unwrap()
}

#[test]
fn test_loading_a_form_initializes_values() {
    let session = order_session();
    assert_eq!(session.value("qty"), Some(&FieldValue::Number(1.0)));
    assert_eq!(session.value("shipping"), Some(&FieldValue::Number(5.0)));
    // Empty price counts as 0.
    assert_eq!(session.value("subtotal"), Some(&FieldValue::Number(0.0)));
    assert_eq!(session.value("total"), Some(&FieldValue::Number(5.0)));
    assert!(session.errors().is_empty());
}

#[test]
fn test_setting_a_value_recomputes_chain() {
    let mut session = order_session();
    session.set_field_value("qty", 3.0).unwrap();
    let updates = session.set_field_value("price", 2.0).unwrap();

    assert_eq!(
        updates,
        vec![
            ("subtotal".to_string(), FieldValue::Number(6.0)),
            ("total".to_string(), FieldValue::Number(11.0)),
        ]
    );
    assert_eq!(session.value("total"), Some(&FieldValue::Number(11.0)));
}

#[test]
fn test_setting_unknown_field_fails() {
    let mut session = order_session();
    assert_eq!(
        session.set_field_value("nope", 1.0),
        Err(SchemaError::FieldNotFound("nope".to_string()))
    );
}

#[test]
fn test_submit_records_errors() {
    let mut session = order_session();
    let outcome = session.submit();
    assert!(!outcome.is_valid());
    assert_eq!(session.errors_for("email"), vec!["Email is required"]);

    session.set_field_value("email", "not-an-email").unwrap();
    let outcome = session.submit();
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(
        session.errors_for("email"),
        vec!["Please enter a valid email address"]
    );
}

#[test]
fn test_setting_a_value_clears_that_fields_errors() {
    let mut session = order_session();
    session
        .add_field(
            Field::builder(FieldType::Text, "Name")
                .with_id("name")
                .with_rule(ValidationRule::required("Name is required"))
                .build(),
        )
        .unwrap();
    session.submit();
    assert_eq!(session.errors().len(), 2);

    session.set_field_value("email", "ada@example.com").unwrap();
    assert!(session.errors_for("email").is_empty());
    assert_eq!(session.errors_for("name"), vec!["Name is required"]);

    session.set_field_value("name", "Ada").unwrap();
    assert!(session.submit().is_valid());
}

#[test]
fn test_schema_with_cycle_is_refused() {
    let mut form = FormSchema::new("Cyclic");
    form.add_field(derived_field("x", &["y"], "y + 1")).unwrap();
    form.add_field(derived_field("y", &["x"], "x + 1")).unwrap();

    let mut session = FormSession::new();
    let err = session.set_current_form(form).unwrap_err();
    assert!(matches!(err, SchemaError::DependencyCycle(_)));
    assert!(session.form().fields.is_empty());
}

#[test]
fn test_add_field_with_self_reference_is_refused() {
    let mut session = order_session();
    let err = session
        .add_field(derived_field("loop", &["loop"], "loop * 2"))
        .unwrap_err();
    assert_eq!(err, SchemaError::SelfReference("loop".to_string()));
    assert!(session.form().field("loop").is_none());
}

#[test]
fn test_add_derived_field_computes_it() {
    let mut session = order_session();
    session.set_field_value("price", 4.0).unwrap();
    session
        .add_field(derived_field("double", &["price"], "price * 2"))
        .unwrap();
    assert_eq!(session.value("double"), Some(&FieldValue::Number(8.0)));
}

#[test]
fn test_update_field_cannot_change_type() {
    let mut session = order_session();
    let err = session
        .update_field("price", |f| f.field_type = FieldType::Text)
        .unwrap_err();
    assert!(matches!(err, SchemaError::TypeChange { .. }));

    session
        .update_field("price", |f| f.label = "Unit price".to_string())
        .unwrap();
    assert_eq!(session.form().field("price").unwrap().label, "Unit price");
}

#[test]
fn test_update_formula_recomputes() {
    let mut session = order_session();
    session.set_field_value("price", 2.0).unwrap();
    session
        .update_field("subtotal", |f| {
            if let Some(config) = f.derived_config.as_mut() {
                config.formula = "price * qty * 10".to_string();
            }
        })
        .unwrap();
    assert_eq!(session.value("subtotal"), Some(&FieldValue::Number(20.0)));
    assert_eq!(session.value("total"), Some(&FieldValue::Number(25.0)));
}

#[test]
fn test_delete_field_removes_value_and_errors() {
    let mut session = order_session();
    session.submit();
    let removed = session.delete_field("email").unwrap();
    assert_eq!(removed.id, "email");
    assert!(session.value("email").is_none());
    assert!(session.errors().is_empty());
}

#[test]
fn test_delete_parent_of_derived_field_is_refused() {
    let mut session = order_session();
    let err = session.delete_field("price").unwrap_err();
    assert_eq!(
        err,
        SchemaError::UnknownParent {
            field_id: "subtotal".to_string(),
            parent_id: "price".to_string(),
        }
    );
    assert!(session.form().field("price").is_some());
}

#[test]
fn test_reorder_and_move_fields() {
    let mut session = order_session();
    let ids: Vec<String> = ["total", "subtotal", "shipping", "qty", "price", "email"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    session.reorder_fields(&ids).unwrap();
    let sorted: Vec<&str> = session
        .form()
        .sorted_fields()
        .iter()
        .map(|f| f.id.as_str())
        .collect();
    assert_eq!(sorted, ids);

    assert!(session.move_field("email", MoveDirection::Up).unwrap());
    assert!(!session.move_field("total", MoveDirection::Up).unwrap());
    let sorted: Vec<&str> = session
        .form()
        .sorted_fields()
        .iter()
        .map(|f| f.id.as_str())
        .collect();
    assert_eq!(sorted[4..], ["email", "price"]);
}

#[test]
fn test_preview_keeps_entered_values_and_fills_defaults() {
    let mut session = order_session();
    session.set_field_value("price", 3.0).unwrap();
    session.set_field_value("qty", FieldValue::Null).unwrap();
    session.enter_preview();

    assert!(session.is_preview());
    assert_eq!(session.value("price"), Some(&FieldValue::Number(3.0)));
    assert_eq!(session.value("qty"), Some(&FieldValue::Number(1.0)));
    assert_eq!(session.value("total"), Some(&FieldValue::Number(8.0)));

    session.leave_preview();
    assert!(!session.is_preview());
}

#[test]
fn test_age_uses_session_clock() {
    let mut session = FormSession::builder()
        .with_clock(FixedClock(date(2024, 6, 14)))
        .with_form(create_profile_form())
        .build()
        .unwrap();
    session.set_field_value("dob", "2000-06-15").unwrap();
    assert_eq!(session.value("age"), Some(&FieldValue::Number(23.0)));
}

#[test]
fn test_explain_lists_derived_fields_in_order() {
    let mut session = order_session();
    session.set_field_value("price", 2.0).unwrap();
    let explained = session.explain();
    let ids: Vec<&str> = explained.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["subtotal", "total"]);
    assert_eq!(explained[0].1.reason, "$price (was 2) * $qty (was 1)");
}

#[test]
fn test_save_trims_name_and_updates_form() {
    let mut session = order_session();
    let mut store = MemoryStore::new();
    let before = session.form().updated_at;

    session.save(&mut store, "  Order form  ").unwrap();

    assert_eq!(session.form().name, "Order form");
    assert!(session.form().updated_at >= before);
    let saved = store.get_by_id(&session.form().id).unwrap().unwrap();
    assert_eq!(&saved, session.form());
}

#[test]
fn test_save_rejects_empty_name() {
    let mut session = order_session();
    let mut store = MemoryStore::new();
    let err = session.save(&mut store, "   ").unwrap_err();
    assert!(matches!(
        err,
        StoreError::InvalidSchema {
            source: SchemaError::EmptyName,
            ..
        }
    ));
    assert_eq!(session.form().name, "Order");
    assert!(store.list_all().unwrap().is_empty());
}

#[test]
fn test_load_saved_form() {
    let mut store = MemoryStore::new();
    let mut session = order_session();
    session.save(&mut store, "Order").unwrap();
    let id = session.form().id.clone();

    let mut other = FormSession::new();
    other.load(&store, &id).unwrap();
    assert_eq!(other.form(), session.form());

    assert!(matches!(
        other.load(&store, "missing"),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn test_reset_form() {
    let mut session = order_session();
    session.enter_preview();
    session.reset_form();
    assert!(session.form().fields.is_empty());
    assert!(session.form().name.is_empty());
    assert!(session.values().is_empty());
    assert!(!session.is_preview());
}
