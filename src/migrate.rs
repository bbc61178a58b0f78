//! Boundary validation and schema migration for externally sourced trees.
//!
//! # Responsibility
//! - Decide whether a parsed document looks like a tree at all.
//! - Upgrade accepted documents into the current typed model.
//!
//! # Invariants
//! - The candidate document is only ever borrowed; migration works on a copy.
//! - A migrated tree has unique ids and a counter above every issued id.
//! - Numeric ids never exceed `MAX_NODE_ID`, so the counter cannot overflow.

use std::collections::HashSet;

use chrono::NaiveDate;
use log::warn;
use serde_json::{Map, Value};

use crate::alloc::MAX_NODE_ID;
use crate::error::{AppError, ValidationError};
use crate::model::Tree;
use crate::query::all_ids;
use crate::schema::{create_seed_state, today, CURRENT_SCHEMA_VERSION};

pub fn parse_document(text: &str) -> Result<Value, ValidationError> {
    serde_json::from_str(text).map_err(|err| ValidationError::Unparseable(err.to_string()))
}

/// Shallow structural check: an object with a `roles` array and a `nextId`
/// that is a number or a string. Nested nodes are not inspected.
pub fn is_valid_state(candidate: &Value) -> bool {
    validate_candidate(candidate).is_ok()
}

pub fn validate_candidate(candidate: &Value) -> Result<(), ValidationError> {
    let object = candidate.as_object().ok_or(ValidationError::NotAnObject)?;
    if !object.get("roles").is_some_and(Value::is_array) {
        return Err(ValidationError::MissingRoles);
    }
    match object.get("nextId") {
        Some(Value::Number(_)) | Some(Value::String(_)) => Ok(()),
        _ => Err(ValidationError::BadNextId),
    }
}

pub fn migrate_state(candidate: &Value) -> Result<Tree, AppError> {
    migrate_state_on(candidate, today())
}

/// Migrates `candidate`; a non-object yields the seed tree for `seed_day`.
pub fn migrate_state_on(candidate: &Value, seed_day: NaiveDate) -> Result<Tree, AppError> {
    let Some(source) = candidate.as_object() else {
        return Ok(create_seed_state(seed_day));
    };

    let mut copy = source.clone();
    fill_top_level_defaults(&mut copy);

    let mut tree: Tree = serde_json::from_value(Value::Object(copy))
        .map_err(|err| ValidationError::Malformed(err.to_string()))?;
    if tree.version < CURRENT_SCHEMA_VERSION {
        tree.version = CURRENT_SCHEMA_VERSION;
    }
    ensure_unique_ids(&tree)?;
    ensure_ids_in_range(&tree)?;
    repair_next_id(&mut tree);
    Ok(tree)
}

/// Re-defaults a live tree after arbitrary edits.
pub fn ensure_state_shape(tree: &mut Tree) {
    if tree.version == 0 {
        tree.version = CURRENT_SCHEMA_VERSION;
    }
    repair_next_id(tree);
}

/// Raises `next_id` above the largest numeric id in the tree. Returns whether it moved.
pub fn repair_next_id(tree: &mut Tree) -> bool {
    let highest = all_ids(tree)
        .into_iter()
        .filter_map(|id| id.numeric())
        .max()
        .unwrap_or(0);
    let floor = highest.saturating_add(1).max(1);
    if tree.next_id >= floor {
        return false;
    }
    warn!(
        "event=next_id_repaired module=migrate status=warn from={} to={}",
        tree.next_id, floor
    );
    tree.next_id = floor;
    true
}

fn fill_top_level_defaults(object: &mut Map<String, Value>) {
    let version = object
        .get("version")
        .and_then(Value::as_u64)
        .filter(|value| *value > 0)
        .unwrap_or(CURRENT_SCHEMA_VERSION as u64);
    object.insert("version".to_string(), Value::from(version));

    if !object.get("roles").is_some_and(Value::is_array) {
        object.insert("roles".to_string(), Value::Array(Vec::new()));
    }

    let next_id = object.get("nextId").map(coerce_counter).unwrap_or(1);
    object.insert("nextId".to_string(), Value::from(next_id));
}

fn coerce_counter(raw: &Value) -> u64 {
    let parsed = match raw {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|v| *v >= 1.0).map(|v| v as u64)),
        Value::String(text) => {
            let trimmed = text.trim();
            trimmed.parse::<u64>().ok().or_else(|| {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite() && *v >= 1.0)
                    .map(|v| v as u64)
            })
        }
        _ => None,
    };
    parsed.filter(|value| *value > 0).unwrap_or(1)
}

fn ensure_unique_ids(tree: &Tree) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for id in all_ids(tree) {
        if !seen.insert(id.as_str()) {
            return Err(ValidationError::DuplicateId(id.to_string()));
        }
    }
    Ok(())
}

fn ensure_ids_in_range(tree: &Tree) -> Result<(), ValidationError> {
    if let Some(id) = all_ids(tree)
        .into_iter()
        .find(|id| id.numeric().is_some_and(|value| value > MAX_NODE_ID))
    {
        return Err(ValidationError::Malformed(format!(
            "id `{id}` is above {MAX_NODE_ID}"
        )));
    }
    if tree.next_id > MAX_NODE_ID + 1 {
        return Err(ValidationError::Malformed(format!(
            "nextId {} is above {}",
            tree.next_id,
            MAX_NODE_ID + 1
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::Importance;
    use crate::schema::create_default_state;
    use crate::store::serialize_state;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).expect("date")
    }

    #[test]
    fn shallow_validation() {
        assert!(!is_valid_state(&json!({})));
        assert!(is_valid_state(&json!({"roles": [], "nextId": 1})));
        assert!(is_valid_state(&json!({"roles": [], "nextId": "12"})));
        assert!(!is_valid_state(&json!({"roles": {}, "nextId": 1})));
        assert!(!is_valid_state(&json!({"roles": []})));
        assert!(!is_valid_state(&json!([1, 2])));
        assert!(!is_valid_state(&Value::Null));
    }

    #[test]
    fn validation_names_the_failing_field() {
        assert!(matches!(
            validate_candidate(&json!("text")),
            Err(ValidationError::NotAnObject)
        ));
        assert!(matches!(
            validate_candidate(&json!({"nextId": 1})),
            Err(ValidationError::MissingRoles)
        ));
        assert!(matches!(
            validate_candidate(&json!({"roles": [], "nextId": true})),
            Err(ValidationError::BadNextId)
        ));
    }

    #[test]
    fn non_object_migrates_to_seed() {
        let tree = migrate_state_on(&json!(42), day()).expect("migrate");
        assert_eq!(tree, create_seed_state(day()));
    }

    #[test]
    fn missing_fields_are_defaulted() {
        let tree = migrate_state_on(&json!({}), day()).expect("migrate");
        assert_eq!(tree, create_default_state());
    }

    #[test]
    fn older_version_is_bumped_and_counter_coerced() {
        let tree = migrate_state_on(&json!({"version": 0, "roles": [], "nextId": "17"}), day())
            .expect("migrate");
        assert_eq!(tree.version, CURRENT_SCHEMA_VERSION);
        assert_eq!(tree.next_id, 17);
    }

    #[test]
    fn migration_does_not_touch_input() {
        let input = json!({"roles": [{"id": "3", "title": "Role", "importance": 2}]});
        let before = input.clone();
        let tree = migrate_state_on(&input, day()).expect("migrate");
        assert_eq!(input, before);
        assert_eq!(tree.roles.len(), 1);
        assert_eq!(tree.next_id, 4);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let input = json!({
            "roles": [
                {"id": "1", "title": "A", "importance": 2, "lt_goals": []},
                {"id": "1", "title": "B", "importance": 3, "lt_goals": []}
            ],
            "nextId": 5
        });
        let err = migrate_state_on(&input, day()).expect_err("duplicate ids");
        assert!(matches!(
            err,
            AppError::Invalid(ValidationError::DuplicateId(ref id)) if id == "1"
        ));
    }

    #[test]
    fn oversized_ids_are_rejected() {
        let huge_id = json!({
            "roles": [{"id": u64::MAX.to_string(), "title": "A", "importance": 2}],
            "nextId": 1
        });
        let err = migrate_state_on(&huge_id, day()).expect_err("id too large");
        assert!(matches!(err, AppError::Invalid(ValidationError::Malformed(_))));

        let huge_counter = json!({"roles": [], "nextId": u64::MAX});
        let err = migrate_state_on(&huge_counter, day()).expect_err("counter too large");
        assert!(matches!(err, AppError::Invalid(ValidationError::Malformed(_))));

        let at_limit = json!({
            "roles": [{"id": MAX_NODE_ID.to_string(), "title": "A", "importance": 2}],
            "nextId": 1
        });
        let mut tree = migrate_state_on(&at_limit, day()).expect("largest id accepted");
        assert_eq!(tree.next_id, MAX_NODE_ID + 1);
        assert!(crate::edit::add_role(&mut tree, "B", Importance::MIN).is_err());
        assert_eq!(all_ids(&tree).len(), 1);
    }

    #[test]
    fn malformed_nodes_are_rejected() {
        let input = json!({
            "roles": [{"title": "No id", "importance": 2}],
            "nextId": 1
        });
        let err = migrate_state_on(&input, day()).expect_err("missing id");
        assert!(matches!(err, AppError::Invalid(ValidationError::Malformed(_))));
    }

    #[test]
    fn nested_defaults_are_filled() {
        let input = json!({
            "roles": [{
                "id": "1",
                "title": "Role",
                "importance": "4",
                "lt_goals": [{
                    "id": "2",
                    "title": "LT",
                    "importance": 3,
                    "due": "2025-06-01",
                    "st_goals": [{"id": "3", "title": "ST", "tasks": [{"id": "4", "title": "T"}]}]
                }]
            }],
            "nextId": 5
        });
        let tree = migrate_state_on(&input, day()).expect("migrate");
        let st = &tree.roles[0].lt_goals[0].st_goals[0];
        assert_eq!(tree.roles[0].importance.get(), 4);
        assert_eq!(st.description, "");
        assert_eq!(st.importance, None);
        assert_eq!(st.tasks[0].due, None);
    }

    #[test]
    fn json_round_trip_is_stable() {
        let seeded = create_seed_state(day());
        let direct = migrate_state_on(&serde_json::to_value(&seeded).expect("value"), day())
            .expect("migrate");
        for pretty in [true, false] {
            let text = serialize_state(&seeded, pretty).expect("serialize");
            let parsed = parse_document(&text).expect("parse");
            let migrated = migrate_state_on(&parsed, day()).expect("migrate");
            assert_eq!(migrated, direct);
        }
    }

    #[test]
    fn live_shape_repairs_counter() {
        let mut tree = create_seed_state(day());
        tree.next_id = 2;
        tree.version = 0;
        ensure_state_shape(&mut tree);
        assert_eq!(tree.next_id, 5);
        assert_eq!(tree.version, CURRENT_SCHEMA_VERSION);
    }
}
