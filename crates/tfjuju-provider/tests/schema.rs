use serde_json::json;

use tfjuju_provider::schema::{AttrKind, Attribute, Pattern, Schema, Validator};

fn schema() -> Schema {
    Schema::new("test")
        .with_id()
        .attribute(Attribute::string("name").required().requires_replace())
        .attribute(Attribute::string("access").validator(Validator::OneOf(&["read", "write"])))
        .attribute(Attribute::string_set("users").validator(Validator::SetSize { min: 1, max: Some(2) }))
        .attribute(Attribute::string_map("config"))
        .attribute(Attribute::string("username").validator(Validator::ConflictsWith(&["client_id"])))
        .attribute(Attribute::string("client_id"))
        .attribute(Attribute::string("cidr").validator(Validator::Pattern(Pattern::Contains("/"))))
        .attribute(
            Attribute::new(
                "cloud",
                AttrKind::Object(vec![
                    Attribute::string("name").required(),
                    Attribute::string("region").optional_computed(),
                ]),
            )
            .requires_replace(),
        )
}

#[test]
fn valid_document_has_no_errors() {
    let errors = schema().validate(&json!({
        "name": "dev",
        "access": "read",
        "users": ["alice", "bob"],
        "config": {"logging-config": "<root>=INFO"},
        "cidr": "10.0.0.0/24",
        "cloud": {"name": "localhost"}
    }));
    assert!(errors.is_empty(), "{errors:?}");
}

#[test]
fn every_violation_is_reported() {
    let errors = schema().validate(&json!({
        "id": "set-by-user",
        "access": "admin",
        "users": [],
        "bogus": true
    }));
    assert_eq!(errors.len(), 5, "{errors:?}");
    assert!(errors.contains(&"bogus: unsupported attribute".to_string()));
    assert!(errors.contains(&"name: required attribute is missing".to_string()));
    assert!(errors.contains(&"id: attribute is computed and cannot be set".to_string()));
    assert!(errors.iter().any(|e| e.starts_with("access:")));
    assert!(errors.iter().any(|e| e.starts_with("users:")));
}

#[test]
fn wrong_kinds_and_duplicates_are_rejected() {
    let errors = schema().validate(&json!({
        "name": 3,
        "users": ["alice", "alice"],
        "config": {"a": 1}
    }));
    assert!(errors.contains(&"name: expected a string".to_string()), "{errors:?}");
    assert!(errors.contains(&"users: set contains duplicate elements".to_string()));
    assert!(errors.contains(&"config: expected a map of strings".to_string()));
}

#[test]
fn nested_objects_report_their_path() {
    let errors = schema().validate(&json!({"name": "dev", "cloud": {"region": "r1"}}));
    assert_eq!(errors, vec!["cloud.name: required attribute is missing".to_string()]);
}

#[test]
fn conflicting_attributes_are_rejected() {
    let errors = schema().validate(&json!({"name": "dev", "username": "u", "client_id": "c"}));
    assert_eq!(errors.len(), 1, "{errors:?}");
    assert!(errors[0].starts_with("username:"));
}

#[test]
fn pattern_validator_checks_strings() {
    let errors = schema().validate(&json!({"name": "dev", "cidr": "10.0.0.0"}));
    assert_eq!(errors.len(), 1, "{errors:?}");
}

#[test]
fn replacement_paths_list_changed_replace_attributes() {
    let prior = json!({"name": "dev", "access": "read", "cloud": {"name": "a", "region": "r"}});

    let planned = json!({"name": "prod", "access": "write", "cloud": {"name": "a", "region": "r"}});
    assert_eq!(schema().replacement_paths(&prior, &planned), vec!["name".to_string()]);

    let planned = json!({"name": "dev", "access": "read", "cloud": {"name": "b", "region": "r"}});
    assert_eq!(schema().replacement_paths(&prior, &planned), vec!["cloud".to_string()]);

    assert!(schema().replacement_paths(&prior, &prior).is_empty());
    assert!(schema().replacement_paths(&serde_json::Value::Null, &prior).is_empty());
}
