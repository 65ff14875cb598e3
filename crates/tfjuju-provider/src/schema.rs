//! Attribute schemas for resources, data sources and the provider block.
//!
//! A schema validates a configuration document (`serde_json::Value`) and
//! tells the host which attribute changes force a replacement.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum AttrKind {
    String,
    Int,
    Bool,
    StringSet,
    StringList,
    StringMap,
    Object(Vec<Attribute>),
    ObjectSet(Vec<Attribute>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Required,
    Optional,
    Computed,
    OptionalComputed,
}

impl Mode {
    pub fn is_computed(self) -> bool {
        matches!(self, Self::Computed | Self::OptionalComputed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Prefix(&'static str),
    Contains(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validator {
    /// String value (or every set element) must be one of these.
    OneOf(&'static [&'static str]),
    NotEmpty,
    /// Sibling attributes that must be null when this one is set.
    ConflictsWith(&'static [&'static str]),
    SetSize { min: usize, max: Option<usize> },
    Pattern(Pattern),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub kind: AttrKind,
    pub mode: Mode,
    pub sensitive: bool,
    pub requires_replace: bool,
    pub validators: Vec<Validator>,
    pub description: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, kind: AttrKind) -> Self {
        Self {
            name: name.into(),
            kind,
            mode: Mode::Optional,
            sensitive: false,
            requires_replace: false,
            validators: Vec::new(),
            description: String::new(),
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, AttrKind::String)
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, AttrKind::Int)
    }

    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, AttrKind::Bool)
    }

    pub fn string_set(name: impl Into<String>) -> Self {
        Self::new(name, AttrKind::StringSet)
    }

    pub fn string_map(name: impl Into<String>) -> Self {
        Self::new(name, AttrKind::StringMap)
    }

    pub fn required(mut self) -> Self {
        self.mode = Mode::Required;
        self
    }

    pub fn optional(mut self) -> Self {
        self.mode = Mode::Optional;
        self
    }

    pub fn computed(mut self) -> Self {
        self.mode = Mode::Computed;
        self
    }

    pub fn optional_computed(mut self) -> Self {
        self.mode = Mode::OptionalComputed;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn requires_replace(mut self) -> Self {
        self.requires_replace = true;
        self
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub description: String,
    pub version: u32,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            version: 0,
            attributes: Vec::new(),
        }
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// The `id` attribute every resource carries.
    pub fn with_id(self) -> Self {
        self.attribute(
            Attribute::string("id")
                .computed()
                .description("Identifier of the resource, also accepted by import."),
        )
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Check a configuration document. Returns every violation found.
    pub fn validate(&self, config: &Value) -> Vec<String> {
        let mut errors = Vec::new();
        validate_object(&self.attributes, config, "", &mut errors);
        errors
    }

    /// Paths of `requires_replace` attributes whose value differs between
    /// the prior state and the planned state. Unknown computed values in the
    /// plan (null) never force a replacement.
    pub fn replacement_paths(&self, prior: &Value, planned: &Value) -> Vec<String> {
        let mut paths = Vec::new();
        if !prior.is_null() {
            collect_replacements(&self.attributes, prior, planned, "", &mut paths);
        }
        paths
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn validate_object(attrs: &[Attribute], value: &Value, prefix: &str, errors: &mut Vec<String>) {
    let Some(object) = value.as_object() else {
        let at = if prefix.is_empty() { "configuration" } else { prefix };
        errors.push(format!("{at}: expected an object"));
        return;
    };

    for key in object.keys() {
        if !attrs.iter().any(|a| a.name == *key) {
            errors.push(format!("{}: unsupported attribute", join_path(prefix, key)));
        }
    }

    for attr in attrs {
        let path = join_path(prefix, &attr.name);
        let value = object.get(&attr.name).unwrap_or(&Value::Null);
        if value.is_null() {
            if attr.mode == Mode::Required {
                errors.push(format!("{path}: required attribute is missing"));
            }
            continue;
        }
        if attr.mode == Mode::Computed {
            errors.push(format!("{path}: attribute is computed and cannot be set"));
            continue;
        }
        if check_kind(&attr.kind, value, &path, errors) {
            for validator in &attr.validators {
                check_validator(validator, value, object, &path, errors);
            }
        }
    }
}

/// Returns false when the value has the wrong shape.
fn check_kind(kind: &AttrKind, value: &Value, path: &str, errors: &mut Vec<String>) -> bool {
    let ok = match kind {
        AttrKind::String => value.is_string(),
        AttrKind::Int => value.is_i64() || value.is_u64(),
        AttrKind::Bool => value.is_boolean(),
        AttrKind::StringList => string_items(value).is_some(),
        AttrKind::StringSet => match string_items(value) {
            Some(items) => {
                let unique: BTreeSet<&str> = items.iter().copied().collect();
                if unique.len() != items.len() {
                    errors.push(format!("{path}: set contains duplicate elements"));
                    return false;
                }
                true
            }
            None => false,
        },
        AttrKind::StringMap => value
            .as_object()
            .is_some_and(|m| m.values().all(Value::is_string)),
        AttrKind::Object(attrs) => {
            if value.is_object() {
                validate_object(attrs, value, path, errors);
            }
            value.is_object()
        }
        AttrKind::ObjectSet(attrs) => match value.as_array() {
            Some(items) => {
                for (idx, item) in items.iter().enumerate() {
                    validate_object(attrs, item, &format!("{path}[{idx}]"), errors);
                }
                true
            }
            None => false,
        },
    };
    if !ok {
        errors.push(format!("{path}: expected {}", kind_name(kind)));
    }
    ok
}

fn kind_name(kind: &AttrKind) -> &'static str {
    match kind {
        AttrKind::String => "a string",
        AttrKind::Int => "an integer",
        AttrKind::Bool => "a boolean",
        AttrKind::StringSet => "a set of strings",
        AttrKind::StringList => "a list of strings",
        AttrKind::StringMap => "a map of strings",
        AttrKind::Object(_) => "an object",
        AttrKind::ObjectSet(_) => "a set of objects",
    }
}

fn string_items(value: &Value) -> Option<Vec<&str>> {
    value.as_array()?.iter().map(Value::as_str).collect()
}

/// Strings a validator applies to: the value itself or each set element.
fn strings_of(value: &Value) -> Vec<&str> {
    match value {
        Value::String(s) => vec![s.as_str()],
        Value::Array(_) => string_items(value).unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn check_validator(
    validator: &Validator,
    value: &Value,
    siblings: &Map<String, Value>,
    path: &str,
    errors: &mut Vec<String>,
) {
    match validator {
        Validator::OneOf(allowed) => {
            for s in strings_of(value) {
                if !allowed.contains(&s) {
                    errors.push(format!(
                        "{path}: {s:?} is not one of {}",
                        allowed.join(", ")
                    ));
                }
            }
        }
        Validator::NotEmpty => {
            let empty = match value {
                Value::String(s) => s.trim().is_empty(),
                Value::Array(items) => items.is_empty(),
                Value::Object(map) => map.is_empty(),
                _ => false,
            };
            if empty {
                errors.push(format!("{path}: must not be empty"));
            }
        }
        Validator::ConflictsWith(others) => {
            for other in *others {
                if siblings.get(*other).is_some_and(|v| !v.is_null()) {
                    errors.push(format!("{path}: conflicts with {other}"));
                }
            }
        }
        Validator::SetSize { min, max } => {
            let len = value.as_array().map_or(0, Vec::len);
            let too_big = max.is_some_and(|max| len > max);
            if len < *min || too_big {
                let bound = match max {
                    Some(max) if max == min => format!("exactly {min}"),
                    Some(max) => format!("between {min} and {max}"),
                    None => format!("at least {min}"),
                };
                errors.push(format!("{path}: must contain {bound} elements, got {len}"));
            }
        }
        Validator::Pattern(pattern) => {
            for s in strings_of(value) {
                let ok = match pattern {
                    Pattern::Prefix(p) => s.starts_with(p),
                    Pattern::Contains(p) => s.contains(p),
                };
                if !ok {
                    let rule = match pattern {
                        Pattern::Prefix(p) => format!("start with {p:?}"),
                        Pattern::Contains(p) => format!("contain {p:?}"),
                    };
                    errors.push(format!("{path}: {s:?} must {rule}"));
                }
            }
        }
    }
}

fn collect_replacements(
    attrs: &[Attribute],
    prior: &Value,
    planned: &Value,
    prefix: &str,
    paths: &mut Vec<String>,
) {
    for attr in attrs {
        let path = join_path(prefix, &attr.name);
        let before = prior.get(&attr.name).unwrap_or(&Value::Null);
        let after = planned.get(&attr.name).unwrap_or(&Value::Null);
        if after.is_null() && attr.mode.is_computed() {
            continue;
        }
        if attr.requires_replace && !same_value(&attr.kind, before, after) {
            paths.push(path);
            continue;
        }
        if let AttrKind::Object(nested) = &attr.kind {
            collect_replacements(nested, before, after, &path, paths);
        }
    }
}

/// Sets compare without regard to element order.
fn same_value(kind: &AttrKind, a: &Value, b: &Value) -> bool {
    match (kind, a, b) {
        (AttrKind::StringSet | AttrKind::ObjectSet(_), Value::Array(x), Value::Array(y)) => {
            let x: BTreeSet<String> = x.iter().map(Value::to_string).collect();
            let y: BTreeSet<String> = y.iter().map(Value::to_string).collect();
            x == y
        }
        _ => a == b,
    }
}
