//! Declarative Response Contracts
//!
//! A contract is a static `Schema` tree describing the exact shape of a JSON
//! response. Validation is strict:
//! - Undeclared keys are rejected
//! - Required keys must be present
//! - `null` is only accepted on fields declared nullable
//! - Optional fields may be absent, but are not nullable unless declared so
//! - Datetime fields must coerce into a timestamp
//!
//! Every mismatch is collected with its path (`data.tokens[3].name`) so a
//! single failed response shows all of the vendor's shape drift at once.

use std::fmt;

use serde_json::{Map, Value};
use thiserror::Error;

use super::datetime;

/// Shape of a JSON value
#[derive(Debug, Clone, Copy)]
pub enum Schema {
    Bool,
    Number,
    String,
    /// Epoch seconds or an ISO-compatible string
    DateTime,
    Array(&'static Schema),
    Object(&'static [Field]),
}

impl Schema {
    fn describe(&self) -> &'static str {
        match self {
            Schema::Bool => "boolean",
            Schema::Number => "number",
            Schema::String => "string",
            Schema::DateTime => "datetime",
            Schema::Array(_) => "array",
            Schema::Object(_) => "object",
        }
    }
}

/// Whether a key must appear in its object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

/// A declared key in an object schema
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub schema: Schema,
    pub presence: Presence,
    pub nullable: bool,
}

impl Field {
    pub const fn required(name: &'static str, schema: Schema) -> Self {
        Self { name, schema, presence: Presence::Required, nullable: false }
    }

    pub const fn optional(name: &'static str, schema: Schema) -> Self {
        Self { name, schema, presence: Presence::Optional, nullable: false }
    }

    /// Required key whose value may be `null`
    pub const fn nullable(name: &'static str, schema: Schema) -> Self {
        Self { name, schema, presence: Presence::Required, nullable: true }
    }
}

/// Nature of a single contract violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// Declared required key is absent
    Missing,
    /// Key is not declared in the contract
    Unexpected,
    /// Value has the wrong JSON type
    WrongType { expected: &'static str, found: &'static str },
    /// Value has the right JSON type but could not be coerced
    Coercion(String),
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::Missing => write!(f, "missing required field"),
            IssueKind::Unexpected => write!(f, "unexpected field"),
            IssueKind::WrongType { expected, found } => write!(f, "expected {}, found {}", expected, found),
            IssueKind::Coercion(reason) => write!(f, "coercion failed: {}", reason),
        }
    }
}

/// A contract violation at one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub path: String,
    pub kind: IssueKind,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "<root>" } else { self.path.as_str() };
        write!(f, "{}: {}", path, self.kind)
    }
}

/// Response did not match its contract
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} contract violation(s): {}", .issues.len(), join_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn single(path: impl Into<String>, kind: IssueKind) -> Self {
        Self { issues: vec![ValidationIssue { path: path.into(), kind }] }
    }

    /// Find the issue reported for an exact path
    pub fn issue_at(&self, path: &str) -> Option<&IssueKind> {
        self.issues.iter().find(|i| i.path == path).map(|i| &i.kind)
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// JSON type name used in error messages
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Validate a value against a schema, collecting every issue
pub fn validate(value: &Value, schema: &Schema) -> Result<(), ValidationError> {
    let mut issues = Vec::new();
    check(value, schema, String::new(), &mut issues);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { issues })
    }
}

fn check(value: &Value, schema: &Schema, path: String, issues: &mut Vec<ValidationIssue>) {
    match (schema, value) {
        (Schema::Bool, Value::Bool(_)) => {}
        (Schema::Number, Value::Number(_)) => {}
        (Schema::String, Value::String(_)) => {}
        (Schema::DateTime, Value::Number(_) | Value::String(_)) => {
            if let Err(reason) = datetime::coerce(value) {
                issues.push(ValidationIssue { path, kind: IssueKind::Coercion(reason) });
            }
        }
        (Schema::Array(item), Value::Array(items)) => {
            for (i, element) in items.iter().enumerate() {
                check(element, item, format!("{}[{}]", path, i), issues);
            }
        }
        (Schema::Object(fields), Value::Object(map)) => check_object(map, fields, &path, issues),
        (expected, found) => issues.push(ValidationIssue {
            path,
            kind: IssueKind::WrongType { expected: expected.describe(), found: kind_of(found) },
        }),
    }
}

fn check_object(map: &Map<String, Value>, fields: &[Field], path: &str, issues: &mut Vec<ValidationIssue>) {
    for field in fields {
        let field_path = join_path(path, field.name);
        match map.get(field.name) {
            None if field.presence == Presence::Required => {
                issues.push(ValidationIssue { path: field_path, kind: IssueKind::Missing });
            }
            None => {}
            Some(Value::Null) if field.nullable => {}
            Some(value) => check(value, &field.schema, field_path, issues),
        }
    }

    for key in map.keys() {
        if !fields.iter().any(|f| f.name == key) {
            issues.push(ValidationIssue { path: join_path(path, key), kind: IssueKind::Unexpected });
        }
    }
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}
