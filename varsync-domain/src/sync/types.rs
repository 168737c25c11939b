//! Request and response types of a synchronization pass.
//!
//! These are the wire types exchanged with the caller and use camelCase JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use varsync_core::Color;

use crate::model::{Literal, VariableId, VariableType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    pub target_collection_name: String,
    #[serde(default)]
    pub desired_tokens: Vec<DesiredToken>,
    #[serde(default)]
    pub required_mode_names: Vec<String>,
    /// Collections that must already exist. Checked before any write.
    #[serde(default)]
    pub required_collections: Vec<String>,
    #[serde(default)]
    pub deletions: Vec<DeletionTarget>,
}

impl SyncRequest {
    pub fn new(target_collection_name: impl Into<String>) -> Self {
        Self {
            target_collection_name: target_collection_name.into(),
            desired_tokens: Vec::new(),
            required_mode_names: Vec::new(),
            required_collections: Vec::new(),
            deletions: Vec::new(),
        }
    }

    pub fn with_tokens(mut self, tokens: Vec<DesiredToken>) -> Self {
        self.desired_tokens = tokens;
        self
    }

    pub fn with_modes<I, S>(mut self, modes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_mode_names = modes.into_iter().map(Into::into).collect();
        self
    }

    pub fn requiring(mut self, collection: impl Into<String>) -> Self {
        self.required_collections.push(collection.into());
        self
    }

    pub fn deleting(mut self, target: DeletionTarget) -> Self {
        self.deletions.push(target);
        self
    }
}

/// One token the caller wants to exist, keyed by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesiredToken {
    /// Dotted path or store name.
    pub name: String,
    #[serde(rename = "type")]
    pub variable_type: VariableType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Mode name to desired value.
    #[serde(default)]
    pub per_mode: BTreeMap<String, DesiredValue>,
}

impl DesiredToken {
    pub fn new(name: impl Into<String>, variable_type: VariableType) -> Self {
        Self {
            name: name.into(),
            variable_type,
            description: None,
            per_mode: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_value(mut self, mode_name: impl Into<String>, value: DesiredValue) -> Self {
        self.per_mode.insert(mode_name.into(), value);
        self
    }
}

/// The desired value of a token in one mode.
///
/// On the wire either `{"ref": "{a.b.c}"}`, `{"alias": "a/b/c"}` or a bare
/// literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DesiredValue {
    /// A `{path}` reference to another token, turned into an alias.
    Reference {
        #[serde(rename = "ref")]
        reference: String,
    },
    /// A store name to alias directly.
    Alias { alias: String },
    Literal(RawLiteral),
}

impl DesiredValue {
    pub fn reference(path: impl Into<String>) -> Self {
        DesiredValue::Reference { reference: path.into() }
    }

    pub fn alias(name: impl Into<String>) -> Self {
        DesiredValue::Alias { alias: name.into() }
    }

    pub fn literal(literal: Literal) -> Self {
        DesiredValue::Literal(literal.into())
    }
}

/// An untyped literal as sent by the caller; coerced to the token's type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawLiteral {
    Boolean(bool),
    Number(f64),
    Text(String),
    Rgba {
        r: f32,
        g: f32,
        b: f32,
        #[serde(default = "opaque_alpha")]
        a: f32,
    },
}

fn opaque_alpha() -> f32 {
    1.0
}

impl RawLiteral {
    /// Converts to a typed literal.
    ///
    /// Hex and `rgb()` strings become colours, numeric strings numbers,
    /// `"true"`/`"false"` booleans; numbers and booleans stringify for string
    /// tokens. Anything else is rejected with a reason.
    pub fn coerce(&self, variable_type: VariableType) -> Result<Literal, String> {
        match (variable_type, self) {
            (VariableType::Color, RawLiteral::Rgba { r, g, b, a }) => Ok(Literal::Color(Color::new(*r, *g, *b, *a))),
            (VariableType::Color, RawLiteral::Text(s)) => Color::from_str(s)
                .map(Literal::Color)
                .map_err(|e| e.to_string()),
            (VariableType::Number, RawLiteral::Number(n)) => Ok(Literal::Number(*n)),
            (VariableType::Number, RawLiteral::Text(s)) => s
                .trim()
                .parse::<f64>()
                .map(Literal::Number)
                .map_err(|_| format!("'{}' is not a number", s)),
            (VariableType::String, RawLiteral::Text(s)) => Ok(Literal::String(s.clone())),
            (VariableType::String, RawLiteral::Number(n)) => Ok(Literal::String(n.to_string())),
            (VariableType::String, RawLiteral::Boolean(b)) => Ok(Literal::String(b.to_string())),
            (VariableType::Boolean, RawLiteral::Boolean(b)) => Ok(Literal::Boolean(*b)),
            (VariableType::Boolean, RawLiteral::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(Literal::Boolean(true)),
                "false" => Ok(Literal::Boolean(false)),
                _ => Err(format!("'{}' is not a boolean", s)),
            },
            (expected, other) => Err(format!("cannot use {} as a {} value", other.describe(), expected)),
        }
    }

    fn describe(&self) -> String {
        match self {
            RawLiteral::Boolean(b) => format!("boolean {}", b),
            RawLiteral::Number(n) => format!("number {}", n),
            RawLiteral::Text(s) => format!("string '{}'", s),
            RawLiteral::Rgba { .. } => "colour object".to_string(),
        }
    }
}

impl From<Literal> for RawLiteral {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Color(c) => RawLiteral::Rgba { r: c.r, g: c.g, b: c.b, a: c.a },
            Literal::Number(n) => RawLiteral::Number(n),
            Literal::String(s) => RawLiteral::Text(s),
            Literal::Boolean(b) => RawLiteral::Boolean(b),
        }
    }
}

/// A variable to delete, by store id or by name within the target collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeletionTarget {
    Id { id: VariableId },
    Name { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Add,
    Update,
    Delete,
}

/// One applied change, reported back for auditing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    pub kind: ChangeKind,
    pub variable_name: String,
}

/// Outcome of a pass. Always complete, even when items failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<Change>,
}

impl SyncResponse {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn record(&mut self, kind: ChangeKind, variable_name: &str) {
        match kind {
            ChangeKind::Add => self.created += 1,
            ChangeKind::Update => self.updated += 1,
            ChangeKind::Delete => self.deleted += 1,
        }
        self.changes.push(Change {
            kind,
            variable_name: variable_name.to_string(),
        });
    }
}
