//! Variable store data model.
//!
//! Collections own ordered [`Mode`]s and typed [`Variable`]s. A variable holds
//! one [`VariableValue`] per mode: either a typed [`Literal`] or an alias to
//! another variable. Ids are assigned by the store and are only meaningful
//! inside it; names are the stable identity used by synchronization.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use varsync_core::Color;

macro_rules! store_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

store_id!(
    /// Store-assigned collection identifier.
    CollectionId
);
store_id!(
    /// Store-assigned mode identifier, local to its collection.
    ModeId
);
store_id!(
    /// Store-assigned variable identifier.
    VariableId
);

/// The declared type of a variable. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    #[serde(alias = "COLOR")]
    Color,
    #[serde(alias = "FLOAT", alias = "NUMBER")]
    Number,
    #[serde(alias = "STRING")]
    String,
    #[serde(alias = "BOOLEAN")]
    Boolean,
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VariableType::Color => "color",
            VariableType::Number => "number",
            VariableType::String => "string",
            VariableType::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

/// A concrete, typed value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Literal {
    Color(Color),
    Number(f64),
    String(String),
    Boolean(bool),
}

impl Literal {
    pub fn variable_type(&self) -> VariableType {
        match self {
            Literal::Color(_) => VariableType::Color,
            Literal::Number(_) => VariableType::Number,
            Literal::String(_) => VariableType::String,
            Literal::Boolean(_) => VariableType::Boolean,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Color(c) => write!(f, "{}", c),
            Literal::Number(n) => write!(f, "{}", n),
            Literal::String(s) => write!(f, "\"{}\"", s),
            Literal::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// The value of a variable in one mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum VariableValue {
    Literal(Literal),
    Alias(VariableId),
}

impl VariableValue {
    pub fn as_alias(&self) -> Option<&VariableId> {
        match self {
            VariableValue::Alias(id) => Some(id),
            VariableValue::Literal(_) => None,
        }
    }
}

impl From<Literal> for VariableValue {
    fn from(literal: Literal) -> Self {
        VariableValue::Literal(literal)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mode {
    pub id: ModeId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    /// Modes in store order. Only ever grows or is renamed in place.
    pub modes: Vec<Mode>,
    pub default_mode_id: ModeId,
}

impl Collection {
    pub fn mode(&self, id: &ModeId) -> Option<&Mode> {
        self.modes.iter().find(|m| &m.id == id)
    }

    pub fn mode_by_name(&self, name: &str) -> Option<&Mode> {
        self.modes.iter().find(|m| m.name == name)
    }

    pub fn default_mode(&self) -> Option<&Mode> {
        self.mode(&self.default_mode_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub id: VariableId,
    pub collection_id: CollectionId,
    /// Slash-separated store name, unique within the collection.
    pub name: String,
    pub variable_type: VariableType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub values_by_mode: BTreeMap<ModeId, VariableValue>,
}

impl Variable {
    pub fn value_for_mode(&self, mode_id: &ModeId) -> Option<&VariableValue> {
        self.values_by_mode.get(mode_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_type_accepts_store_spellings() {
        let t: VariableType = serde_json::from_str("\"FLOAT\"").unwrap();
        assert_eq!(t, VariableType::Number);
        let t: VariableType = serde_json::from_str("\"color\"").unwrap();
        assert_eq!(t, VariableType::Color);
        assert_eq!(VariableType::Boolean.to_string(), "boolean");
    }

    #[test]
    fn test_literal_reports_its_type() {
        assert_eq!(Literal::Number(4.0).variable_type(), VariableType::Number);
        assert_eq!(Literal::Color(Color::WHITE).variable_type(), VariableType::Color);
        assert_eq!(Literal::String("x".into()).to_string(), "\"x\"");
    }

    #[test]
    fn test_variable_value_serializes_with_discriminant() {
        let alias = VariableValue::Alias(VariableId::new("VariableID:1"));
        let json = serde_json::to_value(&alias).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "alias", "data": "VariableID:1"}));
        let literal = VariableValue::Literal(Literal::Number(8.0));
        let json = serde_json::to_value(&literal).unwrap();
        assert_eq!(json["kind"], "literal");
        assert_eq!(json["data"]["type"], "number");
    }

    #[test]
    fn test_collection_mode_lookup() {
        let collection = Collection {
            id: CollectionId::new("c"),
            name: "Semantic".into(),
            modes: vec![
                Mode { id: ModeId::new("m1"), name: "light".into() },
                Mode { id: ModeId::new("m2"), name: "dark".into() },
            ],
            default_mode_id: ModeId::new("m1"),
        };
        assert_eq!(collection.mode_by_name("dark").map(|m| m.id.as_str()), Some("m2"));
        assert_eq!(collection.default_mode().map(|m| m.name.as_str()), Some("light"));
        assert!(collection.mode_by_name("contrast").is_none());
    }
}
