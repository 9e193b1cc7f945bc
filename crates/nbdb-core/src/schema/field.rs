//! Field definitions for models.

use nbdb_proto::Value;

use super::types::FieldType;

/// A field definition within a model.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Field data type.
    pub field_type: FieldType,
    /// Whether the field must be present when the record is encoded.
    /// Construction never enforces this.
    pub required: bool,
    /// Value a fresh record holds when the field is not supplied.
    pub default: Option<Value>,
}

impl FieldDef {
    /// Create a new required field.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
            default: None,
        }
    }

    /// Create an optional field (required = false).
    pub fn optional(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            default: None,
        }
    }

    /// Set the default value.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Check if this field has a default value.
    pub fn has_default(&self) -> bool {
        self.default.as_ref().is_some_and(|v| !v.is_null())
    }

    /// The value a freshly constructed record holds for this field.
    pub fn initial_value(&self) -> Value {
        self.field_type
            .normalize(self.default.clone().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::ScalarType;

    #[test]
    fn test_field_def_builder() {
        let field = FieldDef::optional("enabled", FieldType::scalar(ScalarType::Bool))
            .with_default(true);

        assert_eq!(field.name, "enabled");
        assert!(!field.required);
        assert!(field.has_default());
        assert_eq!(field.initial_value(), Value::Bool(true));
    }

    #[test]
    fn test_required_field() {
        let field = FieldDef::new("id", FieldType::scalar(ScalarType::String));

        assert!(field.required);
        assert!(!field.has_default());
        assert_eq!(field.initial_value(), Value::Null);
    }
}
