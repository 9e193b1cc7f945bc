//! Field type descriptors.

use std::fmt;
use std::net::IpAddr;

use nbdb_proto::Value;

/// Scalar data types a field can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    /// Boolean value.
    Bool,
    /// 64-bit signed integer.
    Int,
    /// 64-bit floating point. Integers are accepted as well.
    Float,
    /// UTF-8 string.
    String,
    /// IPv4 or IPv6 address in textual form.
    IpAddress,
    /// Ethernet MAC address, six hex octets separated by `:` or `-`.
    MacAddress,
}

/// Field types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// A scalar value.
    Scalar(ScalarType),
    /// A homogeneous list.
    List(Box<FieldType>),
    /// One of a fixed set of string variants.
    Enum {
        /// Name of the enum type.
        name: String,
        /// Allowed variant values.
        variants: Vec<String>,
    },
    /// The id of a record of another model.
    Reference {
        /// Name of the referenced model.
        model: String,
    },
    /// A free-form string-keyed dictionary.
    Dict,
}

impl ScalarType {
    /// Check whether a non-null value fits this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (ScalarType::Bool, Value::Bool(_)) => true,
            (ScalarType::Int, Value::Int(_)) => true,
            (ScalarType::Float, Value::Float(_) | Value::Int(_)) => true,
            (ScalarType::String, Value::String(_)) => true,
            (ScalarType::IpAddress, Value::String(s)) => s.parse::<IpAddr>().is_ok(),
            (ScalarType::MacAddress, Value::String(s)) => is_mac_address(s),
            _ => false,
        }
    }
}

impl FieldType {
    /// Create a scalar field type.
    pub fn scalar(scalar: ScalarType) -> Self {
        FieldType::Scalar(scalar)
    }

    /// Create a list field type.
    pub fn list(item: FieldType) -> Self {
        FieldType::List(Box::new(item))
    }

    /// Create an enum field type.
    pub fn enum_type(name: impl Into<String>, variants: &[&str]) -> Self {
        FieldType::Enum {
            name: name.into(),
            variants: variants.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Create a reference to another model.
    pub fn reference(model: impl Into<String>) -> Self {
        FieldType::Reference {
            model: model.into(),
        }
    }

    /// Check whether a value fits this type. `Null` always fits: it is how a
    /// field is explicitly cleared.
    pub fn accepts(&self, value: &Value) -> bool {
        if value.is_null() {
            return true;
        }
        match self {
            FieldType::Scalar(scalar) => scalar.accepts(value),
            FieldType::List(item) => value
                .as_list()
                .is_some_and(|items| items.iter().all(|v| !v.is_null() && item.accepts(v))),
            FieldType::Enum { variants, .. } => value
                .as_str()
                .is_some_and(|s| variants.iter().any(|v| v == s)),
            FieldType::Reference { .. } => value.as_str().is_some(),
            FieldType::Dict => value.as_map().is_some(),
        }
    }

    /// Bring an accepted value into the stored form: integers assigned to
    /// float fields become floats, so equal numbers compare equal.
    pub fn normalize(&self, value: Value) -> Value {
        match (self, value) {
            (FieldType::Scalar(ScalarType::Float), Value::Int(i)) => Value::Float(i as f64),
            (FieldType::List(item), Value::List(items)) => {
                Value::List(items.into_iter().map(|v| item.normalize(v)).collect())
            }
            (_, value) => value,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarType::Bool => "bool",
            ScalarType::Int => "int",
            ScalarType::Float => "float",
            ScalarType::String => "string",
            ScalarType::IpAddress => "ip address",
            ScalarType::MacAddress => "mac address",
        };
        f.write_str(name)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Scalar(scalar) => write!(f, "{scalar}"),
            FieldType::List(item) => write!(f, "list of {item}"),
            FieldType::Enum { name, variants } => {
                write!(f, "{name} (one of {})", variants.join(", "))
            }
            FieldType::Reference { model } => write!(f, "reference to {model}"),
            FieldType::Dict => f.write_str("dict"),
        }
    }
}

fn is_mac_address(s: &str) -> bool {
    let sep = if s.contains('-') { '-' } else { ':' };
    let octets: Vec<&str> = s.split(sep).collect();
    octets.len() == 6
        && octets
            .iter()
            .all(|o| o.len() == 2 && o.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_scalar_accepts() {
        assert!(ScalarType::Bool.accepts(&Value::Bool(true)));
        assert!(!ScalarType::Bool.accepts(&Value::Int(1)));
        assert!(ScalarType::Float.accepts(&Value::Int(1)));
        assert!(!ScalarType::Int.accepts(&Value::Float(1.0)));
    }

    #[test]
    fn test_address_types() {
        assert!(ScalarType::IpAddress.accepts(&Value::from("10.0.0.1")));
        assert!(ScalarType::IpAddress.accepts(&Value::from("fe80::1")));
        assert!(!ScalarType::IpAddress.accepts(&Value::from("10.0.0")));

        assert!(ScalarType::MacAddress.accepts(&Value::from("fa:16:3e:8c:2e:12")));
        assert!(ScalarType::MacAddress.accepts(&Value::from("FA-16-3E-8C-2E-12")));
        assert!(!ScalarType::MacAddress.accepts(&Value::from("fa:16:3e:8c:2e")));
        assert!(!ScalarType::MacAddress.accepts(&Value::from("fa:16:3e:8c:2e:zz")));
    }

    #[test]
    fn test_null_always_accepted() {
        assert!(FieldType::scalar(ScalarType::Int).accepts(&Value::Null));
        assert!(FieldType::Dict.accepts(&Value::Null));
    }

    #[test]
    fn test_normalize_float_fields() {
        let float = FieldType::scalar(ScalarType::Float);
        assert_eq!(float.normalize(Value::Int(2)), Value::Float(2.0));
        assert_eq!(float.normalize(Value::Null), Value::Null);

        let floats = FieldType::list(float);
        assert_eq!(
            floats.normalize(Value::List(vec![Value::Int(1), Value::Float(1.5)])),
            Value::List(vec![Value::Float(1.0), Value::Float(1.5)])
        );
        assert_eq!(
            FieldType::scalar(ScalarType::Int).normalize(Value::Int(2)),
            Value::Int(2)
        );
    }

    #[test]
    fn test_list_and_dict() {
        let routes = FieldType::list(FieldType::Dict);
        let route = Value::Map(BTreeMap::new());

        assert!(routes.accepts(&Value::List(vec![route.clone()])));
        assert!(!routes.accepts(&route));
        assert!(!routes.accepts(&Value::List(vec![Value::Null])));
    }

    #[test]
    fn test_enum() {
        let status = FieldType::enum_type("binding", &["local", "remote"]);

        assert!(status.accepts(&Value::from("local")));
        assert!(!status.accepts(&Value::from("elsewhere")));
        assert_eq!(status.to_string(), "binding (one of local, remote)");
    }
}
