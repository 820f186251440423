use serde::{Deserialize, Serialize, Serializer};

use super::enums::EnumSubset;

/// JSON has no encoding for NaN or infinities (`serde_json` writes `null`,
/// which would read back as "unbounded"), so refuse to write them.
pub(crate) fn finite_f64<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
    if !v.is_finite() {
        return Err(serde::ser::Error::custom(format!("non-finite double {v} has no JSON form")));
    }
    s.serialize_f64(*v)
}

fn finite_bound<S: Serializer>(v: &Option<f64>, s: S) -> Result<S::Ok, S::Error> {
    match v {
        Some(v) => finite_f64(v, s),
        None => s.serialize_none(),
    }
}

/// Type descriptor of a param, struct member or array element.
///
/// Bounds are optional; `None` means unbounded. `Enum` and `Struct` hold the
/// name of an item owned by the [`Interface`](super::Interface), never the
/// item itself, so the model stays acyclic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ty {
    Boolean,
    Integer {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_value: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_value: Option<i64>,
    },
    Double {
        #[serde(default, skip_serializing_if = "Option::is_none", serialize_with = "finite_bound")]
        min_value: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none", serialize_with = "finite_bound")]
        max_value: Option<f64>,
    },
    String {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<u64>,
    },
    Array {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_size: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_size: Option<u64>,
        element_type: Box<Ty>,
    },
    Enum(String),             // by name
    EnumSubset(EnumSubset),   // inline; subsets are not collected per interface
    Struct(String),           // by name
}

impl Ty {
    pub fn integer() -> Self {
        Ty::Integer { min_value: None, max_value: None }
    }

    pub fn integer_range(min_value: Option<i64>, max_value: Option<i64>) -> Self {
        Ty::Integer { min_value, max_value }
    }

    pub fn double() -> Self {
        Ty::Double { min_value: None, max_value: None }
    }

    pub fn double_range(min_value: Option<f64>, max_value: Option<f64>) -> Self {
        Ty::Double { min_value, max_value }
    }

    pub fn string() -> Self {
        Ty::String { max_length: None }
    }

    pub fn string_max(max_length: u64) -> Self {
        Ty::String { max_length: Some(max_length) }
    }

    pub fn array_of(element_type: Ty) -> Self {
        Ty::Array { min_size: None, max_size: None, element_type: Box::new(element_type) }
    }

    pub fn array_sized(element_type: Ty, min_size: Option<u64>, max_size: Option<u64>) -> Self {
        Ty::Array { min_size, max_size, element_type: Box::new(element_type) }
    }

    pub fn enum_ref(name: impl Into<String>) -> Self {
        Ty::Enum(name.into())
    }

    pub fn struct_ref(name: impl Into<String>) -> Self {
        Ty::Struct(name.into())
    }

    /// Short lowercase label, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Ty::Boolean => "boolean",
            Ty::Integer { .. } => "integer",
            Ty::Double { .. } => "double",
            Ty::String { .. } => "string",
            Ty::Array { .. } => "array",
            Ty::Enum(_) => "enum",
            Ty::EnumSubset(_) => "enum_subset",
            Ty::Struct(_) => "struct",
        }
    }

    /// Innermost non-array type.
    pub fn element(&self) -> &Ty {
        match self {
            Ty::Array { element_type, .. } => element_type.element(),
            other => other,
        }
    }
}
