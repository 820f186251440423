use std::fmt;

use serde::{Deserialize, Serialize};

use super::item::{impl_item, ItemDoc};
use super::ty::{finite_f64, Ty};

fn mandatory_by_default() -> bool {
    true
}

fn is_true(b: &bool) -> bool {
    *b
}

/// Named, typed parameter. Also used for struct members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    #[serde(flatten)]
    pub doc: ItemDoc,
    pub param_type: Ty,
    #[serde(default = "mandatory_by_default", skip_serializing_if = "is_true")]
    pub is_mandatory: bool,
}

impl Param {
    pub fn new(name: impl Into<String>, param_type: Ty) -> Self {
        Self { doc: ItemDoc::new(name), param_type, is_mandatory: true }
    }

    pub fn optional(mut self) -> Self {
        self.is_mandatory = false;
        self
    }
}

impl_item!(Param => doc);

/// Literal default of a function parameter.
///
/// Kept apart from `Option` so that `0`, `0.0`, `""` and `false` remain
/// distinguishable from "no default".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Integer(i64),
    Double(#[serde(serialize_with = "finite_f64")] f64),
    String(String),
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Bool(b) => write!(f, "{b}"),
            DefaultValue::Integer(i) => write!(f, "{i}"),
            DefaultValue::Double(d) => write!(f, "{d}"),
            DefaultValue::String(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for DefaultValue {
    fn from(v: bool) -> Self {
        DefaultValue::Bool(v)
    }
}

impl From<i64> for DefaultValue {
    fn from(v: i64) -> Self {
        DefaultValue::Integer(v)
    }
}

impl From<f64> for DefaultValue {
    fn from(v: f64) -> Self {
        DefaultValue::Double(v)
    }
}

impl From<&str> for DefaultValue {
    fn from(v: &str) -> Self {
        DefaultValue::String(v.to_owned())
    }
}

impl From<String> for DefaultValue {
    fn from(v: String) -> Self {
        DefaultValue::String(v)
    }
}

/// Parameter of a function, optionally platform-restricted and defaulted.
///
/// On the wire the `Param` fields sit next to `platform` and `default_value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "FunctionParamWire", into = "FunctionParamWire")]
pub struct FunctionParam {
    pub param: Param,
    pub platform: Option<String>,
    pub default_value: Option<DefaultValue>,
}

// Only `ItemDoc` is flattened here: flattening all of `Param` would buffer
// `param_type` and lose the JSON path of errors inside it.
#[derive(Serialize, Deserialize)]
struct FunctionParamWire {
    #[serde(flatten)]
    doc: ItemDoc,
    param_type: Ty,
    #[serde(default = "mandatory_by_default", skip_serializing_if = "is_true")]
    is_mandatory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_value: Option<DefaultValue>,
}

impl From<FunctionParamWire> for FunctionParam {
    fn from(wire: FunctionParamWire) -> Self {
        Self {
            param: Param { doc: wire.doc, param_type: wire.param_type, is_mandatory: wire.is_mandatory },
            platform: wire.platform,
            default_value: wire.default_value,
        }
    }
}

impl From<FunctionParam> for FunctionParamWire {
    fn from(fp: FunctionParam) -> Self {
        let Param { doc, param_type, is_mandatory } = fp.param;
        Self { doc, param_type, is_mandatory, platform: fp.platform, default_value: fp.default_value }
    }
}

impl FunctionParam {
    pub fn new(name: impl Into<String>, param_type: Ty) -> Self {
        Self::from(Param::new(name, param_type))
    }

    pub fn optional(mut self) -> Self {
        self.param.is_mandatory = false;
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn with_default(mut self, value: impl Into<DefaultValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn param_type(&self) -> &Ty {
        &self.param.param_type
    }

    pub fn is_mandatory(&self) -> bool {
        self.param.is_mandatory
    }
}

impl From<Param> for FunctionParam {
    fn from(param: Param) -> Self {
        Self { param, platform: None, default_value: None }
    }
}

impl_item!(FunctionParam => param.doc);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::Item;
    use serde_json::json;

    #[test]
    fn params_are_mandatory_unless_told_otherwise() {
        assert!(Param::new("x", Ty::integer()).is_mandatory);
        assert!(!Param::new("x", Ty::integer()).optional().is_mandatory);

        let p: Param = serde_json::from_value(json!({ "name": "x", "param_type": "boolean" })).unwrap();
        assert!(p.is_mandatory);
        let p: Param = serde_json::from_value(json!({
            "name": "x", "param_type": "boolean", "is_mandatory": false
        })).unwrap();
        assert!(!p.is_mandatory);
    }

    #[test]
    fn function_param_keeps_every_field() {
        let fp = FunctionParam::new("speed", Ty::integer_range(Some(0), Some(255)))
            .optional()
            .with_platform("android")
            .with_default(0i64)
            .with_description(["Fan speed."]);

        assert_eq!(fp.name(), "speed");
        assert_eq!(fp.param_type(), &Ty::integer_range(Some(0), Some(255)));
        assert!(!fp.is_mandatory());
        assert_eq!(fp.platform.as_deref(), Some("android"));
        assert_eq!(fp.default_value, Some(DefaultValue::Integer(0)));
        assert_eq!(fp.param.doc.description, vec!["Fan speed."]);
    }

    #[test]
    fn default_values_distinguish_zero_from_absent() {
        let fp: FunctionParam = serde_json::from_value(json!({
            "name": "n", "param_type": { "integer": {} }, "default_value": 0
        })).unwrap();
        assert_eq!(fp.default_value, Some(DefaultValue::Integer(0)));

        let fp: FunctionParam = serde_json::from_value(json!({
            "name": "s", "param_type": { "string": {} }, "default_value": ""
        })).unwrap();
        assert_eq!(fp.default_value, Some(DefaultValue::String(String::new())));

        let fp: FunctionParam = serde_json::from_value(json!({
            "name": "d", "param_type": { "double": {} }, "default_value": 0.5
        })).unwrap();
        assert_eq!(fp.default_value, Some(DefaultValue::Double(0.5)));

        let fp: FunctionParam = serde_json::from_value(json!({
            "name": "b", "param_type": "boolean"
        })).unwrap();
        assert_eq!(fp.default_value, None);
        assert_eq!(fp.platform, None);
    }

    #[test]
    fn function_param_wire_shape() {
        let fp = FunctionParam::new("volume", Ty::double_range(Some(0.0), Some(1.0)))
            .optional()
            .with_platform("ios")
            .with_default(0.5);
        let json = serde_json::to_value(&fp).unwrap();
        assert_eq!(json, json!({
            "name": "volume",
            "param_type": { "double": { "min_value": 0.0, "max_value": 1.0 } },
            "is_mandatory": false,
            "platform": "ios",
            "default_value": 0.5,
        }));
        let back: FunctionParam = serde_json::from_value(json).unwrap();
        assert_eq!(back, fp);
    }

    #[test]
    fn non_finite_defaults_refuse_to_serialize() {
        let fp = FunctionParam::new("ratio", Ty::double()).with_default(f64::NAN);
        let err = serde_json::to_string(&fp).unwrap_err();
        assert!(err.to_string().contains("non-finite"));
        assert!(serde_json::to_string(&DefaultValue::Double(f64::INFINITY)).is_err());
        assert_eq!(serde_json::to_string(&DefaultValue::Double(-0.25)).unwrap(), "-0.25");
    }

    #[test]
    fn default_value_display() {
        assert_eq!(DefaultValue::from(true).to_string(), "true");
        assert_eq!(DefaultValue::from("on").to_string(), "\"on\"");
    }
}
