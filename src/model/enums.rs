use serde::{Deserialize, Serialize};

use super::item::{impl_item, ItemDoc};

/// One member of an enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumElement {
    #[serde(flatten)]
    pub doc: ItemDoc,
    /// Generators emit this instead of `name` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<i64>,
}

impl EnumElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self { doc: ItemDoc::new(name), ..Self::default() }
    }

    pub fn with_internal_name(mut self, internal_name: impl Into<String>) -> Self {
        self.internal_name = Some(internal_name.into());
        self
    }

    pub fn with_value(mut self, value: i64) -> Self {
        self.value = Some(value);
        self
    }

    /// The name a generator should emit.
    pub fn output_name(&self) -> &str {
        self.internal_name.as_deref().unwrap_or(&self.doc.name)
    }
}

impl_item!(EnumElement => doc);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enum {
    #[serde(flatten)]
    pub doc: ItemDoc,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_scope: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<EnumElement>,
}

impl Enum {
    pub fn new(name: impl Into<String>) -> Self {
        Self { doc: ItemDoc::new(name), ..Self::default() }
    }

    pub fn with_internal_scope(mut self, scope: impl Into<String>) -> Self {
        self.internal_scope = Some(scope.into());
        self
    }

    pub fn with_elements(mut self, elements: impl IntoIterator<Item = EnumElement>) -> Self {
        self.elements.extend(elements);
        self
    }

    pub fn element_named(&self, name: &str) -> Option<&EnumElement> {
        self.elements.iter().find(|e| e.doc.name == name)
    }
}

impl_item!(Enum => doc);

/// Named restriction of an existing enum to some of its elements.
///
/// `enum_name` and `allowed_elements` are names, not links. Nothing here
/// checks that they resolve; see [`crate::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumSubset {
    #[serde(flatten)]
    pub doc: ItemDoc,
    #[serde(rename = "enum")]
    pub enum_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_elements: Vec<String>,
}

impl EnumSubset {
    pub fn new(name: impl Into<String>, enum_name: impl Into<String>) -> Self {
        Self { doc: ItemDoc::new(name), enum_name: enum_name.into(), allowed_elements: Vec::new() }
    }

    pub fn with_allowed<I, S>(mut self, elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_elements.extend(elements.into_iter().map(Into::into));
        self
    }
}

impl_item!(EnumSubset => doc);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::Item;
    use serde_json::json;

    #[test]
    fn internal_name_overrides_output_name() {
        let plain = EnumElement::new("ON");
        let renamed = EnumElement::new("ON").with_internal_name("STATE_ON");
        assert_eq!(plain.internal_name, None);
        assert_eq!(renamed.internal_name.as_deref(), Some("STATE_ON"));
        assert_eq!(plain.output_name(), "ON");
        assert_eq!(renamed.output_name(), "STATE_ON");
    }

    #[test]
    fn zero_value_is_not_absent() {
        let zero = EnumElement::new("A").with_value(0);
        assert_eq!(zero.value, Some(0));
        assert_eq!(EnumElement::new("A").value, None);
    }

    #[test]
    fn scope_is_absent_until_set() {
        assert_eq!(Enum::new("Mode").internal_scope, None);
        assert_eq!(Enum::new("Mode").with_internal_scope("").internal_scope.as_deref(), Some(""));
    }

    #[test]
    fn subset_accepts_foreign_elements() {
        let color = Enum::new("Color").with_elements(["A", "B", "C"].map(EnumElement::new));
        let subset = EnumSubset::new("Warm", "Color").with_allowed(["A", "D"]);

        assert_eq!(subset.allowed_elements, vec!["A", "D"]);
        assert!(color.element_named("A").is_some());
        assert!(color.element_named("D").is_none());
    }

    #[test]
    fn sibling_enums_do_not_share_elements() {
        let mut a = Enum::new("A");
        let b = Enum::new("B");
        a.elements.push(EnumElement::new("X"));
        assert!(b.elements.is_empty());

        let mut s1 = EnumSubset::new("S1", "A");
        let s2 = EnumSubset::new("S2", "A");
        s1.allowed_elements.push("X".into());
        assert!(s2.allowed_elements.is_empty());
    }

    #[test]
    fn wire_shape_flattens_doc() {
        let e = Enum::new("Mode")
            .with_description(["Operating mode."])
            .with_internal_scope("mode")
            .with_elements([EnumElement::new("OFF").with_value(0)]);
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json, json!({
            "name": "Mode",
            "description": ["Operating mode."],
            "internal_scope": "mode",
            "elements": [{ "name": "OFF", "value": 0 }],
        }));
        let back: Enum = serde_json::from_value(json).unwrap();
        assert_eq!(back, e);

        let subset: EnumSubset = serde_json::from_value(json!({ "name": "S", "enum": "Mode" })).unwrap();
        assert_eq!(subset.enum_name, "Mode");
        assert!(subset.allowed_elements.is_empty());
    }
}
