//! Consistency checks over a finished [`Interface`].
//!
//! The model accepts anything; this pass is what a parser or generator runs
//! when it wants these rules enforced:
//! - integer/double bounds and array sizes are ordered
//! - double bounds and defaults are finite (JSON cannot carry NaN or infinity)
//! - enum subsets name an existing enum and only its elements
//! - enum/struct references resolve
//! - names are identifiers and unique in their scope
//! - explicit enum values are unique
//!
//! All violations are collected; nothing stops at the first one.
use std::collections::{HashMap, HashSet};
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::*;

static IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Item path, e.g. `struct Point.member x`.
    pub item: String,
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}.{}] {}", self.item, self.field, self.message)
    }
}

struct Checker<'a> {
    iface: &'a Interface,
    out: Vec<Violation>,
}

impl<'a> Checker<'a> {
    fn push(&mut self, item: &str, field: &'static str, message: String) {
        self.out.push(Violation { item: item.to_owned(), field, message });
    }

    fn ident(&mut self, item: &str, field: &'static str, name: &str) {
        if !IDENT.is_match(name) {
            self.push(item, field, format!("`{name}` is not a valid identifier"));
        }
    }

    fn unique<'n>(&mut self, scope: &str, what: &str, names: impl IntoIterator<Item = &'n str>) {
        let mut seen = HashSet::new();
        for name in names {
            if !seen.insert(name) {
                self.push(scope, "name", format!("duplicate {what} `{name}`"));
            }
        }
    }

    fn ty(&mut self, item: &str, ty: &Ty) {
        match ty {
            Ty::Boolean | Ty::String { .. } => {}
            Ty::Integer { min_value: Some(lo), max_value: Some(hi) } if lo > hi => {
                self.push(item, "max_value", format!("min_value {lo} exceeds max_value {hi}"));
            }
            Ty::Integer { .. } => {}
            Ty::Double { min_value, max_value } => {
                for (field, bound) in [("min_value", min_value), ("max_value", max_value)] {
                    if let Some(v) = bound.filter(|v| !v.is_finite()) {
                        self.push(item, field, format!("{field} {v} is not finite"));
                    }
                }
                if let (Some(lo), Some(hi)) = (min_value, max_value) {
                    if lo > hi {
                        self.push(item, "max_value", format!("min_value {lo} exceeds max_value {hi}"));
                    }
                }
            }
            Ty::Array { min_size, max_size, element_type } => {
                if let (Some(lo), Some(hi)) = (min_size, max_size) {
                    if lo > hi {
                        self.push(item, "max_size", format!("min_size {lo} exceeds max_size {hi}"));
                    }
                }
                self.ty(item, element_type);
            }
            Ty::Enum(name) => {
                if self.iface.enum_named(name).is_none() {
                    self.push(item, "param_type", format!("unknown enum `{name}`"));
                }
            }
            Ty::Struct(name) => {
                if self.iface.struct_named(name).is_none() {
                    self.push(item, "param_type", format!("unknown struct `{name}`"));
                }
            }
            Ty::EnumSubset(subset) => self.subset(item, subset),
        }
    }

    fn subset(&mut self, item: &str, subset: &EnumSubset) {
        let path = format!("{item}.subset {}", subset.name());
        self.ident(&path, "name", subset.name());
        let iface = self.iface;
        let Some(parent) = iface.enum_named(&subset.enum_name) else {
            self.push(&path, "enum", format!("unknown enum `{}`", subset.enum_name));
            return;
        };
        for allowed in &subset.allowed_elements {
            if parent.element_named(allowed).is_none() {
                self.push(
                    &path,
                    "allowed_elements",
                    format!("`{allowed}` is not an element of enum `{}`", parent.name()),
                );
            }
        }
    }

    fn enumeration(&mut self, e: &Enum) {
        let path = format!("enum {}", e.name());
        self.ident(&path, "name", e.name());
        self.unique(&path, "element", e.elements.iter().map(|el| el.name()));

        let mut values: HashMap<i64, &str> = HashMap::new();
        for el in &e.elements {
            let el_path = format!("{path}.element {}", el.name());
            // Public names may be arbitrary text when an internal name is given.
            let field = if el.internal_name.is_some() { "internal_name" } else { "name" };
            self.ident(&el_path, field, el.output_name());
            if let Some(v) = el.value {
                if let Some(first) = values.insert(v, el.name()) {
                    self.push(&el_path, "value", format!("value {v} already used by `{first}`"));
                }
            }
        }
    }

    fn structure(&mut self, s: &Struct) {
        let path = format!("struct {}", s.name());
        self.ident(&path, "name", s.name());
        self.unique(&path, "member", s.members.iter().map(|m| m.name()));
        for m in &s.members {
            let m_path = format!("{path}.member {}", m.name());
            self.ident(&m_path, "name", m.name());
            self.ty(&m_path, &m.param_type);
        }
    }

    fn function(&mut self, f: &Function) {
        let path = format!("function {}({})", f.name(), f.message_type);
        self.ident(&path, "name", f.name());
        self.unique(&path, "param", f.params.iter().map(|p| p.name()));
        for p in &f.params {
            let p_path = format!("{path}.param {}", p.name());
            self.ident(&p_path, "name", p.name());
            self.ty(&p_path, p.param_type());
            if let Some(DefaultValue::Double(v)) = &p.default_value {
                if !v.is_finite() {
                    self.push(&p_path, "default_value", format!("default {v} is not finite"));
                }
            }
        }
    }
}

/// Validate an entire interface. Returns all violations found.
pub fn validate_interface(iface: &Interface) -> Vec<Violation> {
    let mut ck = Checker { iface, out: Vec::new() };

    ck.unique("interface", "enum", iface.enums.iter().map(|e| e.name()));
    ck.unique("interface", "struct", iface.structs.iter().map(|s| s.name()));
    let mut seen = HashSet::new();
    for f in &iface.functions {
        if !seen.insert((f.name(), f.message_type)) {
            ck.push("interface", "name", format!("duplicate function `{}` ({})", f.name(), f.message_type));
        }
    }

    for e in &iface.enums {
        ck.enumeration(e);
    }
    for s in &iface.structs {
        ck.structure(s);
    }
    for f in &iface.functions {
        ck.function(f);
    }

    tracing::debug!(violations = ck.out.len(), "validation finished");
    ck.out
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    fn colors() -> Enum {
        Enum::new("Color").with_elements(["A", "B", "C"].map(EnumElement::new))
    }

    fn fields(v: &[Violation]) -> Vec<(&str, &str)> {
        v.iter().map(|x| (x.item.as_str(), x.field)).collect()
    }

    #[test]
    fn clean_interface_passes() {
        let iface = Interface::new()
            .with_enums([colors()])
            .with_structs([Struct::new("Point").with_members([
                Param::new("x", Ty::integer_range(Some(0), Some(0))),
                Param::new("tint", Ty::enum_ref("Color")).optional(),
            ])])
            .with_functions([
                Function::new("Draw", "DrawID", MessageType::Request).with_params([
                    FunctionParam::new("points", Ty::array_sized(Ty::struct_ref("Point"), Some(1), Some(8))),
                ]),
                Function::new("Draw", "DrawID", MessageType::Response),
            ]);
        assert_eq!(validate_interface(&iface), vec![]);
    }

    #[test]
    fn inverted_bounds_are_reported_through_arrays() {
        let iface = Interface::new().with_structs([Struct::new("S").with_members([
            Param::new("i", Ty::integer_range(Some(5), Some(1))),
            Param::new("d", Ty::array_of(Ty::double_range(Some(1.5), Some(0.5)))),
            Param::new("a", Ty::array_sized(Ty::Boolean, Some(3), Some(2))),
        ])]);
        let v = validate_interface(&iface);
        assert_eq!(fields(&v), vec![
            ("struct S.member i", "max_value"),
            ("struct S.member d", "max_value"),
            ("struct S.member a", "max_size"),
        ]);
        assert_eq!(v[0].to_string(), "[struct S.member i.max_value] min_value 5 exceeds max_value 1");
    }

    #[test]
    fn non_finite_doubles_are_reported() {
        let iface = Interface::new()
            .with_structs([Struct::new("S").with_members([
                Param::new("lo", Ty::double_range(Some(f64::NEG_INFINITY), Some(1.0))),
                Param::new("nan", Ty::array_of(Ty::double_range(Some(0.0), Some(f64::NAN)))),
                Param::new("both", Ty::double_range(Some(f64::NAN), Some(f64::INFINITY))),
            ])])
            .with_functions([Function::new("Set", "SetID", MessageType::Request).with_params([
                FunctionParam::new("ratio", Ty::double()).with_default(f64::NAN),
            ])]);
        let v = validate_interface(&iface);
        assert_eq!(fields(&v), vec![
            ("struct S.member lo", "min_value"),
            ("struct S.member nan", "max_value"),
            ("struct S.member both", "min_value"),
            ("struct S.member both", "max_value"),
            ("function Set(request).param ratio", "default_value"),
        ]);
        assert_eq!(v[0].to_string(), "[struct S.member lo.min_value] min_value -inf is not finite");
    }

    #[test]
    fn foreign_subset_elements_are_reported() {
        let subset = EnumSubset::new("Some", "Color").with_allowed(["A", "D"]);
        let iface = Interface::new().with_enums([colors()]).with_functions([
            Function::new("Paint", "PaintID", MessageType::Notification)
                .with_params([FunctionParam::new("c", Ty::EnumSubset(subset))]),
        ]);
        let v = validate_interface(&iface);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].field, "allowed_elements");
        assert!(v[0].message.contains("`D`"));
        assert_eq!(v[0].item, "function Paint(notification).param c.subset Some");
    }

    #[test]
    fn dangling_references_are_reported() {
        let iface = Interface::new().with_structs([Struct::new("S").with_members([
            Param::new("e", Ty::enum_ref("Missing")),
            Param::new("s", Ty::array_of(Ty::struct_ref("Gone"))),
            Param::new("sub", Ty::EnumSubset(EnumSubset::new("X", "Nowhere"))),
        ])]);
        let v = validate_interface(&iface);
        assert_eq!(fields(&v), vec![
            ("struct S.member e", "param_type"),
            ("struct S.member s", "param_type"),
            ("struct S.member sub.subset X", "enum"),
        ]);
    }

    #[test]
    fn duplicates_and_identifiers() {
        let iface = Interface::new()
            .with_enums([
                Enum::new("Lang").with_elements([
                    EnumElement::new("EN-US").with_internal_name("EN_US").with_value(1),
                    EnumElement::new("DE-DE").with_value(1),
                    EnumElement::new("EN-US"),
                ]),
                Enum::new("Lang"),
            ])
            .with_functions([
                Function::new("Go", "GoID", MessageType::Request),
                Function::new("Go", "GoID", MessageType::Request),
            ]);
        let v = validate_interface(&iface);
        let msgs: Vec<String> = v.iter().map(ToString::to_string).collect();
        assert!(msgs.contains(&"[interface.name] duplicate enum `Lang`".to_owned()));
        assert!(msgs.contains(&"[interface.name] duplicate function `Go` (request)".to_owned()));
        assert!(msgs.contains(&"[enum Lang.name] duplicate element `EN-US`".to_owned()));
        assert!(msgs.iter().any(|m| m.starts_with("[enum Lang.element DE-DE.name]")));
        assert!(msgs.contains(&"[enum Lang.element DE-DE.value] value 1 already used by `EN-US`".to_owned()));
        // internal name rescues the first EN-US
        assert_eq!(msgs.iter().filter(|m| m.contains("EN-US.")).count(), 1);
    }
}
