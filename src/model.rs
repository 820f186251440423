//! In-memory interface model.
//!
//! A parser builds one [`Interface`] from an interface-definition file; a
//! generator walks it to emit code. The model is inert data: constructors
//! take required fields and default everything else (fresh empty sequences,
//! `None` for optionals), and nothing here validates or resolves references.
//! Cross-item references are plain names; see [`Interface::resolve`] and
//! [`crate::validate`] for the opt-in passes.
pub mod item;
pub mod ty;
pub mod enums;
pub mod param;

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use item::{Issue, Item, ItemDoc};
pub use ty::Ty;
pub use enums::{Enum, EnumElement, EnumSubset};
pub use param::{DefaultValue, FunctionParam, Param};

use item::impl_item;

// ------------------------------ Structs ---------------------------------- //

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Struct {
    #[serde(flatten)]
    pub doc: ItemDoc,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Param>,
}

impl Struct {
    pub fn new(name: impl Into<String>) -> Self {
        Self { doc: ItemDoc::new(name), members: Vec::new() }
    }

    pub fn with_members(mut self, members: impl IntoIterator<Item = Param>) -> Self {
        self.members.extend(members);
        self
    }

    pub fn member_named(&self, name: &str) -> Option<&Param> {
        self.members.iter().find(|m| m.doc.name == name)
    }
}

impl_item!(Struct => doc);

// ----------------------------- Functions --------------------------------- //

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Request,
    Response,
    Notification,
}

impl MessageType {
    pub const ALL: [MessageType; 3] = [MessageType::Request, MessageType::Response, MessageType::Notification];

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Request => "request",
            MessageType::Response => "response",
            MessageType::Notification => "notification",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown message type `{0}` (expected request, response or notification)")]
pub struct UnknownMessageType(pub String);

impl FromStr for MessageType {
    type Err = UnknownMessageType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageType::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownMessageType(s.to_owned()))
    }
}

/// Interface operation. A request and its response share `name` and
/// `function_id` and differ by `message_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    #[serde(flatten)]
    pub doc: ItemDoc,
    pub function_id: String,
    pub message_type: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<FunctionParam>,
}

impl Function {
    pub fn new(name: impl Into<String>, function_id: impl Into<String>, message_type: MessageType) -> Self {
        Self {
            doc: ItemDoc::new(name),
            function_id: function_id.into(),
            message_type,
            platform: None,
            params: Vec::new(),
        }
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn with_params(mut self, params: impl IntoIterator<Item = FunctionParam>) -> Self {
        self.params.extend(params);
        self
    }

    pub fn param_named(&self, name: &str) -> Option<&FunctionParam> {
        self.params.iter().find(|p| p.param.doc.name == name)
    }
}

impl_item!(Function => doc);

// ----------------------------- Interface --------------------------------- //

/// Root of the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enums: Vec<Enum>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub structs: Vec<Struct>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<Function>,
    /// Interface-level metadata (name, version, ...), in authored order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub params: IndexMap<String, String>,
}

/// Target of a named type reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    Enum(&'a Enum),
    /// Subset together with the enum it restricts.
    EnumSubset(&'a EnumSubset, &'a Enum),
    Struct(&'a Struct),
}

impl Interface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_enums(mut self, enums: impl IntoIterator<Item = Enum>) -> Self {
        self.enums.extend(enums);
        self
    }

    pub fn with_structs(mut self, structs: impl IntoIterator<Item = Struct>) -> Self {
        self.structs.extend(structs);
        self
    }

    pub fn with_functions(mut self, functions: impl IntoIterator<Item = Function>) -> Self {
        self.functions.extend(functions);
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn enum_named(&self, name: &str) -> Option<&Enum> {
        self.enums.iter().find(|e| e.doc.name == name)
    }

    pub fn struct_named(&self, name: &str) -> Option<&Struct> {
        self.structs.iter().find(|s| s.doc.name == name)
    }

    pub fn function_named(&self, name: &str, message_type: MessageType) -> Option<&Function> {
        self.functions.iter().find(|f| f.doc.name == name && f.message_type == message_type)
    }

    /// Look up the item a type refers to, looking through arrays.
    ///
    /// Returns `None` for primitives and for dangling names.
    pub fn resolve<'a>(&'a self, ty: &'a Ty) -> Option<Resolved<'a>> {
        match ty.element() {
            Ty::Enum(name) => self.enum_named(name).map(Resolved::Enum),
            Ty::Struct(name) => self.struct_named(name).map(Resolved::Struct),
            Ty::EnumSubset(subset) => self
                .enum_named(&subset.enum_name)
                .map(|parent| Resolved::EnumSubset(subset, parent)),
            _ => None,
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
