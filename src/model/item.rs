use serde::{Deserialize, Serialize};

/// Free-text annotation attached to an interface item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Issue {
    pub fn new(creator: impl Into<String>, value: impl Into<String>) -> Self {
        Self { creator: Some(creator.into()), value: Some(value.into()) }
    }
}

/// Name and documentation shared by every named interface item.
///
/// Embedded by value (and flattened on the wire) into enums, elements,
/// subsets, params, structs and functions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDoc {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub design_description: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<Issue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub todos: Vec<String>,
}

impl ItemDoc {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }
}

/// Access to the embedded [`ItemDoc`], plus builder helpers for its fields.
pub trait Item: Sized {
    fn doc(&self) -> &ItemDoc;
    fn doc_mut(&mut self) -> &mut ItemDoc;

    fn name(&self) -> &str {
        &self.doc().name
    }

    fn with_description<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.doc_mut().description.extend(lines.into_iter().map(Into::into));
        self
    }

    fn with_design_description<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.doc_mut().design_description.extend(lines.into_iter().map(Into::into));
        self
    }

    fn with_issue(mut self, issue: Issue) -> Self {
        self.doc_mut().issues.push(issue);
        self
    }

    fn with_todo(mut self, todo: impl Into<String>) -> Self {
        self.doc_mut().todos.push(todo.into());
        self
    }
}

/// Implements [`Item`] for a type whose doc record lives at `self.$($path).+`.
macro_rules! impl_item {
    ($ty:ty => $($path:ident).+) => {
        impl $crate::model::item::Item for $ty {
            fn doc(&self) -> &$crate::model::item::ItemDoc {
                &self.$($path).+
            }

            fn doc_mut(&mut self) -> &mut $crate::model::item::ItemDoc {
                &mut self.$($path).+
            }
        }
    };
}
pub(crate) use impl_item;
