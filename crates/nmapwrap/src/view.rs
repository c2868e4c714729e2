//! Typed views over XML elements
//!
//! A view owns one [`Element`] and exposes it through dictionary-like
//! [`View::lookup`] and through aliases declared on the view type (see
//! [`alias`](crate::alias) and [`view!`](crate::view!)).

use std::any::type_name;
use std::fmt;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Error, ErrorKind, Result};
use crate::xml::{Config, Element, Parser};

/// Result of [`View::lookup`]: an attribute value or a wrapped child element
#[derive(Clone, Debug, PartialEq)]
pub enum Lookup<V> {
    Attribute(String),
    Child(V),
}

impl<V> Lookup<V> {
    pub fn is_attribute(&self) -> bool {
        matches!(self, Self::Attribute(_))
    }

    pub fn is_child(&self) -> bool {
        matches!(self, Self::Child(_))
    }

    pub fn as_attribute(&self) -> Option<&str> {
        match self {
            Self::Attribute(value) => Some(value),
            Self::Child(_) => None,
        }
    }

    pub fn as_child(&self) -> Option<&V> {
        match self {
            Self::Attribute(_) => None,
            Self::Child(view) => Some(view),
        }
    }

    pub fn into_child(self) -> Option<V> {
        match self {
            Self::Attribute(_) => None,
            Self::Child(view) => Some(view),
        }
    }
}

impl<V> From<String> for Lookup<V> {
    fn from(value: String) -> Self {
        Self::Attribute(value)
    }
}

impl<V> From<&str> for Lookup<V> {
    fn from(value: &str) -> Self {
        Self::Attribute(value.to_string())
    }
}

/// A read-only, typed facade over one XML element.
///
/// Implementors own their element. Only [`View::from_element`] and
/// [`View::element`] are required; everything else is provided.
pub trait View: Sized {
    /// Take ownership of `element`
    fn from_element(element: Element) -> Self;

    /// The wrapped element
    fn element(&self) -> &Element;

    /// Build a view over a copy of `element`'s tag, attributes and children
    fn wrap(element: &Element) -> Self {
        Self::from_element(element.clone())
    }

    /// Parse XML text and wrap its root element
    fn parse(text: &str) -> Result<Self> {
        Self::parse_with_config(text, Config::default())
    }

    /// Parse XML text with custom parser limits and wrap its root element
    fn parse_with_config(text: &str, config: Config) -> Result<Self> {
        let document = Parser::with_config(text.as_bytes(), config).parse()?;
        debug!(
            view = type_name::<Self>(),
            root = %document.root.name,
            "wrapped document root"
        );
        Ok(Self::from_element(document.root))
    }

    fn tag(&self) -> &str {
        &self.element().name
    }

    fn attributes(&self) -> &IndexMap<String, String> {
        &self.element().attributes
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.element().attribute(name)
    }

    /// Child elements in document order
    fn children(&self) -> impl Iterator<Item = &Element> {
        self.element().elements()
    }

    /// Concatenated direct text content
    fn text(&self) -> String {
        self.element().text()
    }

    /// Look `name` up as an attribute first, then as a direct child tag.
    ///
    /// A matching child is wrapped in the same view type as `self`.
    fn lookup(&self, name: &str) -> Result<Lookup<Self>> {
        let element = self.element();
        if let Some(value) = element.attribute(name) {
            return Ok(Lookup::Attribute(value.to_string()));
        }
        match element.child(name) {
            Some(child) => Ok(Lookup::Child(Self::wrap(child))),
            None => Err(Error::from_kind(ErrorKind::KeyNotFound {
                tag: element.name.clone(),
                key: name.to_string(),
            })),
        }
    }

    /// Like [`View::lookup`] but returns `default` instead of failing
    fn lookup_or(&self, name: &str, default: impl Into<Lookup<Self>>) -> Lookup<Self> {
        self.lookup(name).unwrap_or_else(|_| default.into())
    }
}

/// The plain view: no aliases, just lookup.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node {
    element: Element,
}

impl View for Node {
    fn from_element(element: Element) -> Self {
        Self { element }
    }

    fn element(&self) -> &Element {
        &self.element
    }
}

impl Node {
    pub fn into_element(self) -> Element {
        self.element
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.element.name)?;
        for (name, value) in &self.element.attributes {
            write!(f, " {name}=\"{value}\"")?;
        }
        match self.element.elements().count() {
            0 => f.write_str("/>"),
            n => write!(f, ">[{n} children]"),
        }
    }
}
