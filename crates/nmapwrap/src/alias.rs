//! Attribute, tag and tag-list aliases
//!
//! An alias binds a dotted path (plus a cast or a target view type) and is
//! evaluated against a view on every read. Paths are validated when the
//! alias is constructed, never at read time.

use std::convert::Infallible;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use tracing::trace;

use crate::cast::{self, Cast};
use crate::error::{Error, ErrorKind, ReadError, Result};
use crate::path::{self, DottedPath};
use crate::view::View;

/// Dotted path ending in an attribute name, plus a cast applied to its value
pub struct AttrAlias<T, E = Infallible> {
    path: DottedPath,
    cast: Cast<T, E>,
}

impl<T, E> AttrAlias<T, E> {
    pub fn new(path: &str, cast: Cast<T, E>) -> Result<Self> {
        Ok(Self {
            path: DottedPath::parse(path)?,
            cast,
        })
    }

    pub fn path(&self) -> &DottedPath {
        &self.path
    }

    /// The raw attribute string, before casting
    pub fn raw<'v, V: View>(&self, view: &'v V) -> Result<&'v str> {
        let (element, attribute) = path::resolve_parent(view.element(), &self.path)?;
        element.attribute(attribute).ok_or_else(|| {
            Error::from_kind(ErrorKind::AttributeNotFound {
                tag: element.name.clone(),
                attribute: attribute.to_string(),
            })
        })
    }

    pub fn get<V: View>(&self, view: &V) -> std::result::Result<T, ReadError<E>> {
        trace!(path = %self.path, "reading attribute alias");
        let raw = self.raw(view)?;
        (self.cast)(raw).map_err(ReadError::Cast)
    }
}

impl AttrAlias<String> {
    /// Alias returning the attribute string unchanged
    pub fn text(path: &str) -> Result<Self> {
        Self::new(path, cast::text)
    }
}

impl<T: FromStr> AttrAlias<T, T::Err> {
    /// Alias casting through [`FromStr`]
    pub fn parsed(path: &str) -> Result<Self> {
        Self::new(path, cast::parsed::<T>)
    }
}

impl<T, E> Clone for AttrAlias<T, E> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            cast: self.cast,
        }
    }
}

impl<T, E> fmt::Debug for AttrAlias<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttrAlias")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Dotted path of tag names whose target element is wrapped as `V`
pub struct TagAlias<V> {
    path: DottedPath,
    target: PhantomData<fn() -> V>,
}

impl<V: View> TagAlias<V> {
    pub fn new(path: &str) -> Result<Self> {
        Ok(Self {
            path: DottedPath::parse(path)?,
            target: PhantomData,
        })
    }

    /// List variant: every sibling matching the last segment
    pub fn list(path: &str) -> Result<TagListAlias<V>> {
        TagListAlias::new(path)
    }

    pub fn path(&self) -> &DottedPath {
        &self.path
    }

    pub fn get<W: View>(&self, view: &W) -> Result<V> {
        trace!(path = %self.path, "reading tag alias");
        path::resolve(view.element(), &self.path).map(V::wrap)
    }
}

/// Dotted path whose last segment may match many siblings, each wrapped as `V`
pub struct TagListAlias<V> {
    path: DottedPath,
    target: PhantomData<fn() -> V>,
}

impl<V: View> TagListAlias<V> {
    pub fn new(path: &str) -> Result<Self> {
        Ok(Self {
            path: DottedPath::parse(path)?,
            target: PhantomData,
        })
    }

    pub fn path(&self) -> &DottedPath {
        &self.path
    }

    pub fn get<W: View>(&self, view: &W) -> Result<Vec<V>> {
        trace!(path = %self.path, "reading tag list alias");
        let elements = path::resolve_all(view.element(), &self.path)?;
        Ok(elements.into_iter().map(V::wrap).collect())
    }
}

macro_rules! impl_tag_alias_common {
    ($name:ident) => {
        impl<V> Clone for $name<V> {
            fn clone(&self) -> Self {
                Self {
                    path: self.path.clone(),
                    target: PhantomData,
                }
            }
        }

        impl<V> fmt::Debug for $name<V> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("path", &self.path)
                    .field("target", &std::any::type_name::<V>())
                    .finish()
            }
        }
    };
}

impl_tag_alias_common!(TagAlias);
impl_tag_alias_common!(TagListAlias);
