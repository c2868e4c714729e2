//! Dotted paths and the resolver that walks them through an element tree

use std::fmt;
use std::str::FromStr;

use tracing::trace;

use crate::error::{Error, ErrorKind, Result};
use crate::xml::Element;

/// Non-empty sequence of tag names (optionally ending in an attribute name)
/// written as `"host.ports.port"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DottedPath {
    raw: String,
    segments: Vec<String>,
}

impl DottedPath {
    /// Parse a dotted path, rejecting empty paths and empty segments
    pub fn parse(path: &str) -> Result<Self> {
        if !is_valid(path) {
            return Err(Error::from_kind(ErrorKind::InvalidPath {
                path: path.to_string(),
            }));
        }
        Ok(Self {
            raw: path.to_string(),
            segments: path.split('.').map(str::to_string).collect(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// All segments but the last, and the last one
    pub fn split_last(&self) -> (&[String], &str) {
        match self.segments.split_last() {
            Some((last, parents)) => (parents, last.as_str()),
            None => (self.segments.as_slice(), ""),
        }
    }
}

impl FromStr for DottedPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DottedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Compile-time check used by [`view!`](crate::view!): non-empty, no empty segments.
#[allow(clippy::indexing_slicing)]
pub const fn is_valid(path: &str) -> bool {
    let bytes = path.as_bytes();
    if bytes.is_empty() {
        return false;
    }
    let mut i = 0;
    let mut segment_len = 0;
    while i < bytes.len() {
        if bytes[i] == b'.' {
            if segment_len == 0 {
                return false;
            }
            segment_len = 0;
        } else {
            segment_len += 1;
        }
        i += 1;
    }
    segment_len > 0
}

/// Descend from `root` one child per segment, taking the first match at each
/// level. `path` is only used for error reporting.
pub fn resolve_segments<'e, S: AsRef<str>>(
    root: &'e Element,
    segments: &[S],
    path: &str,
) -> Result<&'e Element> {
    let mut current = root;
    for segment in segments {
        let segment = segment.as_ref();
        current = current.child(segment).ok_or_else(|| {
            trace!(root = %root.name, segment, path, "path segment missing");
            Error::from_kind(ErrorKind::PathNotFound {
                segment: segment.to_string(),
                path: path.to_string(),
                root: root.name.clone(),
            })
        })?;
    }
    Ok(current)
}

/// Resolve every segment of `path` as a tag name
pub fn resolve<'e>(root: &'e Element, path: &DottedPath) -> Result<&'e Element> {
    resolve_segments(root, path.segments(), path.as_str())
}

/// Resolve all but the last segment, returning the parent element and the
/// unresolved last segment.
pub fn resolve_parent<'e, 'p>(
    root: &'e Element,
    path: &'p DottedPath,
) -> Result<(&'e Element, &'p str)> {
    let (parents, last) = path.split_last();
    let parent = resolve_segments(root, parents, path.as_str())?;
    Ok((parent, last))
}

/// Resolve all but the last segment, then collect every child matching the
/// last one in document order. Zero matches is not an error.
pub fn resolve_all<'e>(root: &'e Element, path: &DottedPath) -> Result<Vec<&'e Element>> {
    let (parent, last) = resolve_parent(root, path)?;
    Ok(parent.children_named(last).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::Parser;

    fn tree() -> Result<Element> {
        let input = b"<root><a><b attr=\"5\"/><b attr=\"6\"/></a><a><c/></a></root>";
        Ok(Parser::new(input).parse()?.root)
    }

    #[test]
    fn test_parse_rejects_empty_paths() {
        for bad in ["", ".", "a.", ".a", "a..b"] {
            let err = DottedPath::parse(bad).unwrap_err();
            assert_eq!(
                err.kind(),
                &ErrorKind::InvalidPath {
                    path: bad.to_string()
                }
            );
        }
    }

    #[test]
    fn test_parse_splits_segments() -> Result<()> {
        let path: DottedPath = "host.ports.port".parse()?;
        assert_eq!(path.segments(), ["host", "ports", "port"]);
        assert_eq!(path.split_last(), (&path.segments()[..2], "port"));
        assert_eq!(path.to_string(), "host.ports.port");
        Ok(())
    }

    #[test]
    fn test_is_valid_is_usable_in_const() {
        const OK: bool = is_valid("status.state");
        const BAD: bool = is_valid("status..state");
        assert!(OK);
        assert!(!BAD);
    }

    #[test]
    fn test_resolve_takes_first_match() -> Result<()> {
        let root = tree()?;
        let b = resolve(&root, &DottedPath::parse("a.b")?)?;
        assert_eq!(b.attribute("attr"), Some("5"));
        Ok(())
    }

    #[test]
    fn test_resolve_does_not_backtrack_to_later_duplicates() -> Result<()> {
        // the first <a> has no <c>, so the second <a> is never considered
        let root = tree()?;
        let err = resolve(&root, &DottedPath::parse("a.c")?).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::PathNotFound {
                segment: "c".to_string(),
                path: "a.c".to_string(),
                root: "root".to_string(),
            }
        );
        Ok(())
    }

    #[test]
    fn test_resolve_parent_reports_full_path() -> Result<()> {
        let root = tree()?;
        let path = DottedPath::parse("missing.b.attr")?;
        let err = resolve_parent(&root, &path).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::PathNotFound {
                segment: "missing".to_string(),
                path: "missing.b.attr".to_string(),
                root: "root".to_string(),
            }
        );
        Ok(())
    }

    #[test]
    fn test_resolve_all_collects_in_order() -> Result<()> {
        let root = tree()?;
        let found = resolve_all(&root, &DottedPath::parse("a.b")?)?;
        let attrs: Vec<_> = found.iter().filter_map(|b| b.attribute("attr")).collect();
        assert_eq!(attrs, vec!["5", "6"]);

        let none = resolve_all(&root, &DottedPath::parse("a.zzz")?)?;
        assert!(none.is_empty());
        Ok(())
    }

    #[test]
    fn test_resolve_all_outlives_path() -> Result<()> {
        let root = tree()?;
        let found = {
            let path = DottedPath::parse("a.b")?;
            resolve_all(&root, &path)?
        };
        assert_eq!(found.len(), 2);

        let name = String::from("b");
        let first_a = root.child("a").ok_or_else(|| Error::from_kind(ErrorKind::MalformedXml))?;
        let named: Vec<&Element> = first_a.children_named(&name).collect();
        drop(name);
        assert_eq!(named.len(), 2);
        Ok(())
    }

    #[test]
    fn test_empty_segments_resolve_to_root() -> Result<()> {
        let root = tree()?;
        let same = resolve_segments::<&str>(&root, &[], "")?;
        assert_eq!(same.name, "root");
        Ok(())
    }
}
