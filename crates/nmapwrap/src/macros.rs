//! Declarative view types
//!
//! [`view!`](crate::view!) turns a table of aliases into a view struct with
//! one accessor per alias:
//!
//! ```
//! use nmapwrap::{cast, view, View};
//! use time::OffsetDateTime;
//!
//! view! {
//!     /// nmap's `<port>` element
//!     pub struct Port {
//!         protocol: String = attr("protocol"),
//!         number: u16 = attr("portid"),
//!         state: String = attr("state.state"),
//!     }
//! }
//!
//! view! {
//!     pub struct Host {
//!         start: OffsetDateTime = attr("starttime", cast::unix_timestamp, cast::TimestampError),
//!         ports: Vec<Port> = tags("ports.port"),
//!         address: nmapwrap::Node = tag("address"),
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let host = Host::parse(
//!     r#"<host starttime="1700000000"><address addr="127.0.0.1"/>
//!        <ports><port protocol="tcp" portid="22"><state state="open"/></port></ports>
//!     </host>"#,
//! )?;
//! let ports = host.ports()?;
//! assert_eq!(ports.len(), 1);
//! assert_eq!(ports[0].number()?, 22);
//! assert_eq!(ports[0].state()?, "open");
//! assert_eq!(host.address()?.attribute("addr"), Some("127.0.0.1"));
//! assert_eq!(host.start()?.unix_timestamp(), 1_700_000_000);
//! # Ok(())
//! # }
//! ```
//!
//! Alias kinds:
//!
//! - `attr("path")`: attribute cast through [`FromStr`](core::str::FromStr);
//!   the accessor returns `Result<T, ReadError<T::Err>>`.
//! - `attr("path", cast_fn, ErrorType)`: attribute cast by `cast_fn`;
//!   the accessor returns `Result<T, ReadError<ErrorType>>`.
//! - `tag("path")`: first element at `path`, wrapped as the field type.
//! - `tags("path")`: every sibling matching the last segment, as `Vec<V>`.
//!
//! Every path literal is checked at compile time: an empty path or an empty
//! segment fails the build where the view is declared.

use crate::view::View;

/// Names the element type of a `tags(..)` field.
#[doc(hidden)]
pub trait ListOf {
    type Item: View;
}

impl<V: View> ListOf for Vec<V> {
    type Item = V;
}

/// Declare a view type and its aliases. See the [module docs](crate::macros).
#[macro_export]
macro_rules! view {
    (@accessor $(#[$fmeta:meta])* $field:ident : $ty:ty = attr ( $path:literal $(,)? )) => {
        $(#[$fmeta])*
        pub fn $field(
            &self,
        ) -> ::core::result::Result<
            $ty,
            $crate::ReadError<<$ty as ::core::str::FromStr>::Err>,
        > {
            const _: () = ::core::assert!(
                $crate::path::is_valid($path),
                "invalid dotted path in view! declaration"
            );
            $crate::AttrAlias::<$ty, _>::parsed($path)?.get(self)
        }
    };

    (@accessor $(#[$fmeta:meta])* $field:ident : $ty:ty = attr ( $path:literal, $cast:expr, $err:ty $(,)? )) => {
        $(#[$fmeta])*
        pub fn $field(&self) -> ::core::result::Result<$ty, $crate::ReadError<$err>> {
            const _: () = ::core::assert!(
                $crate::path::is_valid($path),
                "invalid dotted path in view! declaration"
            );
            $crate::AttrAlias::<$ty, $err>::new($path, $cast)?.get(self)
        }
    };

    (@accessor $(#[$fmeta:meta])* $field:ident : $ty:ty = tag ( $path:literal $(,)? )) => {
        $(#[$fmeta])*
        pub fn $field(&self) -> $crate::Result<$ty> {
            const _: () = ::core::assert!(
                $crate::path::is_valid($path),
                "invalid dotted path in view! declaration"
            );
            $crate::TagAlias::<$ty>::new($path)?.get(self)
        }
    };

    (@accessor $(#[$fmeta:meta])* $field:ident : $ty:ty = tags ( $path:literal $(,)? )) => {
        $(#[$fmeta])*
        pub fn $field(&self) -> $crate::Result<$ty> {
            const _: () = ::core::assert!(
                $crate::path::is_valid($path),
                "invalid dotted path in view! declaration"
            );
            $crate::TagListAlias::<<$ty as $crate::macros::ListOf>::Item>::new($path)?.get(self)
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $field:ident : $ty:ty = $kind:ident ( $($args:tt)* )
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq)]
        $vis struct $name {
            element: $crate::xml::Element,
        }

        impl $crate::View for $name {
            fn from_element(element: $crate::xml::Element) -> Self {
                Self { element }
            }

            fn element(&self) -> &$crate::xml::Element {
                &self.element
            }
        }

        impl $name {
            $(
                $crate::view!(@accessor $(#[$fmeta])* $field : $ty = $kind ( $($args)* ));
            )*
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::error::{ErrorKind, Result};
    use crate::view::{Lookup, Node, View};

    view! {
        struct Item {
            id: u32 = attr("id"),
            label: String = attr("meta.label"),
        }
    }

    view! {
        /// Root of the sample document
        struct Catalog {
            owner: String = attr("owner"),
            first: Item = tag("items.item"),
            items: Vec<Item> = tags("items.item"),
            nothing: Vec<Item> = tags("missing.item"),
            raw: Node = tag("items"),
            shouted: String = attr("owner", |raw: &str| Ok(raw.to_uppercase()), std::convert::Infallible),
        }
    }

    const CATALOG: &str = r#"<catalog owner="ops">
        <items>
            <item id="1"><meta label="one"/></item>
            <item id="2"><meta label="two"/></item>
            <item id="x"/>
        </items>
    </catalog>"#;

    #[test]
    fn test_generated_accessors() -> Result<()> {
        let catalog = Catalog::parse(CATALOG)?;
        assert_eq!(catalog.owner()?, "ops");
        assert_eq!(catalog.shouted()?, "OPS");
        assert_eq!(catalog.first()?.id(), Ok(1));
        assert_eq!(catalog.raw()?.tag(), "items");

        let items = catalog.items()?;
        assert_eq!(items.len(), 3);
        let labels: Vec<_> = items.iter().take(2).filter_map(|i| i.label().ok()).collect();
        assert_eq!(labels, vec!["one", "two"]);
        Ok(())
    }

    #[test]
    fn test_generated_accessor_errors() -> Result<()> {
        let catalog = Catalog::parse(CATALOG)?;
        let items = catalog.items()?;
        let last = items.last().cloned().unwrap_or_default();
        assert!(last.id().unwrap_err().as_cast().is_some());
        assert!(matches!(
            last.label().unwrap_err().as_resolve().map(|e| e.kind()),
            Some(ErrorKind::PathNotFound { segment, .. }) if segment == "meta"
        ));

        let err = catalog.nothing().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::PathNotFound { segment, .. } if segment == "missing"));
        Ok(())
    }

    #[test]
    fn test_lookup_wraps_in_same_view_type() -> Result<()> {
        let catalog = Catalog::parse(CATALOG)?;
        match catalog.lookup("items")? {
            Lookup::Child(items) => {
                // a <items> wrapped as Catalog: its aliases do not apply
                assert_eq!(items.tag(), "items");
                assert!(items.owner().is_err());
            }
            Lookup::Attribute(value) => panic!("unexpected attribute {value}"),
        }
        Ok(())
    }
}
