//! nmapwrap - typed, declarative views over nmap XML output
//!
//! # Quick Start
//!
//! ```
//! use nmapwrap::{view, View};
//!
//! view! {
//!     pub struct ScanInfo {
//!         protocol: String = attr("scaninfo.protocol"),
//!         services: u32 = attr("scaninfo.numservices"),
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let scan = ScanInfo::parse(
//!     r#"<nmaprun><scaninfo type="syn" protocol="tcp" numservices="3"/></nmaprun>"#,
//! )?;
//! assert_eq!(scan.protocol()?, "tcp");
//! assert_eq!(scan.services()?, 3);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

use tracing::instrument;

pub mod error;
pub use error::{Error, ErrorKind, Pos, ReadError, Result, Span};

pub mod xml;
pub use xml::{
    Config as XmlConfig, Content as XmlContent, Document as XmlDocument, Element as XmlElement,
    Parser as XmlParser,
};

pub mod path;
pub use path::DottedPath;

pub mod view;
pub use view::{Lookup, Node, View};

pub mod cast;

pub mod alias;
pub use alias::{AttrAlias, TagAlias, TagListAlias};

pub mod macros;

#[cfg(feature = "nmap")]
pub mod nmap;
#[cfg(feature = "nmap")]
pub use nmap::{find_nmap, nmap_command, run_command_sync, scan};

/// Parse XML from string
#[instrument(skip_all, fields(len = s.len()))]
pub fn from_xml_str(s: &str) -> Result<XmlDocument> {
    let mut parser = XmlParser::new(s.as_bytes());
    parser.parse()
}

/// Parse XML from bytes
#[instrument(skip_all, fields(len = bytes.len()))]
pub fn from_xml_bytes(bytes: &[u8]) -> Result<XmlDocument> {
    let mut parser = XmlParser::new(bytes);
    parser.parse()
}

/// Parse XML with custom limits
pub fn from_xml_str_with_config(s: &str, config: XmlConfig) -> Result<XmlDocument> {
    let mut parser = XmlParser::with_config(s.as_bytes(), config);
    parser.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_points_agree() -> Result<()> {
        let xml = r#"<nmaprun><scaninfo protocol="tcp"/></nmaprun>"#;
        let from_str = from_xml_str(xml)?;
        assert_eq!(from_xml_bytes(xml.as_bytes())?, from_str);
        assert_eq!(from_xml_str_with_config(xml, XmlConfig::unlimited())?, from_str);
        Ok(())
    }

    #[test]
    fn test_with_config_applies_limits() {
        let err = from_xml_str_with_config("<a><b/></a>", XmlConfig::new(1, 0)).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MaxDepthExceeded { max: 1 });

        let err = from_xml_str_with_config("<a/>", XmlConfig::new(0, 2)).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MaxSizeExceeded { max: 2 });
    }
}
