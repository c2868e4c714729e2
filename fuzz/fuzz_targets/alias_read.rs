#![no_main]
use libfuzzer_sys::fuzz_target;
use nmapwrap::{AttrAlias, Node, TagListAlias, View};

// First line is a dotted path, the rest is the document
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let (path, xml) = text.split_once('\n').unwrap_or((text, ""));
    let Ok(doc) = nmapwrap::from_xml_str(xml) else {
        return;
    };
    let root = Node::from_element(doc.root);
    if let Ok(alias) = AttrAlias::text(path) {
        let _ = alias.get(&root);
    }
    if let Ok(alias) = TagListAlias::<Node>::new(path) {
        let _ = alias.get(&root);
    }
    let _ = root.lookup_or(path, "");
});
