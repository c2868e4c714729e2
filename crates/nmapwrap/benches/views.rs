use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use nmapwrap::{from_xml_str, view, View};

const SCAN_XML: &str = include_str!("../tests/fixtures/scan.xml");
const ATTR_XML: &str = "<port protocol=\"tcp\" portid='22'><state state=\"open\"/></port>";

view! {
    struct Port {
        number: u16 = attr("portid"),
        state: String = attr("state.state"),
    }
}

view! {
    struct Scan {
        ports: Vec<Port> = tags("host.ports.port"),
    }
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("nmapwrap_parse_attr", |b| {
        b.iter(|| from_xml_str(black_box(ATTR_XML)))
    });
    c.bench_function("nmapwrap_parse_scan", |b| {
        b.iter(|| from_xml_str(black_box(SCAN_XML)))
    });
}

fn bench_aliases(c: &mut Criterion) {
    let port = Port::parse(ATTR_XML).ok().unwrap_or_default();
    c.bench_function("nmapwrap_attr_alias", |b| {
        b.iter(|| (black_box(&port).number(), black_box(&port).state()))
    });

    let scan = Scan::parse(SCAN_XML).ok().unwrap_or_default();
    c.bench_function("nmapwrap_tag_list_alias", |b| {
        b.iter(|| black_box(&scan).ports())
    });
}

criterion_group!(benches, bench_parse, bench_aliases);
criterion_main!(benches);
