//! Criterion benchmarks for hclfmt-core.
//!
//! - tokenize a 200-resource document
//! - full format pass (parse, normalize, serialize) over the same document
//! - format pass over an already-canonical document

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use hclfmt_core::parser::tokenizer::Tokenizer;
use hclfmt_core::{format_hcl, format_source};

/// A legacy-style document with `count` resources and variables
fn make_document(count: usize) -> String {
    let mut out = String::new();
    for i in 0..count {
        out.push_str(&format!(
            "variable \"list_{i}\" {{\n  type    = list\n  default = []\n}}\n\n\
             resource aws_instance \"web_{i}\" {{\n  ami   = \"${{var.ami}}\"\n  \
             name  = \"web-${{count.index}}\" # tagged\n  zones = \"${{\n    element(var.zones, {i})\n  }}\"\n}}\n\n"
        ));
    }
    out
}

fn bench_tokenize(c: &mut Criterion) {
    let doc = make_document(200);
    c.bench_function("tokenize_200_resources", |bench| {
        bench.iter(|| Tokenizer::new(black_box(&doc)).tokenize());
    });
}

fn bench_format_legacy(c: &mut Criterion) {
    let doc = make_document(200);
    c.bench_function("format_200_resources_legacy", |bench| {
        bench.iter(|| format_hcl(black_box(doc.as_bytes())));
    });
}

fn bench_format_canonical(c: &mut Criterion) {
    let doc = format_source(make_document(200).as_bytes()).output;
    c.bench_function("format_200_resources_canonical", |bench| {
        bench.iter(|| format_hcl(black_box(&doc)));
    });
}

criterion_group!(
    benches,
    bench_tokenize,
    bench_format_legacy,
    bench_format_canonical,
);
criterion_main!(benches);
