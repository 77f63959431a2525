// benches/extract.rs
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use diag_tables::core::Diagnostics;
use diag_tables::{mapping, specs};

/// Synthetic tables-by-category page: `cats` categories × `provs` providers × 6 tables.
fn synthetic_page(cats: usize, provs: usize) -> String {
    let mut s = String::from("<html><head><script>var x = '<h2>no</h2>';</script></head><body><main>");
    for c in 0..cats {
        s.push_str(&format!("<h2 id=\"c{c}\">Category{c} tables</h2>"));
        for p in 0..provs {
            s.push_str(&format!("<h3>Provider{c}x{p}</h3><p>Microsoft.Bench{c}/type{p}</p><ul>"));
            for t in 0..6 {
                s.push_str(&format!(
                    "<li><a href=\"tables/bench{c}t{p}x{t}\" data-linktype=\"relative-path\">BenchTable{c}x{p}x{t}</a></li>"
                ));
            }
            s.push_str("</ul>");
        }
    }
    s.push_str("</main></body></html>");
    s
}

fn bench_extract(c: &mut Criterion) {
    let doc = synthetic_page(40, 12);

    c.bench_function("extract_tree", |b| {
        b.iter(|| {
            let tree = specs::extract(black_box(&doc), None);
            black_box(tree.table_count())
        })
    });

    c.bench_function("extract_filtered", |b| {
        b.iter(|| {
            let tree = specs::extract(black_box(&doc), Some("Category20"));
            black_box(tree.len())
        })
    });

    let tree = specs::extract(&doc, None);
    c.bench_function("build_index", |b| {
        b.iter(|| {
            let mut diags = Diagnostics::new();
            let idx = mapping::build(black_box(&tree), &mut diags);
            black_box(idx.len())
        })
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
