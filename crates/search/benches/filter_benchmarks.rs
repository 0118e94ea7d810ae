use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use storefront_catalog::{Catalog, RawProductRecord};
use storefront_search::{FilterCriteria, filter_products};

const SECTIONS: [&str; 3] = ["MAN", "WOMAN", "KIDS"];
const TERMS: [&str; 5] = ["shirts", "jeans", "jackets", "dresses", "t-shirts"];

fn synthetic_catalog(size: usize) -> Catalog {
    let records = (0..size).map(|i| RawProductRecord {
        sku: format!("ZL-{i:06}"),
        name: format!("Product {i} {}", TERMS[i % TERMS.len()]),
        description: format!("Synthetic description number {i} in a soft cotton blend"),
        price: format!("{}.90", 10 + i % 90),
        currency: "USD".to_string(),
        section: SECTIONS[i % SECTIONS.len()].to_string(),
        terms: TERMS[i % TERMS.len()].to_string(),
        image_downloads: format!("product-{i}"),
    });
    Catalog::load(records).catalog
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_products");

    for size in [100usize, 1_000, 10_000] {
        let catalog = synthetic_catalog(size);
        group.throughput(Throughput::Elements(size as u64));

        let text_only = FilterCriteria::new().with_query("Cotton");
        group.bench_with_input(BenchmarkId::new("query", size), &catalog, |b, catalog| {
            b.iter(|| filter_products(black_box(catalog.products()), black_box(&text_only)))
        });

        let combined = FilterCriteria::new()
            .with_query("product 1")
            .with_terms("jeans")
            .with_section("WOMAN");
        group.bench_with_input(BenchmarkId::new("query_terms_section", size), &catalog, |b, catalog| {
            b.iter(|| filter_products(black_box(catalog.products()), black_box(&combined)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_filter);
criterion_main!(benches);
