use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::Utc;
use invoicer_core::{InvoiceId, Money, ProductId, Quantity};
use invoicer_invoicing::Invoice;
use invoicer_products::{Catalog, Product};

/// Catalog of `products` items priced 0.01..=products/100.
fn catalog(products: usize) -> (Catalog, Vec<ProductId>) {
    let mut catalog = Catalog::new();
    let mut ids = Vec::with_capacity(products);
    for i in 0..products {
        let product = Product::new(ProductId::new(), format!("P{i}"), Money::from_minor(i as i64 + 1, 2))
            .unwrap();
        ids.push(product.id_typed());
        catalog.insert(product).unwrap();
    }
    (catalog, ids)
}

fn invoice(lines: usize, products: &[ProductId]) -> Invoice {
    let mut invoice = Invoice::new(InvoiceId::new(), Utc::now());
    for i in 0..lines {
        invoice.add_line(products[i % products.len()], Quantity::from((i % 7) as i64 + 1));
    }
    invoice
}

/// Totals are recomputed on every read; this measures the cost of one read.
fn bench_total_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("invoice_total");
    let (catalog, products) = catalog(500);

    for lines in [10usize, 100, 1_000, 10_000] {
        let invoice = invoice(lines, &products);
        group.throughput(Throughput::Elements(lines as u64));
        group.bench_with_input(BenchmarkId::from_parameter(lines), &invoice, |b, invoice| {
            b.iter(|| black_box(invoice.total(&catalog).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_total_recompute);
criterion_main!(benches);
