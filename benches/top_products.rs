use criterion::{Criterion, criterion_group, criterion_main};
use sales_dashboard::aggregate::{top_products_by_profit, top_products_by_sales};
use sales_dashboard::config::ColumnNames;
use sales_dashboard::data::{SalesTable, Value};
use sales_dashboard::filter::{Selection, apply_selection};

const REGIONS: &[&str] = &["East", "West", "Central", "South"];
const STATES: &[&str] = &["California", "Texas", "New York", "Florida", "Ohio"];

fn generate_sales(rows: usize) -> SalesTable {
    let headers = ["Product Name", "Region", "State", "Sales", "Quantity", "Profit"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    let data = (0..rows)
        .map(|i| {
            vec![
                Value::Text(format!("Product {}", i % 500)),
                Value::from(REGIONS[i % REGIONS.len()]),
                Value::from(STATES[i % STATES.len()]),
                Value::Text(format!("{}.{:02}", (i * 37) % 5000, i % 100)),
                Value::Number(((i % 9) + 1) as f64),
                Value::Number(((i * 13) % 700) as f64 - 200.0),
            ]
        })
        .collect();
    SalesTable::new(headers, data)
}

fn bench_top_products(c: &mut Criterion) {
    let table = generate_sales(50_000);
    let columns = ColumnNames::default();
    let west = Selection::Only("West".to_string());

    let mut group = c.benchmark_group("top_products");

    group.bench_function("all_regions", |b| {
        b.iter(|| {
            let view = apply_selection(&table, &columns, &Selection::All, &Selection::All)
                .expect("filter");
            top_products_by_sales(&view.table, &columns, 5).expect("sales");
            top_products_by_profit(&view.table, &columns, 5).expect("profit");
        });
    });

    group.bench_function("single_region", |b| {
        b.iter(|| {
            let view =
                apply_selection(&table, &columns, &west, &Selection::All).expect("filter");
            top_products_by_sales(&view.table, &columns, 5).expect("sales");
            top_products_by_profit(&view.table, &columns, 5).expect("profit");
        });
    });

    group.finish();
}

criterion_group!(benches, bench_top_products);
criterion_main!(benches);
