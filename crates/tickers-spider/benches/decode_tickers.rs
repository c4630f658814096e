use criterion::*;
use tickers_spider::sec::tickers::{self, Tickers};
use tickers_spider::table::to_item;

// a response the size of the real list (~10k companies)
fn response(n: usize) -> String {
    let entries: Vec<String> = (0..n)
        .map(|i| {
            format!(
                r#""{i}":{{"cik_str":{},"ticker":"TCK{i}","title":"Company Number {i} Holdings Inc."}}"#,
                1_000_000 + i
            )
        })
        .collect();
    format!("{{{}}}", entries.join(","))
}

fn benchmark_decode(c: &mut Criterion) {
    let body = response(10_000);

    c.bench_function("decode tickers", |b| {
        b.iter(|| {
            let _tickers: Tickers = tickers::decode(black_box(body.as_bytes())).unwrap();
        })
    });
}

fn benchmark_marshal(c: &mut Criterion) {
    let tickers = tickers::decode(response(10_000).as_bytes()).unwrap();

    c.bench_function("marshal tickers", |b| {
        b.iter(|| {
            for ticker in black_box(&tickers).values() {
                let _item = to_item(ticker).unwrap();
            }
        })
    });
}

criterion_group!(benches, benchmark_decode, benchmark_marshal);
criterion_main!(benches);
