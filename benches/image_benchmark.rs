use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use himalayan_trails::{first_image, DataGateway, ImageProxyConfig, InMemoryGateway, Query};
use serde_json::{json, Value};

// First-image lookup across every stored shape of the images field
pub fn image_benchmark(c: &mut Criterion) {
    let proxy = ImageProxyConfig::default();
    let storage_url = "https://abc.supabase.co/storage/v1/object/public/trails/kedarkantha.jpg";

    let shapes: Vec<(&str, Value)> = vec![
        ("null", Value::Null),
        ("bare_string", json!("https://images.example.com/a.jpg")),
        ("string_array", json!(["https://images.example.com/a.jpg", "b.jpg"])),
        ("record_array", json!([{"url": storage_url}, {"src": "b.jpg"}])),
        ("encoded_string", Value::String(json!([storage_url, "b.jpg"]).to_string())),
    ];

    let mut group = c.benchmark_group("first_image");
    for (name, images) in &shapes {
        group.bench_with_input(BenchmarkId::from_parameter(name), images, |b, images| {
            b.iter(|| black_box(first_image(black_box(images), &proxy, 400)))
        });
    }
    group.finish();
}

// Featured-first, rating-descending listing over an in-process table
pub fn listing_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("category_listing");

    for size in [100usize, 1_000, 10_000].iter() {
        let rows = (0..*size)
            .map(|i| {
                json!({
                    "id": format!("d{}", i),
                    "name": format!("Destination {}", i),
                    "category_id": format!("c{}", i % 4),
                    "rating": (i % 50) as f64 / 10.0,
                    "is_featured": i % 7 == 0,
                })
            })
            .collect();
        let gateway = InMemoryGateway::new().with_table("destinations", rows);
        let query = Query::select("destinations")
            .eq("category_id", "c1")
            .order("is_featured", false)
            .order("rating", false);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(tokio_test::block_on(gateway.select(&query))))
        });
    }

    group.finish();
}

criterion_group!(benches, image_benchmark, listing_benchmark);
criterion_main!(benches);
