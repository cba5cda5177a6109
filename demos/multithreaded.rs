use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread;

use ruletree::{IndexBuilder, Object};

fn main() {
    let index = Arc::new(
        IndexBuilder::new(["country", "brand"])
            .rule("store_1", |r| r.one_of("country", ["US"]).one_of("brand", ["Nike"]))
            .rule("store_2", |r| r.one_of("country", ["US", "CA"]))
            .rule("store_3", |r| r.none_of("brand", ["Adidas", "Puma"]))
            .build()
            .expect("failed to build index"),
    );

    let brands = ["Nike", "Adidas", "Puma", "Reebok"];
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let idx = Arc::clone(&index);
            thread::spawn(move || {
                let offer = Object::new(format!("offer_{i}"))
                    .set("country", if i % 2 == 0 { "US" } else { "UK" })
                    .set("brand", brands[i]);
                let codes = idx.matches(&offer);
                println!("Thread {i}: {codes:?}");
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    // The batch driver does the same splitting internally
    let offers: Vec<Object> = (0..1_000)
        .map(|i| {
            Object::new(format!("batch_{i}"))
                .set("country", ["US", "CA", "UK"][i % 3])
                .set("brand", brands[i % brands.len()])
        })
        .collect();
    let threads = thread::available_parallelism().unwrap_or(NonZeroUsize::MIN);
    let result = index.match_all_parallel(&offers, threads);
    let hits = result.iter().filter(|(_, codes)| !codes.is_empty()).count();
    println!("{hits} of {} offers matched at least one store", result.len());
}
