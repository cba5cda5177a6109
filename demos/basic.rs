use ruletree::{IndexBuilder, Object};

fn main() {
    // Define rules over an ordered attribute list
    let index = IndexBuilder::new(["country", "brand"])
        .rule("store_1", |r| r.one_of("country", ["US"]).one_of("brand", ["Nike"]))
        .rule("store_2", |r| r.one_of("country", ["US"]))
        .rule("store_3", |r| r.none_of("brand", ["Adidas", "Puma"]))
        .build()
        .expect("failed to build index");

    println!("{index}");

    // Classify an object
    let offer = Object::new("offer_123")
        .set("country", "US")
        .set("brand", "Nike");

    let codes = index.matches(&offer);
    if codes.is_empty() {
        println!("No rule matched.");
    } else {
        println!("{}: {codes:?}", offer.id());
    }
}
