use ruletree::{Index, Object};

fn main() {
    let index = Index::from_file("demos/stores.rules").expect("failed to load rules");

    println!("{index}");
    for diagnostic in index.diagnostics() {
        println!("  {diagnostic}");
    }

    let offer = Object::new("offer_456")
        .set("country", "UK")
        .set("brand", "Reebok");

    let codes = index.matches(&offer);
    println!("{}: {codes:?}", offer.id());
}
