use ruletree::{IndexBuilder, Object};

fn main() {
    let index = IndexBuilder::new(["country", "brand", "channel"])
        .rule("store_1", |r| r.one_of("country", ["US"]).one_of("brand", ["Nike"]))
        .rule("store_2", |r| r.one_of("country", ["US"]))
        .rule("store_3", |r| r.none_of("brand", ["Adidas", "Puma"]))
        .rule("web_only", |r| r.one_of("channel", ["web"]).none_of("country", ["CN"]))
        .build()
        .expect("failed to build index");

    let offer = Object::new("offer_789")
        .set("country", "US")
        .set("brand", "Adidas")
        .set("channel", "web");

    let report = index.match_detailed(&offer);

    println!("{report}");
    println!();
    println!("Matched codes: {:?}", report.codes());
    println!("Nodes visited: {} of {}", report.visited(), index.node_count());
    for exclusion in report.exclusions() {
        println!("Excluded on {}: {:?}", exclusion.attribute, exclusion.hit);
    }
    println!("Duration: {:?}", report.duration());
}
