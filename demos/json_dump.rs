use ruletree::json::{index_from_str, objects_from_str};

const RULES: &str = r#"{
    "attributes": ["country", "brand"],
    "rules": [
        {"code": "store_1", "attributes": {"country": ["US"], "brand": ["Nike"]}},
        {"code": "store_2", "attributes": {"country": ["US"]}},
        {"code": "store_3", "attributes": {"brand": {"not_in": ["Adidas", "Puma"]}}},
        {"code": "broken", "attributes": {"brand": {"between": ["A", "M"]}}}
    ]
}"#;

const OFFERS: &str = r#"[
    {"ID": "offer_123", "attributes": {"country": ["US"], "brand": ["Nike"]}},
    {"ID": "offer_456", "attributes": {"country": ["UK"], "brand": ["Reebok"]}}
]"#;

fn main() {
    let index = index_from_str(RULES).expect("failed to build index");
    for diagnostic in index.diagnostics() {
        eprintln!("warning: {diagnostic}");
    }

    println!("{}", index.to_json_pretty().expect("failed to render index"));

    let offers = objects_from_str(OFFERS).expect("failed to decode offers");
    println!("{}", index.match_all(&offers));
}
