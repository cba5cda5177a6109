use ruletree::{Index, IndexBuilder, Object, Rule, Selector};
use proptest::prelude::*;

// --- Fixed attribute schema ---
// country : one of {"US", "CA", "UK", "DE"}
// brand   : one of {"Nike", "Adidas", "Puma", "Reebok"}
// channel : one of {"web", "store", "app"}

pub const ATTRIBUTES: &[&str] = &["country", "brand", "channel"];

const COUNTRIES: &[&str] = &["US", "CA", "UK", "DE"];
const BRANDS: &[&str] = &["Nike", "Adidas", "Puma", "Reebok"];
const CHANNELS: &[&str] = &["web", "store", "app"];

fn pool(attribute: &str) -> &'static [&'static str] {
    match attribute {
        "country" => COUNTRIES,
        "brand" => BRANDS,
        _ => CHANNELS,
    }
}

fn arb_values(attribute: &str) -> impl Strategy<Value = Vec<&'static str>> {
    prop::sample::subsequence(pool(attribute), 0..=2)
}

/// A selector over the attribute's value pool. Empty value sets are allowed
/// and behave like a wildcard.
fn arb_selector(attribute: &'static str) -> impl Strategy<Value = Option<Selector>> {
    prop_oneof![
        3 => Just(None),
        1 => Just(Some(Selector::Any)),
        4 => arb_values(attribute).prop_map(|v| Some(ruletree::one_of(v))),
        2 => arb_values(attribute).prop_map(|v| Some(ruletree::none_of(v))),
    ]
}

fn arb_rule(code: String) -> impl Strategy<Value = Rule> {
    (
        arb_selector("country"),
        arb_selector("brand"),
        arb_selector("channel"),
    )
        .prop_map(move |(country, brand, channel)| {
            let mut rule = Rule::new(code.clone());
            for (name, selector) in [("country", country), ("brand", brand), ("channel", channel)] {
                if let Some(selector) = selector {
                    rule = rule.with(name, selector);
                }
            }
            rule
        })
}

/// Up to 12 rules. Codes come from a small pool so repeated codes occur.
pub fn arb_rules() -> impl Strategy<Value = Vec<Rule>> {
    prop::collection::vec(0_usize..8, 0..12).prop_flat_map(|codes| {
        codes
            .into_iter()
            .map(|c| arb_rule(format!("r{c}")))
            .collect::<Vec<_>>()
    })
}

/// An object over the schema. Attributes may be missing or multi-valued.
pub fn arb_object() -> impl Strategy<Value = Object> {
    (
        arb_values("country"),
        arb_values("brand"),
        arb_values("channel"),
        0_u32..1000,
    )
        .prop_map(|(country, brand, channel, id)| {
            Object::new(format!("o{id}"))
                .set_all("country", country)
                .set_all("brand", brand)
                .set_all("channel", channel)
        })
}

pub fn arb_objects() -> impl Strategy<Value = Vec<Object>> {
    prop::collection::vec(arb_object(), 0..40)
}

pub fn build(rules: &[Rule]) -> Index {
    IndexBuilder::new(ATTRIBUTES.iter().copied())
        .rules(rules.iter().cloned())
        .build()
        .unwrap()
}

/// Render rules as DSL source, the inverse of what the parser accepts.
pub fn to_dsl(rules: &[Rule]) -> String {
    let mut out = format!("attributes {}\n", ATTRIBUTES.join(", "));
    for rule in rules {
        out.push_str(&rule.to_string());
        out.push('\n');
    }
    out
}
