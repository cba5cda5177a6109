use ruletree::{
    Disposition, Index, IndexBuilder, Node, Object, Rule, RuleError, UnknownAttributePolicy,
};

fn stores() -> Index {
    IndexBuilder::new(["country", "brand"])
        .rule("store_1", |r| r.one_of("country", ["US"]).one_of("brand", ["Nike"]))
        .rule("store_2", |r| r.one_of("country", ["US"]))
        .rule("store_3", |r| r.none_of("brand", ["Adidas", "Puma"]))
        .build()
        .unwrap()
}

fn codes(index: &Index, object: &Object) -> Vec<String> {
    index.matches(object).into_iter().map(str::to_owned).collect()
}

// ---------------------------------------------------------------------------
// Store routing
// ---------------------------------------------------------------------------

#[test]
fn nike_in_us_reaches_every_store() {
    let offer = Object::new("offer_123").set("country", "US").set("brand", "Nike");
    assert_eq!(codes(&stores(), &offer), ["store_1", "store_2", "store_3"]);
}

#[test]
fn uk_reebok_reaches_only_the_exclusion_store() {
    let offer = Object::new("offer_456").set("country", "UK").set("brand", "Reebok");
    assert_eq!(codes(&stores(), &offer), ["store_3"]);
}

#[test]
fn excluded_brand_keeps_country_only_store() {
    let offer = Object::new("offer_789").set("country", "US").set("brand", "Adidas");
    assert_eq!(codes(&stores(), &offer), ["store_2"]);
}

#[test]
fn missing_country_matches_only_country_free_rules() {
    let offer = Object::new("offer_000").set("brand", "Nike");
    assert_eq!(codes(&stores(), &offer), ["store_3"]);
}

#[test]
fn identical_rules_share_a_leaf() {
    let index = IndexBuilder::new(["country", "brand"])
        .rule("twin_a", |r| r.one_of("country", ["US"]).one_of("brand", ["Nike"]))
        .rule("twin_b", |r| r.one_of("country", ["US"]).one_of("brand", ["Nike"]))
        .build()
        .unwrap();

    let Node::Internal(root) = index.root() else {
        panic!("root should branch on country");
    };
    let Some(Node::Internal(us)) = root.branch("US") else {
        panic!("expected a US branch");
    };
    let leaf = us.branch("Nike").and_then(Node::codes).unwrap();
    assert_eq!(leaf.len(), 2);

    let offer = Object::new("o").set("country", "US").set("brand", "Nike");
    assert_eq!(codes(&index, &offer), ["twin_a", "twin_b"]);
}

// ---------------------------------------------------------------------------
// Degenerate indexes
// ---------------------------------------------------------------------------

#[test]
fn empty_index_matches_nothing() {
    let index = IndexBuilder::new(["country"]).build().unwrap();
    assert!(index.matches(&Object::new("o").set("country", "US")).is_empty());
    assert_eq!(index.node_count(), 1);
}

#[test]
fn no_attributes_puts_every_rule_in_the_root_leaf() {
    let index = IndexBuilder::new(Vec::<String>::new())
        .rule("everything", |r| r)
        .rule("also", |r| r)
        .build()
        .unwrap();
    assert!(index.root().is_leaf());
    assert_eq!(codes(&index, &Object::new("o")), ["also", "everything"]);
}

#[test]
fn empty_object_takes_wildcard_paths() {
    let index = IndexBuilder::new(["country", "brand"])
        .rule("open", |r| r)
        .rule("us", |r| r.one_of("country", ["US"]))
        .rule("not_puma", |r| r.none_of("brand", ["Puma"]))
        .build()
        .unwrap();
    assert_eq!(codes(&index, &Object::new("bare")), ["not_puma", "open"]);
}

#[test]
fn empty_value_sets_behave_as_wildcards() {
    let index = IndexBuilder::new(["country"])
        .add(Rule::new("empty_in").one_of("country", Vec::<&str>::new()))
        .add(Rule::new("empty_not_in").none_of("country", Vec::<&str>::new()))
        .build()
        .unwrap();
    let Node::Internal(root) = index.root() else {
        panic!("root should be internal");
    };
    assert!(root.branches().is_empty());
    assert!(root.negatives().is_empty());
    assert_eq!(
        codes(&index, &Object::new("o").set("country", "UK")),
        ["empty_in", "empty_not_in"]
    );
}

#[test]
fn deep_attribute_order() {
    let names: Vec<String> = (0..12).map(|i| format!("a{i}")).collect();
    let index = IndexBuilder::new(names.clone())
        .rule("deep", |r| r.one_of("a11", ["x"]))
        .build()
        .unwrap();
    // root, eleven wildcard children, and the leaf under x
    assert_eq!(index.node_count(), 13);

    let mut object = Object::new("o");
    for name in &names {
        object = object.set(name, "x");
    }
    assert_eq!(codes(&index, &object), ["deep"]);
}

#[test]
fn numeric_and_boolean_values_compare_as_text() {
    let index = IndexBuilder::new(["size", "sale"])
        .rule("size_42_on_sale", |r| r.one_of("size", [42_i64]).one_of("sale", [true]))
        .build()
        .unwrap();
    let offer = Object::new("o").set("size", "42").set("sale", "true");
    assert_eq!(codes(&index, &offer), ["size_42_on_sale"]);
}

// ---------------------------------------------------------------------------
// Diagnostics
// ---------------------------------------------------------------------------

#[test]
fn unknown_attribute_ignored_by_default() {
    let index = IndexBuilder::new(["country"])
        .rule("us_red", |r| r.one_of("country", ["US"]).one_of("colour", ["red"]))
        .build()
        .unwrap();

    assert_eq!(index.rules().len(), 1);
    let diagnostic = &index.diagnostics()[0];
    assert_eq!(diagnostic.disposition, Disposition::Applied);
    assert_eq!(
        diagnostic.error,
        RuleError::UnknownAttribute {
            code: "us_red".to_owned(),
            attribute: "colour".to_owned(),
        }
    );
    assert_eq!(
        codes(&index, &Object::new("o").set("country", "US").set("colour", "blue")),
        ["us_red"]
    );
}

#[test]
fn unknown_attribute_rejected_on_request() {
    let index = IndexBuilder::new(["country"])
        .unknown_attributes(UnknownAttributePolicy::Reject)
        .rule("us_red", |r| r.one_of("country", ["US"]).one_of("colour", ["red"]))
        .rule("us", |r| r.one_of("country", ["US"]))
        .build()
        .unwrap();

    assert_eq!(index.rules().len(), 1);
    assert!(index.diagnostics()[0].is_skipped());
    assert_eq!(codes(&index, &Object::new("o").set("country", "US")), ["us"]);
}

#[test]
fn reserved_wildcard_value_skips_rule() {
    let index = IndexBuilder::new(["country"])
        .rule("star", |r| r.one_of("country", ["*"]))
        .rule("fine", |r| r.one_of("country", ["US"]))
        .build()
        .unwrap();

    assert_eq!(index.rules().len(), 1);
    let diagnostic = &index.diagnostics()[0];
    assert!(diagnostic.is_skipped());
    assert!(matches!(
        &diagnostic.error,
        RuleError::MalformedRule { code, .. } if code == "star"
    ));
    assert!(diagnostic.to_string().ends_with("(rule skipped)"));
}

#[test]
fn empty_code_skips_rule() {
    let index = IndexBuilder::new(["country"]).add(Rule::new("")).build().unwrap();
    assert!(index.rules().is_empty());
    assert_eq!(index.diagnostics().len(), 1);
}

#[test]
fn decode_failures_are_reported_in_order() {
    let index = IndexBuilder::new(["country"])
        .records([
            Err(RuleError::MalformedRule {
                code: "first".to_owned(),
                reason: "bad selector".to_owned(),
            }),
            Ok(Rule::new("ok")),
            Err(RuleError::MalformedRule {
                code: "third".to_owned(),
                reason: "bad selector".to_owned(),
            }),
        ])
        .build()
        .unwrap();

    let codes: Vec<&str> = index.diagnostics().iter().map(|d| d.error.code()).collect();
    assert_eq!(codes, ["first", "third"]);
    assert_eq!(index.rules().len(), 1);
}

// ---------------------------------------------------------------------------
// Batch matching
// ---------------------------------------------------------------------------

#[test]
fn batch_reports_objects_without_matches() {
    let index = stores();
    let objects = [
        Object::new("hit").set("country", "US"),
        Object::new("miss").set("brand", "Puma"),
    ];
    let result = index.match_all(&objects);
    assert_eq!(result.len(), 2);
    assert!(result.get("miss").unwrap().is_empty());
    assert_eq!(result.to_string(), "hit: [store_2, store_3]\nmiss: []");
}
