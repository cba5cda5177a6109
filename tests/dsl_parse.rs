use ruletree::{none_of, one_of, Index, Object, RuletreeError, Selector, UnknownAttributePolicy};

const STORES: &str = r#"
attributes country, brand

# store routing
rule store_1: country in [US], brand in [Nike]
rule store_2: country in [US]
rule store_3: brand not in [Adidas, Puma]
"#;

#[test]
fn dsl_store_routing() {
    let index = Index::from_dsl(STORES).unwrap();
    assert_eq!(index.rules().len(), 3);
    assert_eq!(index.attributes().names(), ["country", "brand"]);

    let offer = Object::new("offer_123").set("country", "US").set("brand", "Nike");
    let codes: Vec<&str> = index.matches(&offer).into_iter().collect();
    assert_eq!(codes, ["store_1", "store_2", "store_3"]);

    let offer = Object::new("offer_456").set("country", "UK").set("brand", "Reebok");
    let codes: Vec<&str> = index.matches(&offer).into_iter().collect();
    assert_eq!(codes, ["store_3"]);
}

#[test]
fn dsl_parses_every_selector_form() {
    let parsed = ruletree::parse::parse(
        r#"
attributes country, brand, channel
rule r: country in [US, CA], brand not in ["Nike Air"], channel any
"#,
    )
    .unwrap();

    let rule = &parsed.rules[0];
    assert_eq!(rule.selector("country"), Some(&one_of(["US", "CA"])));
    assert_eq!(rule.selector("brand"), Some(&none_of(["Nike Air"])));
    assert_eq!(rule.selector("channel"), Some(&Selector::Any));
}

#[test]
fn dsl_rule_without_clauses_is_unconstrained() {
    let index = Index::from_dsl("attributes country\nrule catch_all").unwrap();
    assert!(index.rules()[0].selectors.is_empty());
    assert!(index.matches(&Object::new("o")).contains("catch_all"));
}

#[test]
fn dsl_values_may_be_quoted_or_bare() {
    let parsed = ruletree::parse::parse(
        r#"attributes size
rule r: size in [42, "x-large", 9.5, "say \"hi\""]"#,
    )
    .unwrap();
    assert_eq!(
        parsed.rules[0].selector("size"),
        Some(&one_of(["42", "x-large", "9.5", "say \"hi\""]))
    );
}

#[test]
fn dsl_empty_list_is_accepted() {
    let index = Index::from_dsl("attributes country\nrule r: country in []").unwrap();
    assert!(index.matches(&Object::new("o").set("country", "UK")).contains("r"));
}

#[test]
fn dsl_display_round_trip() {
    let index = Index::from_dsl(STORES).unwrap();
    let mut source = String::from("attributes country, brand\n");
    for rule in index.rules() {
        source.push_str(&rule.to_string());
        source.push('\n');
    }
    let again = Index::from_dsl(&source).unwrap();
    assert_eq!(again.rules(), index.rules());
}

#[test]
fn dsl_unknown_attribute_goes_through_policy() {
    let source = "attributes country\nrule r: colour in [red]";

    let lenient = Index::from_dsl(source).unwrap();
    assert_eq!(lenient.rules().len(), 1);
    assert_eq!(lenient.diagnostics().len(), 1);

    let strict = Index::from_dsl_with_config(
        source,
        ruletree::BuildConfig::default().unknown_attributes(UnknownAttributePolicy::Reject),
    )
    .unwrap();
    assert!(strict.rules().is_empty());
}

#[test]
fn dsl_reserved_wildcard_is_a_diagnostic_not_a_parse_error() {
    let index = Index::from_dsl(r#"attributes country
rule r: country in ["*"]"#)
    .unwrap();
    assert!(index.rules().is_empty());
    assert!(index.diagnostics()[0].is_skipped());
}

#[test]
fn dsl_missing_attributes_line() {
    let result = Index::from_dsl("rule r: country in [US]");
    assert!(matches!(result, Err(RuletreeError::Parse(_))));
}

#[test]
fn dsl_unclosed_list() {
    let err = Index::from_dsl("attributes country\nrule r: country in [US").unwrap_err();
    assert!(matches!(err, RuletreeError::Parse(_)));
    assert!(err.to_string().starts_with("rule DSL parse error"));
}

#[test]
fn dsl_unknown_selector_keyword() {
    let result = Index::from_dsl("attributes country\nrule r: country is [US]");
    assert!(matches!(result, Err(RuletreeError::Parse(_))));
}

#[test]
fn dsl_repeated_attribute_in_rule_is_rejected() {
    let result = Index::from_dsl("attributes brand\nrule r: brand in [Nike], brand not in [Puma]");
    assert!(matches!(result, Err(RuletreeError::Parse(_))));
}

#[test]
fn dsl_keywords_must_be_followed_by_whitespace() {
    let glued = [
        "attributescountry\nrulefoo: country in [US]",
        "attributes country\nrulefoo: country in [US]",
        "attributes country\nrule r: country notin [US]",
    ];
    for source in glued {
        assert!(
            matches!(Index::from_dsl(source), Err(RuletreeError::Parse(_))),
            "{source:?} should not parse"
        );
    }
    assert!(Index::from_dsl("attributes\tcountry\nrule\n  foo: country not\tin [US]").is_ok());
}

#[test]
fn dsl_duplicate_attribute_is_a_build_error() {
    let result = Index::from_dsl("attributes country, brand, country");
    assert!(matches!(result, Err(RuletreeError::Build(_))));
}

#[test]
fn dsl_from_file() {
    let dir = std::env::temp_dir().join("ruletree_dsl_from_file");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("stores.rules");
    std::fs::write(&path, STORES).unwrap();

    let index = Index::from_file(&path).unwrap();
    assert_eq!(index.rules().len(), 3);

    let missing = Index::from_file(dir.join("absent.rules"));
    assert!(matches!(missing, Err(RuletreeError::Io(_))));
}
