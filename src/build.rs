use tracing::{debug, warn};

use crate::types::{Internal, NegativeBranch, Node};
use crate::{
    AttributeOrder, BuildConfig, Diagnostic, Index, Rule, RuleError, Selector,
    UnknownAttributePolicy,
};

pub(crate) fn build(
    attributes: AttributeOrder,
    records: Vec<Result<Rule, RuleError>>,
    config: BuildConfig,
) -> Index {
    let levels = attributes.len();
    let mut root = Node::for_depth(0, levels);
    let mut rules = Vec::with_capacity(records.len());
    let mut diagnostics = Vec::new();

    for record in records {
        let rule = match record {
            Ok(rule) => rule,
            Err(error) => {
                diagnostics.push(Diagnostic::skipped(error));
                continue;
            }
        };

        if let Err(error) = check_well_formed(&rule) {
            diagnostics.push(Diagnostic::skipped(error));
            continue;
        }

        let unknown = unknown_attributes(&rule, &attributes);
        if !unknown.is_empty() {
            match config.unknown_attributes {
                UnknownAttributePolicy::Reject => {
                    diagnostics.extend(unknown.into_iter().map(Diagnostic::skipped));
                    continue;
                }
                UnknownAttributePolicy::Ignore => {
                    diagnostics.extend(unknown.into_iter().map(Diagnostic::applied));
                }
            }
        }

        let selectors = level_selectors(&rule, &attributes);
        insert(&mut root, &selectors, &rule.code, 0, levels);
        rules.push(rule);
    }

    for diagnostic in &diagnostics {
        warn!(
            code = diagnostic.error.code(),
            skipped = diagnostic.is_skipped(),
            "{}",
            diagnostic.error
        );
    }

    let index = Index {
        attributes,
        root,
        rules,
        diagnostics,
        config,
    };

    debug!(
        rules = index.rules.len(),
        attributes = index.attributes.len(),
        nodes = index.node_count(),
        diagnostics = index.diagnostics.len(),
        "built rule index"
    );

    index
}

fn check_well_formed(rule: &Rule) -> Result<(), RuleError> {
    if rule.code.is_empty() {
        return Err(RuleError::MalformedRule {
            code: rule.code.clone(),
            reason: "rule code is empty".to_owned(),
        });
    }
    for (attribute, selector) in &rule.selectors {
        if selector.values().any(|v| v.is_wildcard()) {
            return Err(RuleError::MalformedRule {
                code: rule.code.clone(),
                reason: format!(
                    "selector on '{attribute}' uses the reserved wildcard value '*'"
                ),
            });
        }
    }
    Ok(())
}

fn unknown_attributes(rule: &Rule, attributes: &AttributeOrder) -> Vec<RuleError> {
    rule.selectors
        .keys()
        .filter(|name| !attributes.contains(name))
        .map(|name| RuleError::UnknownAttribute {
            code: rule.code.clone(),
            attribute: name.clone(),
        })
        .collect()
}

/// The rule's selector for each level of the index, `None` where the rule
/// leaves the attribute unconstrained.
fn level_selectors<'r>(rule: &'r Rule, attributes: &AttributeOrder) -> Vec<Option<&'r Selector>> {
    attributes
        .iter()
        .map(|name| rule.selector(name).filter(|s| !s.is_wildcard()))
        .collect()
}

fn insert(node: &mut Node, selectors: &[Option<&Selector>], code: &str, depth: usize, levels: usize) {
    let internal: &mut Internal = match node {
        Node::Leaf(leaf) => {
            leaf.codes.insert(code.to_owned());
            return;
        }
        Node::Internal(internal) => internal,
    };

    let next = depth + 1;
    match selectors.get(depth).copied().flatten() {
        None | Some(Selector::Any) => {
            let child = internal
                .wildcard
                .get_or_insert_with(|| Box::new(Node::for_depth(next, levels)));
            insert(child, selectors, code, next, levels);
        }
        Some(Selector::Positive(values)) => {
            for value in values {
                let child = internal
                    .branches
                    .entry(value.clone())
                    .or_insert_with(|| Node::for_depth(next, levels));
                insert(child, selectors, code, next, levels);
            }
        }
        Some(Selector::Negative(values)) => {
            let mut child = Node::for_depth(next, levels);
            insert(&mut child, selectors, code, next, levels);
            internal.negatives.push(NegativeBranch {
                excluded: values.clone(),
                child,
            });
        }
    }
}
