use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::thread;
use std::time::Instant;

use tracing::{debug, trace};

use crate::types::{Exclusion, Node};
use crate::{AttributeOrder, Index, MatchReport, MatchResult, Object, Value};

/// Values an object carries for each level of the index; `None` where the
/// object lacks the attribute, which the walk treats as the single wildcard
/// value.
type Levels<'o> = Vec<Option<&'o BTreeSet<Value>>>;

fn resolve<'o>(attributes: &AttributeOrder, object: &'o Object) -> Levels<'o> {
    attributes.iter().map(|name| object.values(name)).collect()
}

/// Hooks for the detailed walk. The plain walk uses `()`.
trait Observer {
    fn visit(&mut self) {}
    fn exclude(&mut self, _depth: usize, _hit: BTreeSet<Value>) {}
    fn wants_exclusions(&self) -> bool {
        false
    }
}

impl Observer for () {}

struct Recorder<'a> {
    attributes: &'a AttributeOrder,
    visited: usize,
    exclusions: Vec<Exclusion>,
}

impl Observer for Recorder<'_> {
    fn visit(&mut self) {
        self.visited += 1;
    }

    fn exclude(&mut self, depth: usize, hit: BTreeSet<Value>) {
        let attribute = self.attributes.name_at(depth).unwrap_or_default().to_owned();
        self.exclusions.push(Exclusion { attribute, hit });
    }

    fn wants_exclusions(&self) -> bool {
        true
    }
}

fn walk<'i>(
    node: &'i Node,
    levels: &[Option<&BTreeSet<Value>>],
    depth: usize,
    out: &mut BTreeSet<&'i str>,
    observer: &mut impl Observer,
) {
    observer.visit();
    let internal = match node {
        Node::Leaf(leaf) => {
            out.extend(leaf.codes().iter().map(String::as_str));
            return;
        }
        Node::Internal(internal) => internal,
    };

    let values = levels.get(depth).copied().flatten();
    let next = depth + 1;

    match values {
        Some(values) => {
            for value in values {
                if let Some(child) = internal.branch(value.as_str()) {
                    walk(child, levels, next, out, observer);
                }
            }
        }
        None => {
            if let Some(child) = internal.branch(Value::WILDCARD) {
                walk(child, levels, next, out, observer);
            }
        }
    }

    if let Some(child) = internal.wildcard() {
        walk(child, levels, next, out, observer);
    }

    for negative in internal.negatives() {
        if negative.admits(values) {
            walk(negative.child(), levels, next, out, observer);
        } else if observer.wants_exclusions() {
            let hit = match values {
                Some(values) => values.intersection(negative.excluded()).cloned().collect(),
                None => [Value::wildcard()].into_iter().collect(),
            };
            observer.exclude(depth, hit);
        }
    }
}

pub(crate) fn matches<'i>(
    root: &'i Node,
    attributes: &AttributeOrder,
    object: &Object,
) -> BTreeSet<&'i str> {
    let levels = resolve(attributes, object);
    let mut out = BTreeSet::new();
    walk(root, &levels, 0, &mut out, &mut ());
    out
}

pub(crate) fn match_detailed(
    root: &Node,
    attributes: &AttributeOrder,
    object: &Object,
) -> MatchReport {
    let start = Instant::now();
    let levels = resolve(attributes, object);
    let mut out = BTreeSet::new();
    let mut recorder = Recorder {
        attributes,
        visited: 0,
        exclusions: Vec::new(),
    };
    walk(root, &levels, 0, &mut out, &mut recorder);
    let duration = start.elapsed();

    trace!(
        object = object.id(),
        codes = out.len(),
        visited = recorder.visited,
        "matched object"
    );

    MatchReport::new(
        object.id().to_owned(),
        out.into_iter().map(str::to_owned).collect(),
        recorder.visited,
        recorder.exclusions,
        duration,
    )
}

fn owned_codes(index: &Index, object: &Object) -> BTreeSet<String> {
    index
        .matches(object)
        .into_iter()
        .map(str::to_owned)
        .collect()
}

pub(crate) fn match_all<'o>(
    index: &Index,
    objects: impl IntoIterator<Item = &'o Object>,
) -> MatchResult {
    let objects = objects.into_iter();
    let mut result = MatchResult::with_capacity(objects.size_hint().0);
    for object in objects {
        result.insert(object.id().to_owned(), owned_codes(index, object));
    }
    debug!(objects = result.len(), "matched batch");
    result
}

pub(crate) fn match_all_parallel(
    index: &Index,
    objects: &[Object],
    threads: NonZeroUsize,
) -> MatchResult {
    if objects.is_empty() {
        return MatchResult::default();
    }
    let chunk_size = objects.len().div_ceil(threads.get());

    // Chunks are merged in input order so duplicate ids resolve exactly as in
    // the sequential driver.
    let partials: Vec<Vec<(String, BTreeSet<String>)>> = thread::scope(|scope| {
        let handles: Vec<_> = objects
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|object| (object.id().to_owned(), owned_codes(index, object)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    });

    let mut result = MatchResult::with_capacity(objects.len());
    for (id, codes) in partials.into_iter().flatten() {
        result.insert(id, codes);
    }
    debug!(
        objects = result.len(),
        workers = objects.len().div_ceil(chunk_size),
        "matched batch in parallel"
    );
    result
}
