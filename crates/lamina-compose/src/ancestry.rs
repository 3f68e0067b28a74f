//! Prerequisite linearization.
//!
//! Merge order is the whole of override precedence: a class's ancestors
//! are expanded depth-first in declaration order, each name preceded by
//! its own ancestors, then deduplicated keeping the first occurrence.
//! Whatever survives last in that order wins member collisions — the
//! rightmost declared prerequisite, and its ancestors, beat everything
//! declared before them.

/// Expand `names` into the full ancestor listing, not yet deduplicated:
/// for each name in input order, the recursively expanded ancestors of
/// that name followed by the name itself.
///
/// `lookup` maps a ready name to its declared prerequisite list. Callers
/// only linearize names the store has confirmed ready, so `lookup` is
/// total over everything reachable here. Cyclic prerequisite graphs are
/// unsupported and recurse without bound.
pub fn linearize<F>(lookup: &F, names: &[String]) -> Vec<String>
where
    F: Fn(&str) -> Vec<String>,
{
    let mut ordered = Vec::new();
    for name in names {
        ordered.extend(linearize(lookup, &lookup(name)));
        ordered.push(name.clone());
    }
    ordered
}

/// Keep the first occurrence of every name, preserving encounter order.
pub fn dedupe_keep_first(names: Vec<String>) -> Vec<String> {
    let mut uniques: Vec<String> = Vec::new();
    for name in names {
        if !uniques.contains(&name) {
            uniques.push(name);
        }
    }
    uniques
}
