//! Consolidation of several search result sets into variable-consistent tuples.
//!
//! The result sets are joined left to right. Before enumerating, every
//! position is indexed by the variables it shares with the positions before
//! it, so each step only visits results that agree with the bindings built
//! up so far.

use std::collections::{BTreeSet, HashMap};

use super::evaluate::{Bindings, SearchResult};

/// One terminal value per joined result set, in input order.
pub type Tuple<'doc> = Vec<&'doc str>;

struct Position<'r, 'doc> {
    /// Variables also bound by an earlier position, sorted.
    shared: Vec<char>,
    /// Projection onto `shared` → results with that projection, in input order.
    buckets: HashMap<Vec<usize>, Vec<&'r SearchResult<'doc>>>,
}

/// Natural join of `results` on their shared variables.
///
/// Returns nothing if any input is empty. When two positions share no
/// variables their combination is the full cartesian product. Output order is
/// the nested left-to-right traversal of the positions.
pub fn consolidate<'doc>(results: &[Vec<SearchResult<'doc>>]) -> Vec<Tuple<'doc>> {
    if results.iter().any(Vec::is_empty) {
        return Vec::new();
    }

    let positions = index_positions(results);
    let mut tuples = Vec::new();
    let mut current = Vec::with_capacity(positions.len());
    enumerate(&positions, &mut current, &Bindings::new(), &mut tuples);
    tuples
}

fn index_positions<'r, 'doc>(results: &'r [Vec<SearchResult<'doc>>]) -> Vec<Position<'r, 'doc>> {
    let mut seen: BTreeSet<char> = BTreeSet::new();

    results
        .iter()
        .map(|position_results| {
            // Every result of one pattern binds the same variables.
            let variables: BTreeSet<char> = position_results
                .first()
                .map(|first| first.bindings.variables().collect())
                .unwrap_or_default();
            let shared: Vec<char> = seen.intersection(&variables).copied().collect();
            seen.extend(variables);

            let mut buckets: HashMap<Vec<usize>, Vec<&SearchResult<'doc>>> = HashMap::new();
            for result in position_results {
                if let Some(key) = result.bindings.project(&shared) {
                    buckets.entry(key).or_default().push(result);
                }
            }

            Position { shared, buckets }
        })
        .collect()
}

fn enumerate<'doc>(
    positions: &[Position<'_, 'doc>],
    current: &mut Vec<&'doc str>,
    bindings: &Bindings,
    tuples: &mut Vec<Tuple<'doc>>,
) {
    let Some((position, rest)) = positions.split_first() else {
        tuples.push(current.clone());
        return;
    };

    let Some(key) = bindings.project(&position.shared) else {
        return;
    };
    let Some(bucket) = position.buckets.get(&key) else {
        return;
    };

    for result in bucket {
        current.push(result.value);
        enumerate(rest, current, &bindings.merged(&result.bindings), tuples);
        current.pop();
    }
}
