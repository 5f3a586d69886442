//! Pattern evaluator: runtime evaluation of a compiled path against a JSON tree.
//!
//! Given a `PathPattern` and a document, collect every string reachable
//! through the path together with the array indices its variables were bound
//! to on the way down.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::warn;

use super::pattern::{PathPattern, Segment};

/// Variable name → array index assignments for one traversal branch.
///
/// Kept ordered by variable name so projections onto a variable list are
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings(BTreeMap<char, usize>);

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, variable: char) -> Option<usize> {
        self.0.get(&variable).copied()
    }

    pub fn contains(&self, variable: char) -> bool {
        self.0.contains_key(&variable)
    }

    pub fn variables(&self) -> impl Iterator<Item = char> + '_ {
        self.0.keys().copied()
    }

    /// A copy of these bindings extended with `variable = index`.
    pub fn with(&self, variable: char, index: usize) -> Self {
        let mut extended = self.0.clone();
        extended.insert(variable, index);
        Self(extended)
    }

    /// A copy of these bindings extended with every assignment in `other`.
    /// Variables present in both must already agree.
    pub fn merged(&self, other: &Bindings) -> Self {
        let mut merged = self.0.clone();
        for (&variable, &index) in &other.0 {
            debug_assert!(
                merged.get(&variable).is_none_or(|&bound| bound == index),
                "conflicting bindings for `{variable}`"
            );
            merged.insert(variable, index);
        }
        Self(merged)
    }

    /// The indices bound to `variables`, in that order. `None` if any of
    /// them is unbound.
    pub fn project(&self, variables: &[char]) -> Option<Vec<usize>> {
        variables.iter().map(|&v| self.get(v)).collect()
    }
}

impl FromIterator<(char, usize)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (char, usize)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// What to do with a `null` found where a string was expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullPolicy {
    /// Drop the branch and log a warning.
    #[default]
    Warn,
    /// Drop the branch without logging.
    Ignore,
}

/// One complete traversal of a pattern down to a string leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult<'doc> {
    pub value: &'doc str,
    pub bindings: Bindings,
}

/// Evaluate `pattern` against `document`.
///
/// Results come out in left-to-right array order. Branches that hit a node
/// of the wrong shape contribute nothing.
pub fn evaluate<'doc>(
    pattern: &PathPattern,
    document: &'doc Value,
    null_policy: NullPolicy,
) -> Vec<SearchResult<'doc>> {
    let mut results = Vec::new();
    search(
        pattern,
        pattern.segments(),
        document,
        Bindings::new(),
        null_policy,
        &mut results,
    );
    results
}

fn search<'doc>(
    pattern: &PathPattern,
    path: &[Segment],
    node: &'doc Value,
    bindings: Bindings,
    null_policy: NullPolicy,
    results: &mut Vec<SearchResult<'doc>>,
) {
    let Some((segment, rest)) = path.split_first() else {
        match node {
            Value::String(value) => results.push(SearchResult { value, bindings }),
            Value::Null if null_policy == NullPolicy::Ignore => {}
            other => warn!(%pattern, "ignoring value which is not a string: {other}"),
        }
        return;
    };

    match segment {
        Segment::Variable(variable) => {
            debug_assert!(
                !bindings.contains(*variable),
                "variable `{variable}` rebound in `{pattern}`"
            );
            if let Value::Array(items) = node {
                for (index, item) in items.iter().enumerate() {
                    search(
                        pattern,
                        rest,
                        item,
                        bindings.with(*variable, index),
                        null_policy,
                        results,
                    );
                }
            }
        }
        Segment::Literal(key) => {
            if let Some(child) = node.as_object().and_then(|map| map.get(key)) {
                search(pattern, rest, child, bindings, null_policy, results);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn eval<'a>(pattern: &str, document: &'a Value) -> Vec<SearchResult<'a>> {
        evaluate(
            &PathPattern::parse(pattern).unwrap(),
            document,
            NullPolicy::Warn,
        )
    }

    fn bound(pairs: &[(char, usize)]) -> Bindings {
        pairs.iter().copied().collect()
    }

    #[test]
    fn literal_path_to_string() {
        let doc = json!({"lang_code": "en", "word": "cat"});
        let results = eval("word", &doc);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].value, "cat");
        assert_eq!(results[0].bindings, Bindings::new());
    }

    #[test]
    fn missing_key_yields_nothing() {
        let doc = json!({"word": "cat"});
        assert!(eval("lang_code", &doc).is_empty());
        assert!(eval("word/inner", &doc).is_empty());
    }

    #[test]
    fn variable_binds_every_index() {
        let doc = json!({"sounds": [{"ipa": "/kæt/"}, {"rhymes": "-æt"}, {"ipa": "[kʰæt]"}]});
        let results = eval("sounds/N/ipa", &doc);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].value, "/kæt/");
        assert_eq!(results[0].bindings, bound(&[('N', 0)]));
        assert_eq!(results[1].value, "[kʰæt]");
        assert_eq!(results[1].bindings, bound(&[('N', 2)]));
    }

    #[test]
    fn nested_variables() {
        let doc = json!({"senses": [
            {"examples": [{"text": "a"}, {"text": "b"}]},
            {"examples": [{"text": "c"}]},
        ]});
        let results = eval("senses/N/examples/M/text", &doc);
        let flat: Vec<_> = results
            .iter()
            .map(|r| (r.value, r.bindings.get('N'), r.bindings.get('M')))
            .collect();
        assert_eq!(
            flat,
            vec![
                ("a", Some(0), Some(0)),
                ("b", Some(0), Some(1)),
                ("c", Some(1), Some(0)),
            ]
        );
    }

    #[test]
    fn variable_over_non_array_yields_nothing() {
        let doc = json!({"forms": {"form": "cats"}});
        assert!(eval("forms/N/form", &doc).is_empty());
    }

    #[test]
    fn literal_over_array_yields_nothing() {
        let doc = json!({"forms": [{"form": "cats"}]});
        assert!(eval("forms/form", &doc).is_empty());
    }

    #[test]
    fn non_string_terminal_is_dropped() {
        let doc = json!({"word": 42, "tags": ["a", 1, null, "b"]});
        assert!(eval("word", &doc).is_empty());
        let results = eval("tags/T", &doc);
        let values: Vec<_> = results.iter().map(|r| (r.value, r.bindings.get('T'))).collect();
        assert_eq!(values, vec![("a", Some(0)), ("b", Some(3))]);
    }

    #[test]
    fn null_is_dropped_under_either_policy() {
        let doc = json!({"lang_code": null});
        let pattern = PathPattern::parse("lang_code").unwrap();
        assert!(evaluate(&pattern, &doc, NullPolicy::Ignore).is_empty());
        assert!(evaluate(&pattern, &doc, NullPolicy::Warn).is_empty());
    }

    /// Run `f` with a subscriber that records formatted events, and return
    /// the number of warnings it saw.
    fn count_warnings(f: impl FnOnce()) -> usize {
        use std::io;
        use std::sync::{Arc, Mutex};

        #[derive(Clone)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl io::Write for Captured {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let captured = Captured(Arc::new(Mutex::new(Vec::new())));
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        output
            .lines()
            .filter(|line| line.contains("WARN") && line.contains("not a string"))
            .count()
    }

    #[test]
    fn non_string_terminal_warns() {
        let doc = json!({"word": 42});
        let warnings = count_warnings(|| {
            assert!(eval("word", &doc).is_empty());
        });
        assert_eq!(warnings, 1);
    }

    #[test]
    fn null_warns_only_under_warn_policy() {
        let doc = json!({"lang_code": null});
        let pattern = PathPattern::parse("lang_code").unwrap();
        let warned = count_warnings(|| {
            evaluate(&pattern, &doc, NullPolicy::Warn);
        });
        let ignored = count_warnings(|| {
            evaluate(&pattern, &doc, NullPolicy::Ignore);
        });
        assert_eq!(warned, 1);
        assert_eq!(ignored, 0);
    }

    #[test]
    fn strings_do_not_warn() {
        let doc = json!({"sounds": [{"ipa": "/kæt/"}, {"audio": "cat.ogg"}]});
        let warnings = count_warnings(|| {
            assert_eq!(eval("sounds/N/ipa", &doc).len(), 1);
        });
        assert_eq!(warnings, 0);
    }

    #[test]
    fn empty_pattern_addresses_root() {
        let doc = json!("root");
        let results = eval("", &doc);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].value, "root");

        let doc = json!({"word": "cat"});
        assert!(eval("", &doc).is_empty());
    }

    #[test]
    fn sibling_branches_do_not_share_bindings() {
        let doc = json!({"a": [["x", "y"], ["z"]]});
        let results = eval("a/N/M", &doc);
        assert_eq!(results.len(), 3);
        assert_eq!(results[2].bindings, bound(&[('N', 1), ('M', 0)]));
    }

    #[test]
    fn bindings_with_copies() {
        let base = bound(&[('N', 1)]);
        let extended = base.with('M', 2);
        assert_eq!(base.variables().collect::<Vec<_>>(), vec!['N']);
        assert_eq!(extended.variables().collect::<Vec<_>>(), vec!['M', 'N']);
        assert_eq!(extended.project(&['M', 'N']), Some(vec![2, 1]));
        assert_eq!(base.project(&['M']), None);
    }

    #[test]
    fn bindings_merge() {
        let left = bound(&[('A', 0), ('N', 1)]);
        let right = bound(&[('N', 1), ('B', 4)]);
        let merged = left.merged(&right);
        assert_eq!(merged.variables().collect::<Vec<_>>(), vec!['A', 'B', 'N']);
        assert_eq!(merged.get('B'), Some(4));
    }

    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        fn leaf_strategy() -> impl Strategy<Value = Value> {
            prop_oneof![
                "[a-z]{0,6}".prop_map(Value::from),
                any::<i64>().prop_map(Value::from),
                any::<bool>().prop_map(Value::from),
                Just(Value::Null),
            ]
        }

        proptest! {
            #[test]
            fn variable_yields_one_result_per_string(items in prop::collection::vec(leaf_strategy(), 0..20)) {
                let doc = Value::Array(items.clone());
                let results = eval("V", &doc);
                let expected: Vec<(usize, &str)> = items
                    .iter()
                    .enumerate()
                    .filter_map(|(i, item)| item.as_str().map(|s| (i, s)))
                    .collect();
                let actual: Vec<(usize, &str)> = results
                    .iter()
                    .map(|r| (r.bindings.get('V').unwrap(), r.value))
                    .collect();
                prop_assert_eq!(actual, expected);
            }

            #[test]
            fn literal_pattern_yields_at_most_one(
                keys in prop::collection::vec("[a-c]", 1..4),
                leaf in leaf_strategy(),
            ) {
                let mut doc = leaf;
                for key in keys.iter().rev() {
                    let mut map = serde_json::Map::new();
                    map.insert(key.clone(), doc);
                    doc = Value::Object(map);
                }
                let pattern = keys.join("/");
                prop_assert!(eval(&pattern, &doc).len() <= 1);
            }
        }
    }
}
