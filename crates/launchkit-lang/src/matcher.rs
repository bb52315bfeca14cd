//! Intent matcher
//!
//! Structural matching of normalized tokens against the grammar table.
//! Literal tokens must appear in declared order but need not be
//! contiguous; slots consume the token(s) at their position and coerce to
//! their declared type. Candidates are ranked by confidence (literals
//! matched + slots bound) with declaration order breaking ties.

use std::collections::BTreeMap;

use launchkit_core::{ActionVerb, ResourceKind};
use tracing::trace;

use crate::grammar::{GrammarTable, PatternElement, SlotKind, SlotSpec};

/// A typed value bound to a slot
#[derive(Debug, Clone, PartialEq)]
pub enum SlotValue {
    /// Whole number (type-coerced only; range checks happen later)
    Int(i64),
    /// Single name token
    Ident(String),
    /// Free text from the remaining tokens
    Text(String),
}

impl SlotValue {
    /// The value as it appeared in the input
    pub fn raw(&self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Ident(s) | Self::Text(s) => s.clone(),
        }
    }
}

impl std::fmt::Display for SlotValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw())
    }
}

/// Bound slots for one candidate, keyed by slot name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotValues(BTreeMap<String, SlotValue>);

impl SlotValues {
    /// Look up a slot by name
    pub fn get(&self, name: &str) -> Option<&SlotValue> {
        self.0.get(name)
    }

    /// Look up an integer slot
    pub fn get_int(&self, name: &str) -> Option<i64> {
        match self.0.get(name) {
            Some(SlotValue::Int(n)) => Some(*n),
            _ => None,
        }
    }

    /// Look up an identifier or text slot
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(SlotValue::Ident(s)) | Some(SlotValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Number of bound slots
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no slots are bound
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Insert a binding (used by tests and the shell's re-resolution)
    pub fn insert(&mut self, name: impl Into<String>, value: SlotValue) {
        self.0.insert(name.into(), value);
    }

    /// Iterate bindings in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &SlotValue)> {
        self.0.iter()
    }
}

/// One possible interpretation of an input
#[derive(Debug, Clone)]
pub struct CandidateMatch {
    /// Resolved verb
    pub verb: ActionVerb,
    /// Resolved resource kind
    pub resource: ResourceKind,
    /// Bound slot values
    pub slots: SlotValues,
    /// Literals matched + slots bound
    pub confidence: u32,
    /// Index of the matched rule in the grammar table
    pub rule_index: usize,
}

/// Match normalized tokens against every rule in the table
///
/// Returns candidates ordered by descending confidence; equal-confidence
/// candidates keep grammar declaration order. An empty result is the
/// normal "unrecognized command" outcome, not a fault.
pub fn match_input(table: &GrammarTable, tokens: &[String]) -> Vec<CandidateMatch> {
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut candidates: Vec<CandidateMatch> = table
        .rules
        .iter()
        .enumerate()
        .filter_map(|(rule_index, rule)| {
            match_rule(&rule.elements(), tokens).map(|(slots, confidence)| {
                trace!(pattern = %rule.pattern, confidence, "rule matched");
                CandidateMatch {
                    verb: rule.verb,
                    resource: rule.resource,
                    slots,
                    confidence,
                    rule_index,
                }
            })
        })
        .collect();

    // Stable sort: declaration order survives as the tiebreak
    candidates.sort_by_key(|c| std::cmp::Reverse(c.confidence));
    candidates
}

/// Attempt one rule against the token stream
fn match_rule(elements: &[PatternElement<'_>], tokens: &[String]) -> Option<(SlotValues, u32)> {
    let mut slots = SlotValues::default();
    let mut cursor = 0;
    let mut literals = 0u32;

    for element in elements {
        match element {
            PatternElement::Literal(lit) => {
                // Literals must appear in order, gaps allowed
                let found = tokens[cursor..].iter().position(|t| t == lit)?;
                cursor += found + 1;
                literals += 1;
            }
            PatternElement::Slot(spec) => match bind_slot(spec, tokens, &mut cursor) {
                Some(value) => {
                    slots.insert(spec.name.clone(), value);
                }
                None if spec.required => return None,
                // Optional slot that fails to coerce is simply omitted
                None => {}
            },
        }
    }

    let confidence = literals + slots.len() as u32;
    Some((slots, confidence))
}

/// Coerce the token(s) at the cursor into the slot's declared type
fn bind_slot(spec: &SlotSpec, tokens: &[String], cursor: &mut usize) -> Option<SlotValue> {
    match spec.kind {
        SlotKind::Tag => {
            if *cursor >= tokens.len() {
                return None;
            }
            let text = tokens[*cursor..].join(" ");
            *cursor = tokens.len();
            Some(SlotValue::Text(text))
        }
        SlotKind::Integer => {
            let token = tokens.get(*cursor)?;
            let n: i64 = token.parse().ok()?;
            *cursor += 1;
            Some(SlotValue::Int(n))
        }
        SlotKind::Identifier => {
            let token = tokens.get(*cursor)?;
            // Integers make poor names; let integer-bearing rules claim them
            if token.parse::<i64>().is_ok() {
                return None;
            }
            let value = token.clone();
            *cursor += 1;
            Some(SlotValue::Ident(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::builtin_table;

    fn tokens(input: &str) -> Vec<String> {
        builtin_table().normalizer().normalize(input)
    }

    fn top(input: &str) -> CandidateMatch {
        let candidates = match_input(builtin_table(), &tokens(input));
        candidates.into_iter().next().expect("expected a match")
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(match_input(builtin_table(), &tokens("frobnicate the widget")).is_empty());
        assert!(match_input(builtin_table(), &[]).is_empty());
    }

    #[test]
    fn test_create_project_with_stack() {
        let m = top("CREATE MERN PROJECT myshop");
        assert_eq!(m.verb, ActionVerb::Create);
        assert_eq!(m.resource, ResourceKind::Project);
        assert_eq!(m.slots.get_str("stack"), Some("mern"));
        assert_eq!(m.slots.get_str("name"), Some("myshop"));
    }

    #[test]
    fn test_create_project_without_name() {
        let m = top("create mern project");
        assert_eq!(m.verb, ActionVerb::Create);
        assert_eq!(m.slots.get_str("stack"), Some("mern"));
        assert_eq!(m.slots.get_str("name"), None);
    }

    #[test]
    fn test_scale_down_phrase() {
        // "scale down" folds to "scale"; the target comes later from the registry
        let m = top("Scale down to 1 instance");
        assert_eq!(m.verb, ActionVerb::Scale);
        assert_eq!(m.resource, ResourceKind::Deployment);
        assert_eq!(m.slots.get_int("replicas"), Some(1));
        assert_eq!(m.slots.get_str("name"), None);
    }

    #[test]
    fn test_scale_with_name() {
        let m = top("scale myapp to 3 replicas");
        assert_eq!(m.verb, ActionVerb::Scale);
        assert_eq!(m.slots.get_str("name"), Some("myapp"));
        assert_eq!(m.slots.get_int("replicas"), Some(3));
    }

    #[test]
    fn test_negative_replicas_still_match() {
        // Type coercion accepts -1; the range check is the dispatcher's job
        let m = top("scale to -1 instances");
        assert_eq!(m.verb, ActionVerb::Scale);
        assert_eq!(m.slots.get_int("replicas"), Some(-1));
    }

    #[test]
    fn test_delete_bare() {
        let m = top("DELETE PROJECT");
        assert_eq!(m.verb, ActionVerb::Delete);
        assert_eq!(m.resource, ResourceKind::Project);
        assert!(m.slots.get_str("name").is_none());
    }

    #[test]
    fn test_synonym_verbs() {
        assert_eq!(top("tear down project abc").verb, ActionVerb::Delete);
        assert_eq!(top("spin up project abc").verb, ActionVerb::Create);
        assert_eq!(top("ship myapp").verb, ActionVerb::Deploy);
    }

    #[test]
    fn test_specific_rule_beats_generic() {
        // "create container for abc" must not bind name="for"
        let m = top("create container for abc");
        assert_eq!(m.resource, ResourceKind::Container);
        assert_eq!(m.slots.get_str("name"), Some("abc"));
    }

    #[test]
    fn test_list_and_show() {
        let m = top("list projects");
        assert_eq!(m.verb, ActionVerb::List);
        assert_eq!(m.resource, ResourceKind::Project);

        let m = top("show project abc");
        assert_eq!(m.verb, ActionVerb::Show);
        assert_eq!(m.slots.get_str("name"), Some("abc"));

        // Bare "show project" resolves via the registry, not a name slot
        let m = top("show project");
        assert_eq!(m.verb, ActionVerb::Show);
        assert!(m.slots.get_str("name").is_none());
    }

    #[test]
    fn test_deterministic_ordering() {
        let a = match_input(builtin_table(), &tokens("delete project abc"));
        let b = match_input(builtin_table(), &tokens("delete project abc"));
        let order_a: Vec<usize> = a.iter().map(|c| c.rule_index).collect();
        let order_b: Vec<usize> = b.iter().map(|c| c.rule_index).collect();
        assert_eq!(order_a, order_b);
        // And the winner is the most specific rule
        assert!(a[0].confidence >= a.last().unwrap().confidence);
    }

    #[test]
    fn test_builtin_normalization_idempotent() {
        let normalizer = builtin_table().normalizer();
        for input in [
            "CREATE MERN PROJECT myshop",
            "Scale down to 1 instance",
            "tear down project abc",
            "create kubernetes cluster for xyz",
            "list projects",
        ] {
            let once = normalizer.normalize(input);
            let twice = normalizer.normalize(&once.join(" "));
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_kubernetes_cluster_maps_to_deployment() {
        let m = top("create kubernetes cluster for xyz");
        assert_eq!(m.verb, ActionVerb::Create);
        assert_eq!(m.resource, ResourceKind::Deployment);
        assert_eq!(m.slots.get_str("name"), Some("xyz"));
    }
}
