//! Grammar table
//!
//! A static, ordered collection of phrase patterns mapping to intents.
//! The table is declarative data (YAML), loaded once at process start
//! into an immutable structure; adding a phrase never touches the
//! matcher. Declaration order doubles as the tiebreak between candidates
//! of equal confidence.

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use launchkit_core::{ActionVerb, ResourceKind};

use crate::error::{Error, Result};
use crate::normalize::Normalizer;

/// Built-in grammar shipped with the binary
const BUILTIN_GRAMMAR: &str = include_str!("grammar.yaml");

/// Slot value type accepted at a pattern position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    /// Whole number (range checks happen in handler validation)
    Integer,
    /// Single name token (project, container, image, ...)
    Identifier,
    /// Free text consuming the remaining tokens
    Tag,
}

/// Specification of one typed slot in a grammar rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotSpec {
    /// Slot name referenced from the pattern as `<name>`
    pub name: String,

    /// Value type the slot coerces to
    pub kind: SlotKind,

    /// Whether a failed coercion fails the whole rule
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

/// One phrase pattern mapping to an intent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarRule {
    /// Whitespace-separated template of literal tokens and `<slot>` refs
    pub pattern: String,

    /// Canonical verb this pattern resolves to
    pub verb: ActionVerb,

    /// Resource kind this pattern targets
    pub resource: ResourceKind,

    /// Slot specs referenced by the pattern
    #[serde(default)]
    pub slots: Vec<SlotSpec>,
}

/// A parsed pattern element
#[derive(Debug, Clone)]
pub enum PatternElement<'a> {
    /// Literal token that must appear, in order
    Literal(&'a str),
    /// Slot position consuming input token(s)
    Slot(&'a SlotSpec),
}

impl GrammarRule {
    /// Parse the pattern into elements. Slot references are validated at
    /// table load, so lookups here cannot fail.
    pub fn elements(&self) -> Vec<PatternElement<'_>> {
        self.pattern
            .split_whitespace()
            .map(|word| match slot_ref(word) {
                Some(name) => PatternElement::Slot(
                    self.slots
                        .iter()
                        .find(|s| s.name == name)
                        .expect("slot refs validated at load"),
                ),
                None => PatternElement::Literal(word),
            })
            .collect()
    }
}

/// Extract the slot name from a `<name>` pattern token
fn slot_ref(word: &str) -> Option<&str> {
    word.strip_prefix('<')?.strip_suffix('>')
}

/// The loaded grammar: synonym map plus ordered rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarTable {
    /// Synonym phrase -> canonical phrase rewrites
    #[serde(default)]
    pub synonyms: HashMap<String, String>,

    /// Ordered phrase patterns; earlier entries win confidence ties
    pub rules: Vec<GrammarRule>,
}

impl GrammarTable {
    /// Parse a grammar table from YAML and validate it
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let table: Self = serde_yaml_ng::from_str(yaml)?;
        table.validate()?;
        Ok(table)
    }

    /// Load a user grammar table from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::grammar_not_found(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Check every pattern parses and every slot reference resolves
    fn validate(&self) -> Result<()> {
        if self.rules.is_empty() {
            return Err(Error::EmptyTable);
        }

        for (index, rule) in self.rules.iter().enumerate() {
            if rule.pattern.split_whitespace().next().is_none() {
                return Err(Error::EmptyPattern { index });
            }

            for word in rule.pattern.split_whitespace() {
                if let Some(name) = slot_ref(word) {
                    if !rule.slots.iter().any(|s| s.name == name) {
                        return Err(Error::unknown_slot_ref(&rule.pattern, name));
                    }
                }
            }
        }

        Ok(())
    }

    /// Build a normalizer from this table's synonym map
    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(&self.synonyms)
    }
}

/// The built-in grammar table, parsed once per process
pub fn builtin_table() -> &'static GrammarTable {
    static TABLE: OnceLock<GrammarTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        GrammarTable::from_yaml(BUILTIN_GRAMMAR).expect("built-in grammar table is valid")
    })
}
