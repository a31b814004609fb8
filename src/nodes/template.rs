use std::sync::OnceLock;

use regex::Regex;
use serde_json::Map;

use super::{NodeValue, SharedStore};

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{(\w+)\}").expect("placeholder pattern is valid"))
}

/// A prompt or query template with `{placeholder}` substitution.
///
/// Placeholder keys are extracted once at construction. Rendering is total:
/// every `{word}` token is substituted with the gathered value, and keys
/// missing from the context render as the empty string rather than erroring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    raw: String,
    keys: Vec<String>,
}

impl PromptTemplate {
    /// Compiles a template, extracting its placeholder keys.
    pub fn new(template: impl Into<String>) -> Self {
        let raw = template.into();
        let mut keys: Vec<String> = Vec::new();
        for captures in placeholder_pattern().captures_iter(&raw) {
            let key = &captures[1];
            if !keys.iter().any(|k| k == key) {
                keys.push(key.to_string());
            }
        }
        PromptTemplate { raw, keys }
    }

    /// The template text as written.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Placeholder keys in first-appearance order, deduplicated.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Returns `true` if the template contains `{key}`.
    pub fn references(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// Renders the template against a gathered context.
    ///
    /// String values substitute verbatim; null and missing values substitute
    /// as empty; other JSON values substitute as their compact text form.
    pub fn render(&self, context: &Map<String, NodeValue>) -> String {
        placeholder_pattern()
            .replace_all(&self.raw, |captures: &regex::Captures<'_>| {
                stringify(context.get(&captures[1]))
            })
            .into_owned()
    }
}

impl Default for PromptTemplate {
    /// The pass-through template `"{input}"`.
    fn default() -> Self {
        PromptTemplate::new("{input}")
    }
}

fn stringify(value: Option<&NodeValue>) -> String {
    match value {
        None | Some(NodeValue::Null) => String::new(),
        Some(NodeValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Gathers every value a template render will need from the shared store.
///
/// Copies each placeholder key's value (absent keys become empty strings),
/// guarantees `input_key` is present even when the template never references
/// it, and applies the alias rule: a template referencing `{input}` with a
/// differently named `input_key` sees the `input_key` value under `input`, so
/// the default template works for any configured key.
pub(crate) fn gather_context(
    template: &PromptTemplate,
    input_key: &str,
    shared: &SharedStore,
) -> Map<String, NodeValue> {
    let fetch = |key: &str| {
        shared
            .get(key)
            .cloned()
            .unwrap_or(NodeValue::String(String::new()))
    };

    let mut context = Map::new();
    for key in template.keys() {
        context.insert(key.clone(), fetch(key));
    }
    if !context.contains_key(input_key) {
        context.insert(input_key.to_string(), fetch(input_key));
    }
    if template.references("input") && input_key != "input" {
        context.insert("input".to_string(), fetch(input_key));
    }
    context
}
