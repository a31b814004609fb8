//! Typed pass-through options for provider calls.
//!
//! Call sites hand a [`CallOptions`] bag to the registry, which forwards it to
//! the resolved provider untouched. Keys are provider-defined (temperature,
//! region, safe-search level, ...); this crate only defines the container.

/// A single option value of one of the supported primitive types.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Int(v)
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        OptionValue::Float(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::Str(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        OptionValue::Str(v)
    }
}

/// An insertion-ordered bag of named options passed through to providers.
///
/// Duplicate keys overwrite on [`insert`](CallOptions::insert), so node-level
/// configuration can pin a value regardless of what the caller supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallOptions {
    entries: Vec<(String, OptionValue)>,
}

impl CallOptions {
    /// Creates an empty options bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an option, overwriting any existing entry with the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Builder-style [`insert`](CallOptions::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Looks up an option by key.
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Looks up a string option.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            OptionValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up an integer option.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            OptionValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Looks up a float option; integer values coerce losslessly.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            OptionValue::Float(f) => Some(*f),
            OptionValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Looks up a boolean option.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns `true` if an entry exists for `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the bag has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
