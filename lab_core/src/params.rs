//! Experiment parameters and numeric input parsing

use crate::error::{LabError, Result};

/// Parse user-typed text as a number.
///
/// Accepts `.` or `,` as the decimal separator and surrounding whitespace.
/// Empty, non-numeric and non-finite input is rejected.
pub fn parse_number(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(LabError::parse(text));
    }

    let normalized = trimmed.replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(LabError::parse(text)),
    }
}

/// Named experiment inputs in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, f64)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name`, replacing an existing value in place.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    /// Value of `name`; a missing parameter is a domain error.
    pub fn get(&self, name: &str) -> Result<f64> {
        self.value(name)
            .ok_or_else(|| LabError::domain(format!("missing parameter {name}")))
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One-line summary, e.g. `"m1=100.0, t1=80.0"`.
    pub fn summary(&self) -> String {
        self.entries
            .iter()
            .map(|(key, value)| format!("{key}={value:.1}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Params {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}
