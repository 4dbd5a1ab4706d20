//! Query parameter normalization.
//!
//! Endpoint inputs are turned into an ordered list of `(name, value)` pairs.
//! Absent values are left out, bounded integers are clamped into their
//! documented range, and bounded lists are cut down to their documented size
//! before being expanded into repeated keys.

use smol_str::SmolStr;
use std::fmt::Display;

use crate::error::EncodeError;

/// Inclusive range a numeric parameter is documented to accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bound {
    /// Smallest accepted value
    pub min: i64,
    /// Largest accepted value
    pub max: i64,
}

impl Bound {
    /// Create a bound. `min` must not exceed `max`.
    pub const fn new(min: i64, max: i64) -> Self {
        debug_assert!(min <= max, "Bound::new called with min > max");
        Self { min, max }
    }

    /// Clamp `value` into `min..=max`.
    pub const fn clamp(&self, value: i64) -> i64 {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Whether `value` already lies within the bound.
    pub const fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Ordered query parameters. Repeated names are allowed and keep their order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(SmolStr, String)>);

impl QueryParams {
    /// Empty parameter list
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a parameter.
    pub fn push(&mut self, name: impl Into<SmolStr>, value: impl Display) -> &mut Self {
        self.0.push((name.into(), value.to_string()));
        self
    }

    /// Append a parameter if it has a value.
    pub fn push_opt(&mut self, name: impl Into<SmolStr>, value: Option<impl Display>) -> &mut Self {
        if let Some(value) = value {
            self.push(name, value);
        }
        self
    }

    /// Append an integer parameter clamped into `bound`, if it has a value.
    pub fn push_bounded(
        &mut self,
        name: impl Into<SmolStr>,
        value: Option<i64>,
        bound: Bound,
    ) -> &mut Self {
        self.push_opt(name, value.map(|v| bound.clamp(v)))
    }

    /// Append one parameter per value, in order.
    pub fn push_all<V: Display>(
        &mut self,
        name: impl Into<SmolStr>,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        let name = name.into();
        for value in values {
            self.0.push((name.clone(), value.to_string()));
        }
        self
    }

    /// Append at most `max` values, keeping the first ones.
    pub fn push_all_capped<V: Display>(
        &mut self,
        name: impl Into<SmolStr>,
        values: impl IntoIterator<Item = V>,
        max: usize,
    ) -> &mut Self {
        self.push_all(name, values.into_iter().take(max))
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    /// Every value for `name`, in order.
    pub fn get_all<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a str> + use<'a, 'n> {
        self.0
            .iter()
            .filter(move |(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// All parameters in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of parameters, counting repeats.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Percent-encode into a query string (without the leading `?`).
    pub fn to_query_string(&self) -> Result<String, EncodeError> {
        Ok(serde_html_form::to_string(&self.0)?)
    }
}

impl<N: Into<SmolStr>, V: Display> FromIterator<(N, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (name, value) in iter {
            params.push(name, value);
        }
        params
    }
}
