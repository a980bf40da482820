// src/api/params.rs
//! Query parameter handling.
//!
//! [`QueryParams`] keeps parameters in insertion order, never stores unset values and keeps
//! each name at most once. Option structs elsewhere in the crate derive `Serialize` and are
//! flattened into a `QueryParams` through [`QueryParams::from_serializable`].

use crate::error::{CoinGeckoError, Result};
use chrono::{DateTime, NaiveDate, TimeZone};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Ordered name -> value map serialized into the query string of one call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name`, replacing any earlier value.
    pub fn set(&mut self, name: impl Into<String>, value: impl fmt::Display) -> &mut Self {
        let name = name.into();
        let value = value.to_string();
        match self.pairs.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.pairs.push((name, value)),
        }
        self
    }

    /// Sets `name` only when `value` is present.
    pub fn set_opt<T: fmt::Display>(&mut self, name: impl Into<String>, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.set(name, value);
        }
        self
    }

    /// Sets a comma separated list. Spaces are stripped from every item.
    pub fn set_list<I, S>(&mut self, name: impl Into<String>, items: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set(name, join_list(items))
    }

    pub fn with(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.set(name, value);
        self
    }

    pub fn with_opt<T: fmt::Display>(mut self, name: impl Into<String>, value: Option<T>) -> Self {
        self.set_opt(name, value);
        self
    }

    pub fn with_list<I, S>(mut self, name: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_list(name, items);
        self
    }

    /// Adds every pair of `other`, overriding names already present.
    pub fn merge(&mut self, other: QueryParams) -> &mut Self {
        for (name, value) in other.pairs {
            self.set(name, value);
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Flattens a serializable struct. `null` fields are skipped, arrays become comma lists,
    /// strings are used verbatim and other scalars use their JSON text.
    pub fn from_serializable<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let value = serde_json::to_value(value).map_err(|e| {
            CoinGeckoError::Config(format!("query parameters must serialize to an object: {}", e))
        })?;
        let object = match value {
            Value::Object(object) => object,
            Value::Null => return Ok(Self::new()),
            other => {
                return Err(CoinGeckoError::Config(format!(
                    "query parameters must serialize to an object, got {}",
                    other
                )))
            }
        };

        let mut params = Self::new();
        for (name, value) in object {
            match value {
                Value::Null => {}
                Value::String(s) => {
                    params.set(name, s);
                }
                Value::Array(items) => {
                    let items: Vec<String> = items.iter().filter_map(scalar_text).collect();
                    params.set_list(name, items);
                }
                other => {
                    if let Some(text) = scalar_text(&other) {
                        params.set(name, text);
                    }
                }
            }
        }
        Ok(params)
    }
}

impl<K: Into<String>, V: fmt::Display> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.set(name, value);
        }
        params
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

pub(crate) fn join_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| item.as_ref().replace(' ', ""))
        .filter(|item| !item.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

/// Chart window. `Max` asks for the full history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Days {
    Count(u32),
    Max,
}

impl fmt::Display for Days {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Days::Count(n) => write!(f, "{}", n),
            Days::Max => f.write_str("max"),
        }
    }
}

impl From<u32> for Days {
    fn from(n: u32) -> Self {
        Days::Count(n)
    }
}

impl Serialize for Days {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// `dd-mm-yyyy`, the date format of the history endpoints.
pub fn history_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// UNIX seconds, the format of the `from` / `to` range parameters.
pub fn unix_seconds<Tz: TimeZone>(at: &DateTime<Tz>) -> i64 {
    at.timestamp()
}
