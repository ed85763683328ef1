//! Hyperparameter grid types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AutoMLError;
use crate::Result;

/// A single hyperparameter value.
///
/// Deserializes from a JSON integer, float or `null`; `null` stands for
/// "unbounded" (e.g. no depth limit).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    None,
}

impl ParamValue {
    /// Interpret as a non-negative integer.
    pub fn as_usize(&self) -> Option<usize> {
        match self {
            ParamValue::Int(v) => usize::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Interpret as a float; integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(v) => Some(*v as f64),
            ParamValue::Float(v) => Some(*v),
            ParamValue::None => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ParamValue::None)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::None => write!(f, "None"),
        }
    }
}

/// One point of a hyperparameter grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamPoint(BTreeMap<String, ParamValue>);

impl ParamPoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: ParamValue) -> Self {
        self.0.insert(name.to_string(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<ParamValue> {
        self.0.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ParamPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl FromIterator<(String, ParamValue)> for ParamPoint {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Mapping from parameter name to its candidate values.
///
/// The search space is the cross-product of all value lists. Points are
/// enumerated with parameter names in sorted order and the last name varying
/// fastest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HyperparameterGrid {
    params: BTreeMap<String, Vec<ParamValue>>,
}

impl HyperparameterGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a parameter and its candidate values.
    pub fn with_param(mut self, name: &str, values: Vec<ParamValue>) -> Self {
        self.params.insert(name.to_string(), values);
        self
    }

    /// Parameter names in enumeration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    pub fn values(&self, name: &str) -> Option<&[ParamValue]> {
        self.params.get(name).map(Vec::as_slice)
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        if self.params.is_empty() {
            return 0;
        }
        self.params.values().map(Vec::len).product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reject grids with no parameters or with an empty value list.
    pub fn validate(&self) -> Result<()> {
        if self.params.is_empty() {
            return Err(AutoMLError::InvalidConfig(
                "hyperparameter grid has no parameters".into(),
            ));
        }
        for (name, values) in &self.params {
            if values.is_empty() {
                return Err(AutoMLError::InvalidParameter {
                    name: name.clone(),
                    reason: "no candidate values".into(),
                });
            }
        }
        Ok(())
    }

    /// Enumerate every grid point.
    pub fn points(&self) -> Vec<ParamPoint> {
        if self.params.is_empty() {
            return Vec::new();
        }

        let mut points: Vec<Vec<(String, ParamValue)>> = vec![Vec::new()];
        for (name, values) in &self.params {
            let mut next = Vec::with_capacity(points.len() * values.len());
            for point in &points {
                for value in values {
                    let mut extended = point.clone();
                    extended.push((name.clone(), *value));
                    next.push(extended);
                }
            }
            points = next;
        }

        points
            .into_iter()
            .map(|p| p.into_iter().collect())
            .collect()
    }
}
