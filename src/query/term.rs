// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! The three match-criterion value kinds: text terms, numeric ranges and
//! geo radii. All are immutable values with no identity beyond their
//! fields.
//!
//! Numeric literals render through `Display`, which is shortest
//! round-trip and locale independent; infinities come out as the engine's
//! `inf` / `-inf` tokens.

use serde::{Deserialize, Serialize};

/// How a term marked "default" is rendered by the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TermResolvingStrategy {
    /// Default terms render as quoted phrases.
    #[default]
    Exact,
    /// Default terms render as free tokens, letting the engine expand them.
    Expanded,
}

/// A textual search term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    value: String,
    is_exact: bool,
    is_default: bool,
}

impl Term {
    /// Creates an exact term, rendered as a quoted phrase.
    pub fn exact(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_exact: true,
            is_default: false,
        }
    }

    /// Creates an expanded term, rendered as a free token.
    pub fn expanded(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_exact: false,
            is_default: false,
        }
    }

    /// A term whose exactness follows the query's default strategy.
    pub(crate) fn default_resolved(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_exact: false,
            is_default: true,
        }
    }

    /// Renders the term. Explicitly exact/expanded terms ignore the
    /// strategy; default terms follow it.
    pub(crate) fn resolve(&self, strategy: TermResolvingStrategy) -> String {
        let use_exact = (!self.is_default && self.is_exact)
            || (self.is_default && strategy == TermResolvingStrategy::Exact);

        let normalized = normalize(&self.value);
        if use_exact {
            format!("\"{normalized}\"")
        } else {
            normalized
        }
    }
}

impl From<&str> for Term {
    fn from(value: &str) -> Self {
        Term::default_resolved(value)
    }
}

impl From<String> for Term {
    fn from(value: String) -> Self {
        Term::default_resolved(value)
    }
}

/// Replaces every character that is not a letter or digit with a space.
fn normalize(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect()
}

/// A numeric range term.
///
/// Range ordering is the caller's responsibility: an inverted range is a
/// valid-but-empty filter, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericTerm {
    min: f64,
    max: f64,
    exclusive_min: bool,
    exclusive_max: bool,
}

impl NumericTerm {
    /// An inclusive range. Use `f64::NEG_INFINITY` / `f64::INFINITY` for
    /// open bounds.
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            exclusive_min: false,
            exclusive_max: false,
        }
    }

    /// A range with per-bound exclusivity.
    pub fn between_exclusive(min: f64, max: f64, exclusive_min: bool, exclusive_max: bool) -> Self {
        Self {
            min,
            max,
            exclusive_min,
            exclusive_max,
        }
    }

    /// Renders as `[min max]`; exclusive bounds get a leading `(`.
    pub(crate) fn render(&self) -> String {
        let mut out = String::from("[");
        render_bound(&mut out, self.min, self.exclusive_min);
        out.push(' ');
        render_bound(&mut out, self.max, self.exclusive_max);
        out.push(']');
        out
    }
}

fn render_bound(out: &mut String, value: f64, exclusive: bool) {
    if exclusive {
        out.push('(');
    }
    // Display already yields "inf" / "-inf" for the infinities.
    out.push_str(&value.to_string());
}

/// The radius unit of a geo term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeoUnit {
    Feet,
    Kilometers,
    Meters,
    Miles,
}

impl GeoUnit {
    pub(crate) fn token(self) -> &'static str {
        match self {
            GeoUnit::Feet => "ft",
            GeoUnit::Kilometers => "km",
            GeoUnit::Meters => "m",
            GeoUnit::Miles => "mi",
        }
    }
}

/// A geospatial radius term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTerm {
    longitude: f64,
    latitude: f64,
    distance: f64,
    unit: GeoUnit,
}

impl GeoTerm {
    /// Creates a geo term matching everything within `distance` of the
    /// center coordinate.
    ///
    /// Valid longitudes are from -180 to 180 degrees and valid latitudes
    /// from -85.05112878 to 85.05112878 degrees; out-of-range values are
    /// the engine's problem, not checked here.
    pub fn within_distance_of(longitude: f64, latitude: f64, distance: f64, unit: GeoUnit) -> Self {
        Self {
            longitude,
            latitude,
            distance,
            unit,
        }
    }

    /// Renders as `[lon lat dist unit]`.
    pub(crate) fn render(&self) -> String {
        format!(
            "[{} {} {} {}]",
            self.longitude,
            self.latitude,
            self.distance,
            self.unit.token()
        )
    }
}
