use super::context::WaypointContext;
use super::error::CostError;
use super::term::CostEvaluation;
use serde::Deserialize;
use std::ops::Range;

/// Half-open range of contact indices; an absent `end` extends to the last contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ContactRange {
    pub start: usize,
    #[serde(default)]
    pub end: Option<usize>,
}

impl ContactRange {
    pub fn new(start: usize, end: Option<usize>) -> Self {
        Self { start, end }
    }

    /// Clamps the range to `count` contacts.
    pub fn resolve(&self, count: usize) -> Range<usize> {
        let end = self.end.map_or(count, |end| end.min(count));
        self.start.min(end)..end
    }

    pub fn is_valid(&self) -> bool {
        self.end.is_none_or(|end| self.start <= end)
    }
}

fn default_scale() -> f64 {
    1.0
}

fn default_k1() -> f64 {
    1e-5
}

fn default_k2() -> f64 {
    1e-7
}

fn default_force_normalizer() -> f64 {
    15000.0
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegulationParams {
    pub contacts: ContactRange,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default = "default_k1")]
    pub k1: f64,
    #[serde(default = "default_k2")]
    pub k2: f64,
    #[serde(default = "default_force_normalizer")]
    pub force_normalizer: f64,
}

impl RegulationParams {
    pub fn new(contacts: ContactRange, scale: f64) -> Self {
        Self {
            contacts,
            scale,
            k1: default_k1(),
            k2: default_k2(),
            force_normalizer: default_force_normalizer(),
        }
    }

    /// The two foot contacts leading the contact list.
    pub fn feet() -> Self {
        Self::new(ContactRange::new(0, Some(2)), 1.0)
    }

    /// Every contact after the feet, penalized ten times harder.
    pub fn hands() -> Self {
        Self::new(ContactRange::new(2, None), 10.0)
    }

    #[inline]
    fn factor(&self, variable: f64) -> f64 {
        self.scale * self.k1 / (variable * variable + self.k2)
    }
}

/// Penalizes force carried by weakly activated contacts:
/// `scale * k1 / (variable^2 + k2) * (|F| / force_normalizer)^2` per contact in range.
pub fn evaluate(
    context: &WaypointContext<'_>,
    params: &RegulationParams,
) -> Result<CostEvaluation, CostError> {
    let range = params.contacts.resolve(context.contacts.len());
    let cost = context.contacts[range]
        .iter()
        .map(|contact| {
            let magnitude = contact.total_force().norm() / params.force_normalizer;
            params.factor(contact.variable()) * magnitude * magnitude
        })
        .sum();
    Ok(CostEvaluation::soft(cost))
}
