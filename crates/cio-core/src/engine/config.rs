use crate::core::costs::goal_pose::GoalTarget;
use crate::core::costs::regulation::RegulationParams;
use crate::core::costs::term::{CostKind, CostTerm};
use crate::core::models::contact::{
    ContactActivation, ContactClass, ContactPointDescriptor, NUM_ENDEFFECTOR_CONTACT_POINTS,
    PATCH_CORNER_OFFSETS,
};
use crate::core::models::ids::BodyRef;
use nalgebra::Vector3;
use serde::Deserialize;
use std::collections::HashSet;
use std::f64::consts::PI;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Cost term '{name}' has negative weight {weight}")]
    NegativeWeight { name: String, weight: f64 },

    #[error("Cost term '{name}' selects an empty or inverted contact range")]
    InvalidRange { name: String },

    #[error("Cost term name '{0}' is used more than once")]
    DuplicateName(String),

    #[error("No cost term named '{0}'")]
    UnknownTerm(String),

    #[error("'{name}' has an out-of-range '{parameter}'")]
    InvalidParameter {
        name: String,
        parameter: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid configuration in '{path}': {source}")]
    Invalid { path: String, source: ConfigError },
}

/// One `[[terms]]` entry. The name defaults to the kind's canonical name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TermConfig {
    #[serde(default)]
    pub name: Option<String>,
    pub weight: f64,
    #[serde(flatten)]
    pub kind: CostKind,
}

impl TermConfig {
    pub fn new(weight: f64, kind: CostKind) -> Self {
        Self {
            name: None,
            weight,
            kind,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn resolved_name(&self) -> &str {
        self.name
            .as_deref()
            .unwrap_or_else(|| self.kind.canonical_name())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContactPointConfig {
    pub body: BodyRef,
    pub chain: String,
    pub class: ContactClass,
    #[serde(default)]
    pub offset: [f64; 3],
    /// Slot whose contact-position channels this slot reads. Defaults to the slot itself.
    #[serde(default)]
    pub patch_base: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CostConfig {
    #[serde(default)]
    pub activation: ContactActivation,
    pub terms: Vec<TermConfig>,
    #[serde(default)]
    pub contact_points: Vec<ContactPointConfig>,
}

impl CostConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        config.validate().map_err(|e| ConfigLoadError::Invalid {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Ok(config)
    }

    /// Every cost of the planner with unit weight: both contact-force regulation instances
    /// and the reference terminal goals.
    pub fn reference() -> Self {
        let terms = vec![
            TermConfig::new(1.0, CostKind::Smoothness),
            TermConfig::new(1.0, CostKind::obstacle()),
            TermConfig::new(1.0, CostKind::contact_invariant()),
            TermConfig::new(1.0, CostKind::PhysicsViolation),
            TermConfig::new(1.0, CostKind::Torque),
            TermConfig::new(1.0, CostKind::friction_cone()),
            TermConfig::new(1.0, CostKind::force_transmission_ratio()),
            TermConfig::new(1.0, CostKind::ContactForceRegulation(RegulationParams::feet()))
                .named("foot_force_regulation"),
            TermConfig::new(1.0, CostKind::ContactForceRegulation(RegulationParams::hands()))
                .named("hand_force_regulation"),
            TermConfig::new(
                1.0,
                CostKind::GoalPose {
                    targets: GoalTarget::reference_targets(),
                },
            ),
        ];
        Self {
            activation: ContactActivation::default(),
            terms,
            contact_points: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.terms.is_empty() {
            return Err(ConfigError::MissingParameter("terms"));
        }
        let mut names = HashSet::new();
        for term in &self.terms {
            let name = term.resolved_name();
            if !names.insert(name) {
                return Err(ConfigError::DuplicateName(name.to_string()));
            }
            if term.weight < 0.0 {
                return Err(ConfigError::NegativeWeight {
                    name: name.to_string(),
                    weight: term.weight,
                });
            }
            if let CostKind::ContactForceRegulation(params) = &term.kind {
                if !params.contacts.is_valid() {
                    return Err(ConfigError::InvalidRange {
                        name: name.to_string(),
                    });
                }
            }
            if let Some(parameter) = invalid_parameter(&term.kind) {
                return Err(ConfigError::InvalidParameter {
                    name: name.to_string(),
                    parameter,
                });
            }
        }
        for (index, point) in self.contact_points.iter().enumerate() {
            if point
                .patch_base
                .is_some_and(|base| base >= self.contact_points.len())
            {
                return Err(ConfigError::InvalidParameter {
                    name: format!("contact_points[{}]", index),
                    parameter: "patch_base",
                });
            }
        }
        Ok(())
    }

    /// Terms in configuration order, indexed by position.
    pub fn cost_terms(&self) -> Vec<CostTerm> {
        self.terms
            .iter()
            .enumerate()
            .map(|(index, term)| {
                CostTerm::new(index, term.resolved_name(), term.weight, term.kind.clone())
            })
            .collect()
    }

    pub fn contact_point_descriptors(&self) -> Vec<ContactPointDescriptor> {
        self.contact_points
            .iter()
            .enumerate()
            .map(|(index, point)| {
                ContactPointDescriptor::new(index, point.body.clone(), &point.chain, point.class)
                    .with_offset(Vector3::from(point.offset))
                    .with_patch_base(point.patch_base.unwrap_or(index))
            })
            .collect()
    }
}

#[inline]
fn non_negative(value: f64) -> bool {
    value >= 0.0
}

#[inline]
fn positive(value: f64) -> bool {
    value > 0.0
}

/// The first kind parameter that would make the term's cost NaN or negative.
/// NaN parameters fail every comparison and are rejected too.
fn invalid_parameter(kind: &CostKind) -> Option<&'static str> {
    match kind {
        CostKind::JointDeviation { threshold } if !non_negative(*threshold) => Some("threshold"),
        CostKind::Obstacle {
            self_collision_scale,
        } if !non_negative(*self_collision_scale) => Some("self_collision_scale"),
        CostKind::ContactInvariant { velocity_weight } if !non_negative(*velocity_weight) => {
            Some("velocity_weight")
        }
        CostKind::FrictionCone {
            half_angle,
            min_force,
        } => {
            if !(0.0..=PI).contains(half_angle) {
                Some("half_angle")
            } else if !non_negative(*min_force) {
                Some("min_force")
            } else {
                None
            }
        }
        CostKind::ForceTransmissionRatio { clamp } if !positive(*clamp) => Some("clamp"),
        CostKind::ContactForceRegulation(params) => {
            if !non_negative(params.scale) {
                Some("scale")
            } else if !non_negative(params.k1) {
                Some("k1")
            } else if !positive(params.k2) {
                Some("k2")
            } else if !positive(params.force_normalizer) {
                Some("force_normalizer")
            } else {
                None
            }
        }
        _ => None,
    }
}

#[derive(Default)]
pub struct CostConfigBuilder {
    activation: Option<ContactActivation>,
    terms: Vec<TermConfig>,
    contact_points: Vec<ContactPointConfig>,
}

impl CostConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activation(mut self, activation: ContactActivation) -> Self {
        self.activation = Some(activation);
        self
    }
    pub fn term(mut self, weight: f64, kind: CostKind) -> Self {
        self.terms.push(TermConfig::new(weight, kind));
        self
    }
    pub fn named_term(mut self, name: &str, weight: f64, kind: CostKind) -> Self {
        self.terms.push(TermConfig::new(weight, kind).named(name));
        self
    }
    pub fn contact_point(
        mut self,
        body: impl Into<BodyRef>,
        chain: &str,
        class: ContactClass,
        offset: [f64; 3],
    ) -> Self {
        self.contact_points.push(ContactPointConfig {
            body: body.into(),
            chain: chain.to_string(),
            class,
            offset,
            patch_base: None,
        });
        self
    }

    /// Four slots sharing the contact-position channels of the first, offset by the
    /// reference patch corners.
    pub fn contact_patch(
        mut self,
        bodies: [BodyRef; NUM_ENDEFFECTOR_CONTACT_POINTS],
        chain: &str,
        class: ContactClass,
    ) -> Self {
        let base = self.contact_points.len();
        for (body, [x, y]) in bodies.into_iter().zip(PATCH_CORNER_OFFSETS) {
            self.contact_points.push(ContactPointConfig {
                body,
                chain: chain.to_string(),
                class,
                offset: [x, y, 0.0],
                patch_base: Some(base),
            });
        }
        self
    }

    pub fn build(self) -> Result<CostConfig, ConfigError> {
        let config = CostConfig {
            activation: self.activation.unwrap_or_default(),
            terms: self.terms,
            contact_points: self.contact_points,
        };
        config.validate()?;
        Ok(config)
    }
}
