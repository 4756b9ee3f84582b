use serde::Deserialize;
use std::fmt;

pub type BodyId = usize;

/// Reference to a body of the dynamics model, either by numeric id or by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum BodyRef {
    Id(BodyId),
    Name(String),
}

impl From<BodyId> for BodyRef {
    fn from(id: BodyId) -> Self {
        BodyRef::Id(id)
    }
}

impl From<&str> for BodyRef {
    fn from(name: &str) -> Self {
        BodyRef::Name(name.to_string())
    }
}

impl fmt::Display for BodyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyRef::Id(id) => write!(f, "#{id}"),
            BodyRef::Name(name) => write!(f, "{name}"),
        }
    }
}
