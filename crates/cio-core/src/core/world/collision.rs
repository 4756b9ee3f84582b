use crate::core::models::robot_state::RobotState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    RobotLink,
    WorldObject,
}

/// One penetrating contact reported by the collision oracle.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionContact {
    pub body_a: String,
    pub body_b: String,
    pub kind_a: BodyKind,
    pub kind_b: BodyKind,
    pub depth: f64,
}

impl CollisionContact {
    pub fn environment(link: &str, object: &str, depth: f64) -> Self {
        Self {
            body_a: link.to_string(),
            body_b: object.to_string(),
            kind_a: BodyKind::RobotLink,
            kind_b: BodyKind::WorldObject,
            depth,
        }
    }

    pub fn self_collision(link_a: &str, link_b: &str, depth: f64) -> Self {
        Self {
            body_a: link_a.to_string(),
            body_b: link_b.to_string(),
            kind_a: BodyKind::RobotLink,
            kind_b: BodyKind::RobotLink,
            depth,
        }
    }

    /// Both colliding bodies belong to the robot.
    #[inline]
    pub fn is_self_collision(&self) -> bool {
        self.kind_a != BodyKind::WorldObject && self.kind_b != BodyKind::WorldObject
    }
}

pub trait CollisionOracle: Send + Sync {
    fn check(&self, state: &RobotState) -> Vec<CollisionContact>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_contact_is_not_self_collision() {
        assert!(!CollisionContact::environment("left_foot", "table", 0.01).is_self_collision());
    }

    #[test]
    fn link_pair_is_self_collision() {
        assert!(CollisionContact::self_collision("left_foot", "right_foot", 0.01).is_self_collision());
    }
}
