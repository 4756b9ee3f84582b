use crate::core::world::collision::CollisionOracle;
use crate::core::world::ground::GroundProjector;
use crate::core::world::kinematics::KinematicChains;

/// Read-only world services shared by every waypoint of an evaluation pass.
///
/// Collision and kinematic-chain services are optional; terms that need a missing one fail
/// with a contract violation.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub ground: &'a dyn GroundProjector,
    pub collision: Option<&'a dyn CollisionOracle>,
    pub kinematics: Option<&'a dyn KinematicChains>,
}

impl<'a> Collaborators<'a> {
    pub fn new(ground: &'a dyn GroundProjector) -> Self {
        Self {
            ground,
            collision: None,
            kinematics: None,
        }
    }

    pub fn with_collision(mut self, collision: &'a dyn CollisionOracle) -> Self {
        self.collision = Some(collision);
        self
    }

    pub fn with_kinematics(mut self, kinematics: &'a dyn KinematicChains) -> Self {
        self.kinematics = Some(kinematics);
        self
    }
}
