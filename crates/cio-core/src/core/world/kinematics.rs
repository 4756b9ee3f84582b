use nalgebra::Matrix3xX;

/// Kinematic-chain lookup providing linear-velocity Jacobians.
pub trait KinematicChains: Send + Sync {
    /// The 3 x DOF linear-velocity Jacobian of the chain's end-effector at the given joint
    /// positions, or `None` if the chain is unknown.
    fn jacobian(&self, chain: &str, joint_positions: &[f64]) -> Option<Matrix3xX<f64>>;
}
