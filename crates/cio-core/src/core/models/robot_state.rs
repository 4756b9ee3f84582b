use nalgebra::DVector;

/// Scratch joint configuration passed to the collision oracle.
///
/// A `RobotState` is owned by exactly one worker; concurrent waypoint evaluations each hold
/// their own instance.
#[derive(Debug, Clone, PartialEq)]
pub struct RobotState {
    positions: DVector<f64>,
}

impl RobotState {
    pub fn new(dof: usize) -> Self {
        Self {
            positions: DVector::zeros(dof),
        }
    }

    #[inline]
    pub fn dof(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &DVector<f64> {
        &self.positions
    }

    /// Overwrites the joint positions. Values beyond the state's DOF count are ignored; the
    /// caller checks the counts match.
    pub fn set_positions<'a, I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = &'a f64>,
    {
        for (slot, value) in self.positions.iter_mut().zip(positions) {
            *slot = *value;
        }
    }
}
