use nalgebra::{Point3, Unit, Vector3};

/// Support-surface query: the nearest surface point to `point` and the unit surface normal
/// there.
pub trait GroundProjector: Send + Sync {
    fn nearest(&self, point: &Point3<f64>) -> (Point3<f64>, Vector3<f64>);
}

/// Horizontal ground plane at a fixed height.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlatGround {
    pub height: f64,
}

impl FlatGround {
    pub fn new(height: f64) -> Self {
        Self { height }
    }
}

impl GroundProjector for FlatGround {
    fn nearest(&self, point: &Point3<f64>) -> (Point3<f64>, Vector3<f64>) {
        (Point3::new(point.x, point.y, self.height), Vector3::z())
    }
}

/// Arbitrary infinite plane through `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneGround {
    origin: Point3<f64>,
    normal: Unit<Vector3<f64>>,
}

impl PlaneGround {
    pub fn new(origin: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            origin,
            normal: Unit::new_normalize(normal),
        }
    }
}

impl GroundProjector for PlaneGround {
    fn nearest(&self, point: &Point3<f64>) -> (Point3<f64>, Vector3<f64>) {
        let normal = self.normal.into_inner();
        let height = (point - self.origin).dot(&normal);
        (point - normal * height, normal)
    }
}
