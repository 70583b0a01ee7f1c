use nalgebra::{Point3, Vector3};

/// A point on the terrain surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GroundSample {
    pub position: Point3<f64>,
    pub normal: Vector3<f64>,
}

/// Maps a point of a patch, bilinearly interpolated from its corners, onto the terrain surface.
///
/// Samplers must be pure: adjacent patches sample their shared border points independently and
/// rely on getting bit-identical positions back.
pub trait GroundSampler {
    fn sample(&self, patch_point: &Point3<f64>) -> GroundSample;
}

impl<F> GroundSampler for F
where
    F: Fn(&Point3<f64>) -> GroundSample,
{
    fn sample(&self, patch_point: &Point3<f64>) -> GroundSample {
        self(patch_point)
    }
}

/// Leaves patch points where they are.
#[derive(Debug, Copy, Clone)]
pub struct FlatGround {
    pub normal: Vector3<f64>,
}

impl Default for FlatGround {
    fn default() -> Self {
        FlatGround {
            normal: Vector3::y(),
        }
    }
}

impl GroundSampler for FlatGround {
    fn sample(&self, patch_point: &Point3<f64>) -> GroundSample {
        GroundSample {
            position: *patch_point,
            normal: self.normal,
        }
    }
}

/// How patch points are pushed out onto a sphere.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Projection {
    /// Normalizes the offset from the sphere center.
    Normalize,

    /// Treats patch points as lying on a cube of the given half extent around the center and
    /// applies the cube to sphere mapping that keeps cells close to equal area.
    CubeMorph { half_extent: f64 },
}

/// A smooth sphere.
#[derive(Debug, Copy, Clone)]
pub struct SphereGround {
    pub center: Point3<f64>,
    pub radius: f64,
    pub projection: Projection,
}

impl SphereGround {
    pub fn new(center: Point3<f64>, radius: f64) -> SphereGround {
        SphereGround {
            center,
            radius,
            projection: Projection::Normalize,
        }
    }

    pub fn with_cube_morph(mut self, half_extent: f64) -> SphereGround {
        self.projection = Projection::CubeMorph { half_extent };
        self
    }

    fn direction(&self, patch_point: &Point3<f64>) -> Vector3<f64> {
        let offset = patch_point - self.center;
        match self.projection {
            Projection::Normalize => offset.normalize(),
            Projection::CubeMorph { half_extent } => morph(offset / half_extent).normalize(),
        }
    }
}

impl GroundSampler for SphereGround {
    fn sample(&self, patch_point: &Point3<f64>) -> GroundSample {
        let dir = self.direction(patch_point);
        GroundSample {
            position: self.center + dir * self.radius,
            normal: dir,
        }
    }
}

fn morph(pos: Vector3<f64>) -> Vector3<f64> {
    let pos_squared = Vector3::new(pos.x * pos.x, pos.y * pos.y, pos.z * pos.z);
    let a = Vector3::new(pos_squared.y, pos_squared.z, pos_squared.x) * 0.5;
    let b = Vector3::new(pos_squared.z, pos_squared.x, pos_squared.y) * 0.5;
    Vector3::new(
        pos.x * f64::sqrt(1.0 - a.x - b.x + pos_squared.y * pos_squared.z / 3.0),
        pos.y * f64::sqrt(1.0 - a.y - b.y + pos_squared.z * pos_squared.x / 3.0),
        pos.z * f64::sqrt(1.0 - a.z - b.z + pos_squared.x * pos_squared.y / 3.0),
    )
}
