use super::patch::PatchBounds;
use nalgebra::{Matrix3, Point3, Rotation3, Vector3};

/// One side of the cube a planet's patches are laid out on, named by its outward direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    Left,
    Right,
    Top,
    Bottom,
    Front,
    Back,
}

/// Builds the frame of a face from its column axis, row axis and outward normal.
fn frame(tangent: Vector3<f64>, binormal: Vector3<f64>, normal: Vector3<f64>) -> Rotation3<f64> {
    debug_assert_eq!(tangent.cross(&binormal), normal);
    Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[tangent, binormal, normal]))
}

lazy_static! {
    static ref ORIENTATION_LEFT: Rotation3<f64> = frame(Vector3::z(), Vector3::y(), -Vector3::x());
    static ref ORIENTATION_RIGHT: Rotation3<f64> = frame(-Vector3::z(), Vector3::y(), Vector3::x());
    static ref ORIENTATION_TOP: Rotation3<f64> = frame(Vector3::x(), -Vector3::z(), Vector3::y());
    static ref ORIENTATION_BOTTOM: Rotation3<f64> =
        frame(Vector3::x(), Vector3::z(), -Vector3::y());
    static ref ORIENTATION_FRONT: Rotation3<f64> = frame(Vector3::x(), Vector3::y(), Vector3::z());
    static ref ORIENTATION_BACK: Rotation3<f64> = frame(-Vector3::x(), Vector3::y(), -Vector3::z());
}

impl Face {
    /// Rotation that takes the front face (+z) onto this face.
    pub fn orientation(self) -> Rotation3<f64> {
        match self {
            Face::Left => *ORIENTATION_LEFT,
            Face::Right => *ORIENTATION_RIGHT,
            Face::Top => *ORIENTATION_TOP,
            Face::Bottom => *ORIENTATION_BOTTOM,
            Face::Front => *ORIENTATION_FRONT,
            Face::Back => *ORIENTATION_BACK,
        }
    }

    pub fn normal(self) -> Vector3<f64> {
        self.orientation() * Vector3::z()
    }

    /// Corners of this face on an origin centered cube. Columns run along the face tangent and
    /// rows along the binormal, so triangles wound like the patch interior face outwards.
    pub fn corners(self, half_extent: f64) -> PatchBounds {
        let rotation = self.orientation();
        let h = half_extent;
        PatchBounds::new(
            rotation * Point3::new(-h, -h, h),
            rotation * Point3::new(h, -h, h),
            rotation * Point3::new(-h, h, h),
            rotation * Point3::new(h, h, h),
        )
    }

    pub fn values() -> impl Iterator<Item = &'static Face> {
        static VALUES: [Face; 6] = [
            Face::Left,
            Face::Right,
            Face::Top,
            Face::Bottom,
            Face::Front,
            Face::Back,
        ];
        VALUES.iter()
    }
}
