//! Particle attribute kinds.

use std::fmt;

/// Three-component vector used for vector attributes (position, velocity).
pub type Vec3 = glam::Vec3;

/// Classification of a particle attribute's storage type.
///
/// Every registered attribute gets one buffer per block, laid out
/// structure-of-arrays: one `f32` per particle for [`AttributeKind::Float`],
/// one [`Vec3`] per particle for [`AttributeKind::Vec3`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// A single floating-point value per particle (mass, age, size).
    Float,
    /// A three-component vector per particle (position, velocity).
    Vec3,
}

impl AttributeKind {
    /// Number of f32 components stored per particle for this kind.
    pub fn components(&self) -> u32 {
        match self {
            Self::Float => 1,
            Self::Vec3 => 3,
        }
    }

    /// Size in bytes of one particle's value for this kind.
    pub fn element_bytes(&self) -> usize {
        self.components() as usize * std::mem::size_of::<f32>()
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float => write!(f, "float"),
            Self::Vec3 => write!(f, "vec3"),
        }
    }
}
