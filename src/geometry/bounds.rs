//! Axis-aligned bounding boxes for generated sections.

use cgmath::Vector3;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vector3<f32>,
    /// Maximum corner of the bounding box
    pub max: Vector3<f32>,
}

impl Aabb {
    /// Degenerate box around a single point
    pub fn at(point: Vector3<f32>) -> Self {
        Self { min: point, max: point }
    }

    /// Box around the given positions, `None` for an empty slice
    pub fn from_vertices(vertices: &[[f32; 3]]) -> Option<Self> {
        let mut points = vertices.iter().map(|&v| Vector3::from(v));
        let first = points.next()?;
        Some(points.fold(Self::at(first), Self::including))
    }

    /// Grow the box to take in `point`
    pub fn including(self, point: Vector3<f32>) -> Self {
        Self {
            min: self.min.zip(point, f32::min),
            max: self.max.zip(point, f32::max),
        }
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &Aabb) -> Aabb {
        Self::at(self.min).including(self.max).including(other.min).including(other.max)
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    /// Whether `point` lies inside or on the box
    pub fn contains(&self, point: [f32; 3]) -> bool {
        (self.min.x..=self.max.x).contains(&point[0])
            && (self.min.y..=self.max.y).contains(&point[1])
            && (self.min.z..=self.max.z).contains(&point[2])
    }
}
