//! 2D math primitives: vectors, transform components and affine matrices.
//!
//! Rotation angles are degrees throughout; positive angles rotate
//! counter-clockwise in a y-up frame (clockwise on screen coordinates).

use serde::{Deserialize, Serialize};

/// 2D vector.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const ONE: Vec2 = Vec2 { x: 1.0, y: 1.0 };

    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vec2(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    Vec2::new(lerp_f32(a.x, b.x, t), lerp_f32(a.y, b.y, t))
}

/// Axis-aligned rectangle (left/top corner plus extent).
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[inline]
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left
            && p.x <= self.left + self.width
            && p.y >= self.top
            && p.y <= self.top + self.height
    }

    /// Smallest rectangle covering both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = (self.left + self.width).max(other.left + other.width);
        let bottom = (self.top + self.height).max(other.top + other.height);
        Rect::new(left, top, right - left, bottom - top)
    }
}

/// The authored components of a 2D transform: position, pivot (origin),
/// non-uniform scale and rotation in degrees.
///
/// Used both for bind poses and for keyframe deltas. When it holds a delta,
/// position/origin/rotation are additive offsets and scale is a multiplier.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct TransformSpec {
    #[serde(default)]
    pub position: Vec2,
    #[serde(default)]
    pub origin: Vec2,
    #[serde(default = "scale_one")]
    pub scale: Vec2,
    /// Degrees.
    #[serde(default)]
    pub rotation: f32,
}

fn scale_one() -> Vec2 {
    Vec2::ONE
}

impl Default for TransformSpec {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TransformSpec {
    pub const IDENTITY: TransformSpec = TransformSpec {
        position: Vec2::ZERO,
        origin: Vec2::ZERO,
        scale: Vec2::ONE,
        rotation: 0.0,
    };

    /// Apply a delta on top of a bind pose: position/origin/rotation add,
    /// scale multiplies component-wise.
    pub fn combined_with(&self, delta: &TransformSpec) -> TransformSpec {
        TransformSpec {
            position: self.position + delta.position,
            origin: self.origin + delta.origin,
            scale: Vec2::new(self.scale.x * delta.scale.x, self.scale.y * delta.scale.y),
            rotation: self.rotation + delta.rotation,
        }
    }

    /// Component-wise interpolation between two specs (used for crossfading
    /// per-bone deltas; scale lerps its multiplier, not a matrix).
    pub fn lerp(a: &TransformSpec, b: &TransformSpec, t: f32) -> TransformSpec {
        TransformSpec {
            position: lerp_vec2(a.position, b.position, t),
            origin: lerp_vec2(a.origin, b.origin, t),
            scale: lerp_vec2(a.scale, b.scale, t),
            rotation: lerp_f32(a.rotation, b.rotation, t),
        }
    }

    /// Build the local matrix: `translate(position) · rotate(rotation) ·
    /// scale(scale) · translate(-origin)`.
    pub fn matrix(&self) -> Transform2 {
        let rad = self.rotation.to_radians();
        let (sin, cos) = rad.sin_cos();
        let a = cos * self.scale.x;
        let b = -sin * self.scale.y;
        let c = sin * self.scale.x;
        let d = cos * self.scale.y;
        Transform2 {
            m: [
                a,
                b,
                -self.origin.x * a - self.origin.y * b + self.position.x,
                c,
                d,
                -self.origin.x * c - self.origin.y * d + self.position.y,
            ],
        }
    }
}

/// 2D affine matrix, row-major `[a b tx; c d ty]`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Transform2 {
    pub m: [f32; 6],
}

impl Default for Transform2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2 {
    pub const IDENTITY: Transform2 = Transform2 {
        m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
    };

    /// Matrix composition: `self` applied after `rhs` (`self ∘ rhs`).
    pub fn compose(&self, rhs: &Transform2) -> Transform2 {
        let a = &self.m;
        let b = &rhs.m;
        Transform2 {
            m: [
                a[0] * b[0] + a[1] * b[3],
                a[0] * b[1] + a[1] * b[4],
                a[0] * b[2] + a[1] * b[5] + a[2],
                a[3] * b[0] + a[4] * b[3],
                a[3] * b[1] + a[4] * b[4],
                a[3] * b[2] + a[4] * b[5] + a[5],
            ],
        }
    }

    #[inline]
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.m[0] * p.x + self.m[1] * p.y + self.m[2],
            self.m[3] * p.x + self.m[4] * p.y + self.m[5],
        )
    }

    /// Axis-aligned bounds of a rectangle mapped through this transform.
    pub fn transform_rect(&self, r: Rect) -> Rect {
        let corners = [
            self.transform_point(Vec2::new(r.left, r.top)),
            self.transform_point(Vec2::new(r.left + r.width, r.top)),
            self.transform_point(Vec2::new(r.left, r.top + r.height)),
            self.transform_point(Vec2::new(r.left + r.width, r.top + r.height)),
        ];
        let mut min = corners[0];
        let mut max = corners[0];
        for c in &corners[1..] {
            min.x = min.x.min(c.x);
            min.y = min.y.min(c.y);
            max.x = max.x.max(c.x);
            max.y = max.y.max(c.y);
        }
        Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }
}

impl std::ops::Mul for Transform2 {
    type Output = Transform2;

    fn mul(self, rhs: Transform2) -> Transform2 {
        self.compose(&rhs)
    }
}
