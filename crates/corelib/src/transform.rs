use crate::error::{CoreError, CoreResult};
use crate::{Mat3, Vec3};

/// Position, non-uniform scale and pitch/yaw/roll rotation of one node.
///
/// The rotation basis is cached state derived from the three angles; every
/// angle setter rebuilds it in full, so it can never lag behind the angles.
/// Axes follow the view convention used by the rasterizer: +x right, +y up,
/// +z forward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    scale: Vec3,
    pitch: f32,
    yaw: f32,
    roll: f32,
    /// Columns are right / up / forward.
    basis: Mat3,
    inverse_basis: Mat3,
}

impl Transform {
    #[inline]
    pub const fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            pitch: 0.0,
            yaw: 0.0,
            roll: 0.0,
            basis: Mat3::IDENTITY,
            inverse_basis: Mat3::IDENTITY,
        }
    }

    #[inline]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Angles are `(pitch, yaw, roll)` in radians.
    pub fn from_trs(position: Vec3, angles: Vec3, scale: Vec3) -> CoreResult<Self> {
        let mut t = Self::from_position(position);
        t.set_scale(scale)?;
        t.set_rotation(angles.x, angles.y, angles.z);
        Ok(t)
    }

    #[inline]
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Rejects zero, negative or non-finite components; `from_parent`
    /// divides by them.
    pub fn set_scale(&mut self, scale: Vec3) -> CoreResult<()> {
        if !scale.is_finite() || scale.min_element() <= 0.0 {
            return Err(CoreError::InvalidScale { scale });
        }
        self.scale = scale;
        Ok(())
    }

    #[inline]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[inline]
    pub fn roll(&self) -> f32 {
        self.roll
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.set_rotation(pitch, self.yaw, self.roll);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.set_rotation(self.pitch, yaw, self.roll);
    }

    pub fn set_roll(&mut self, roll: f32) {
        self.set_rotation(self.pitch, self.yaw, roll);
    }

    pub fn set_rotation(&mut self, pitch: f32, yaw: f32, roll: f32) {
        self.pitch = pitch;
        self.yaw = yaw;
        self.roll = roll;
        self.basis = rotation_basis(pitch, yaw, roll);
        self.inverse_basis = self.basis.transpose();
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.basis.x_axis
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.basis.y_axis
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.basis.z_axis
    }

    /// Local point into the parent's space: scale, rotate, translate.
    #[inline]
    pub fn to_parent(&self, local: Vec3) -> Vec3 {
        self.basis * (local * self.scale) + self.position
    }

    /// Exact inverse of [`Transform::to_parent`].
    #[inline]
    pub fn from_parent(&self, point: Vec3) -> Vec3 {
        debug_assert!(self.scale.min_element() > 0.0);
        (self.inverse_basis * (point - self.position)) / self.scale
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Yaw and pitch are composed first, roll is applied on top.
fn rotation_basis(pitch: f32, yaw: f32, roll: f32) -> Mat3 {
    let (sy, cy) = yaw.sin_cos();
    let (sp, cp) = pitch.sin_cos();
    let (sr, cr) = roll.sin_cos();

    let yaw_m = Mat3::from_cols(
        Vec3::new(cy, 0.0, sy),
        Vec3::Y,
        Vec3::new(-sy, 0.0, cy),
    );
    let pitch_m = Mat3::from_cols(
        Vec3::X,
        Vec3::new(0.0, cp, -sp),
        Vec3::new(0.0, sp, cp),
    );
    let roll_m = Mat3::from_cols(
        Vec3::new(cr, sr, 0.0),
        Vec3::new(-sr, cr, 0.0),
        Vec3::Z,
    );

    yaw_m * pitch_m * roll_m
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn close(a: Vec3, b: Vec3) -> bool {
        a.abs_diff_eq(b, 1e-5)
    }

    #[test]
    fn identity_leaves_points_alone() {
        let t = Transform::identity();
        let p = Vec3::new(1.0, -2.0, 3.0);
        assert_eq!(t.to_parent(p), p);
        assert_eq!(t.from_parent(p), p);
    }

    #[test]
    fn yaw_turns_forward_towards_right() {
        let mut t = Transform::identity();
        t.set_yaw(FRAC_PI_2);
        assert!(close(t.forward(), Vec3::new(-1.0, 0.0, 0.0)));
        assert!(close(t.right(), Vec3::new(0.0, 0.0, 1.0)));
        assert!(close(t.up(), Vec3::Y));
    }

    #[test]
    fn basis_follows_every_angle_setter() {
        let mut t = Transform::identity();
        t.set_pitch(0.3);
        t.set_roll(-1.1);
        t.set_yaw(2.0);
        let expected = rotation_basis(0.3, 2.0, -1.1);
        assert_eq!(t.basis, expected);
        assert_eq!(t.inverse_basis, expected.transpose());
        assert!((t.pitch() - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn basis_is_orthonormal() {
        let mut t = Transform::identity();
        t.set_rotation(0.7, -1.3, 2.2);
        let (r, u, f) = (t.right(), t.up(), t.forward());
        assert!((r.length() - 1.0).abs() < 1e-5);
        assert!((u.length() - 1.0).abs() < 1e-5);
        assert!(r.dot(u).abs() < 1e-5);
        assert!(close(r.cross(u), f));
    }

    #[test]
    fn from_parent_inverts_to_parent() {
        let t = Transform::from_trs(
            Vec3::new(4.0, -1.0, 9.0),
            Vec3::new(0.4, 1.2, -0.5),
            Vec3::new(2.0, 0.5, 3.0),
        )
        .expect("valid scale");
        let p = Vec3::new(-0.3, 2.5, 1.75);
        assert!(close(t.from_parent(t.to_parent(p)), p));
    }

    #[test]
    fn scale_is_applied_before_rotation() {
        let mut t = Transform::identity();
        t.set_scale(Vec3::new(2.0, 1.0, 1.0)).expect("valid scale");
        t.set_yaw(FRAC_PI_2);
        // Local +x is stretched, then rotated onto parent +z.
        assert!(close(t.to_parent(Vec3::X), Vec3::new(0.0, 0.0, 2.0)));
    }

    #[test]
    fn non_positive_scale_is_rejected() {
        let mut t = Transform::identity();
        for bad in [
            Vec3::new(0.0, 1.0, 1.0),
            Vec3::new(1.0, -2.0, 1.0),
            Vec3::new(1.0, 1.0, f32::NAN),
        ] {
            assert!(matches!(
                t.set_scale(bad),
                Err(CoreError::InvalidScale { .. })
            ));
        }
        assert_eq!(t.scale(), Vec3::ONE);
    }
}
