use core::ops::Mul;

use super::Vec2;

/// 3x3 matrix for 2D affine transforms, row-major, column-vector convention.
///
/// `a * b` applies `b` first, then `a`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Matrix3 {
    pub m: [[f32; 3]; 3],
}

impl Matrix3 {
    pub const IDENTITY: Matrix3 = Matrix3 {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    #[inline]
    pub const fn translation(x: f32, y: f32) -> Self {
        Self {
            m: [[1.0, 0.0, x], [0.0, 1.0, y], [0.0, 0.0, 1.0]],
        }
    }

    #[inline]
    pub const fn scale(sx: f32, sy: f32) -> Self {
        Self {
            m: [[sx, 0.0, 0.0], [0.0, sy, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Rotation by `radians`; positive turns clockwise on screen (+Y down).
    pub fn rotation(radians: f32) -> Self {
        let (s, c) = radians.sin_cos();
        Self {
            m: [[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Scale and rotate around `origin`, then place `origin` at `position`.
    pub fn sprite_transform(position: Vec2, origin: Vec2, scale: Vec2, radians: f32) -> Self {
        Self::translation(position.x, position.y)
            * Self::rotation(radians)
            * Self::scale(scale.x, scale.y)
            * Self::translation(-origin.x, -origin.y)
    }

    #[inline]
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        let m = &self.m;
        Vec2::new(
            m[0][0] * p.x + m[0][1] * p.y + m[0][2],
            m[1][0] * p.x + m[1][1] * p.y + m[1][2],
        )
    }

    /// Applies only the linear part (no translation).
    #[inline]
    pub fn transform_vector(&self, v: Vec2) -> Vec2 {
        let m = &self.m;
        Vec2::new(m[0][0] * v.x + m[0][1] * v.y, m[1][0] * v.x + m[1][1] * v.y)
    }

    pub fn determinant(&self) -> f32 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Inverse, or `None` for a singular matrix.
    pub fn inverse(&self) -> Option<Matrix3> {
        let det = self.determinant();
        if det.abs() <= f32::EPSILON {
            return None;
        }
        let m = &self.m;
        let inv = 1.0 / det;
        let mut r = [[0.0f32; 3]; 3];
        r[0][0] = (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv;
        r[0][1] = (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv;
        r[0][2] = (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv;
        r[1][0] = (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv;
        r[1][1] = (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv;
        r[1][2] = (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv;
        r[2][0] = (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv;
        r[2][1] = (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv;
        r[2][2] = (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv;
        Some(Matrix3 { m: r })
    }
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Matrix3 {
    type Output = Matrix3;

    fn mul(self, rhs: Matrix3) -> Matrix3 {
        let mut r = [[0.0f32; 3]; 3];
        for (i, row) in r.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.m[i][k] * rhs.m[k][j]).sum();
            }
        }
        Matrix3 { m: r }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5
    }

    #[test]
    fn identity_keeps_point() {
        let p = Vec2::new(3.0, -7.0);
        assert_eq!(Matrix3::identity().transform_point(p), p);
    }

    #[test]
    fn multiply_applies_right_operand_first() {
        let m = Matrix3::translation(10.0, 0.0) * Matrix3::scale(2.0, 2.0);
        assert_eq!(m.transform_point(Vec2::new(1.0, 1.0)), Vec2::new(12.0, 2.0));
    }

    #[test]
    fn quarter_turn_maps_x_to_y() {
        let m = Matrix3::rotation(core::f32::consts::FRAC_PI_2);
        assert!(approx(m.transform_point(Vec2::new(1.0, 0.0)), Vec2::new(0.0, 1.0)));
    }

    #[test]
    fn sprite_transform_pins_origin_to_position() {
        let m = Matrix3::sprite_transform(
            Vec2::new(100.0, 50.0),
            Vec2::new(8.0, 8.0),
            Vec2::new(3.0, 3.0),
            0.7,
        );
        assert!(approx(m.transform_point(Vec2::new(8.0, 8.0)), Vec2::new(100.0, 50.0)));
    }

    #[test]
    fn inverse_round_trips() {
        let m = Matrix3::sprite_transform(Vec2::new(5.0, 6.0), Vec2::zero(), Vec2::new(2.0, 0.5), 1.1);
        let inv = m.inverse().unwrap();
        let p = Vec2::new(-4.0, 9.0);
        assert!(approx(inv.transform_point(m.transform_point(p)), p));
    }

    #[test]
    fn singular_has_no_inverse() {
        assert!(Matrix3::scale(0.0, 1.0).inverse().is_none());
    }
}
