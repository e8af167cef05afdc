use core::ops::Mul;

use super::vec::{Vec3, Vec4};

macro_rules! square_matrix {
    ($m:ident, $v:ident, $n:literal) => {
        /// Row-major square matrix: `e[row][col]`.
        #[derive(Debug, Copy, Clone, Default, PartialEq)]
        pub struct $m {
            pub e: [[f32; $n]; $n],
        }

        impl $m {
            #[inline]
            pub const fn from_rows(e: [[f32; $n]; $n]) -> Self {
                Self { e }
            }

            pub fn identity() -> Self {
                let mut m = Self::default();
                for i in 0..$n {
                    m.e[i][i] = 1.0;
                }
                m
            }

            #[inline]
            pub fn row(&self, r: usize) -> $v {
                $v::from(self.e[r])
            }

            /// Extracts column `c` as a vector.
            pub fn column(&self, c: usize) -> $v {
                let mut col = [0.0; $n];
                for (r, slot) in col.iter_mut().enumerate() {
                    *slot = self.e[r][c];
                }
                $v::from(col)
            }

            pub fn transpose(&self) -> Self {
                let mut m = Self::default();
                for r in 0..$n {
                    for c in 0..$n {
                        m.e[c][r] = self.e[r][c];
                    }
                }
                m
            }

            /// `result[r][c] = dot(row r of self, column c of rhs)`.
            pub fn mat_mul(&self, rhs: &Self) -> Self {
                let mut m = Self::default();
                for r in 0..$n {
                    let row = self.row(r);
                    for c in 0..$n {
                        m.e[r][c] = row.dot(rhs.column(c));
                    }
                }
                m
            }
        }

        impl Mul for $m {
            type Output = $m;
            #[inline]
            fn mul(self, rhs: $m) -> $m {
                self.mat_mul(&rhs)
            }
        }
    };
}

square_matrix!(Mat3, Vec3, 3);
square_matrix!(Mat4, Vec4, 4);

impl Mat4 {
    /// Embeds a 3×3 block in the upper-left corner and a translation in the
    /// fourth row.
    pub fn from_rotation_translation(rotation: &Mat3, translation: Vec3) -> Self {
        let r = &rotation.e;
        Self::from_rows([
            [r[0][0], r[0][1], r[0][2], 0.0],
            [r[1][0], r[1][1], r[1][2], 0.0],
            [r[2][0], r[2][1], r[2][2], 0.0],
            [translation.x, translation.y, translation.z, 1.0],
        ])
    }

    /// Upper-left 3×3 block.
    pub fn upper_left(&self) -> Mat3 {
        let e = &self.e;
        Mat3::from_rows([
            [e[0][0], e[0][1], e[0][2]],
            [e[1][0], e[1][1], e[1][2]],
            [e[2][0], e[2][1], e[2][2]],
        ])
    }

    /// Transforms `p` as the homogeneous row vector `(x, y, z, 1)` and returns
    /// the first three components. No homogeneous divide is applied.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let pp = p.extend(1.0);
        Vec3::new(
            pp.dot(self.column(0)),
            pp.dot(self.column(1)),
            pp.dot(self.column(2)),
        )
    }

    /// Rows concatenated in order. This is the layout the shaders expect for
    /// the per-frame matrix uniform.
    pub fn to_rows_array(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        for (r, row) in self.e.iter().enumerate() {
            out[r * 4..r * 4 + 4].copy_from_slice(row);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn assert_mat4_near(a: &Mat4, b: &Mat4) {
        for r in 0..4 {
            for c in 0..4 {
                assert_abs_diff_eq!(a.e[r][c], b.e[r][c], epsilon = 1e-4);
            }
        }
    }

    fn sample(seed: f32) -> Mat4 {
        let mut m = Mat4::default();
        for r in 0..4 {
            for c in 0..4 {
                m.e[r][c] = ((r * 4 + c) as f32 * 0.37 + seed).sin() * 2.0;
            }
        }
        m
    }

    #[test]
    fn column_extraction() {
        let m = Mat3::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        assert_eq!(m.column(1), Vec3::new(2.0, 5.0, 8.0));
        assert_eq!(m.row(2), Vec3::new(7.0, 8.0, 9.0));
    }

    #[test]
    fn mat_mul_row_times_column() {
        let a = Mat3::from_rows([[1.0, 2.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        let b = Mat3::from_rows([[1.0, 0.0, 0.0], [3.0, 1.0, 0.0], [0.0, 0.0, 2.0]]);
        let ab = a * b;
        assert_eq!(ab.e[0], [7.0, 2.0, 0.0]);
        assert_eq!(ab.e[2], [0.0, 0.0, 2.0]);
    }

    #[test]
    fn identity_is_neutral() {
        let m = sample(0.5);
        assert_eq!(m * Mat4::identity(), m);
        assert_eq!(Mat4::identity() * m, m);
    }

    #[test]
    fn mat_mul_is_associative() {
        let (a, b, c) = (sample(0.1), sample(1.3), sample(2.7));
        assert_mat4_near(&((a * b) * c), &(a * (b * c)));
    }

    #[test]
    fn transform_point_identity() {
        let p = Vec3::new(3.0, -1.0, 0.5);
        assert_eq!(Mat4::identity().transform_point(p), p);
    }

    #[test]
    fn transform_point_applies_translation_row() {
        let m = Mat4::from_rotation_translation(&Mat3::identity(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.transform_point(Vec3::zero()), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn rows_array_is_row_major() {
        let m = sample(0.9);
        let flat = m.to_rows_array();
        assert_eq!(flat[4..8], m.e[1]);
        assert_eq!(flat[12..16], m.e[3]);
    }

    #[test]
    fn transpose_twice_roundtrips() {
        let m = sample(3.3);
        assert_eq!(m.transpose().transpose(), m);
        assert_eq!(m.transpose().e[0][3], m.e[3][0]);
    }
}
