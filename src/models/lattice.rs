//! # 晶格几何模块
//!
//! 从 3x3 晶格矩阵（行向量为胞轴 a1, a2, a3）导出标量晶胞参数：
//! 边长 a/b/c、轴间角 alpha/beta/gamma、体积。
//!
//! ## 依赖关系
//! - 被 `models/` 其余模块、`neighbors/`、`symmetry.rs` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};

/// 奇异矩阵判定阈值
pub const DET_EPSILON: f64 = 1e-10;

/// 晶格：3x3 矩阵，行向量表示胞轴
/// [[a1x, a1y, a1z], [a2x, a2y, a2z], [a3x, a3y, a3z]]
///
/// 构造后不可变；整体缩放通过 `rescale` 返回新晶格。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lattice {
    pub matrix: [[f64; 3]; 3],
}

/// 晶胞标量参数
///
/// 角度为弧度制，范围 (0, π)。体积由六个标量经 Gram 公式计算，
/// 不重新取矩阵行列式。
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CellParameters {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub volume: f64,
}

impl Lattice {
    /// 从晶格向量矩阵创建
    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Self {
        Lattice { matrix }
    }

    /// 三个胞轴
    pub fn axes(&self) -> (&[f64; 3], &[f64; 3], &[f64; 3]) {
        (&self.matrix[0], &self.matrix[1], &self.matrix[2])
    }

    /// 导出晶胞参数
    ///
    /// alpha = angle(a2, a3), beta = angle(a1, a3), gamma = angle(a1, a2)
    pub fn cell_parameters(&self) -> CellParameters {
        let (a1, a2, a3) = self.axes();

        let a = norm(a1);
        let b = norm(a2);
        let c = norm(a3);

        let alpha = angle_between(a2, a3);
        let beta = angle_between(a1, a3);
        let gamma = angle_between(a1, a2);

        let volume = cell_volume(a, b, c, alpha, beta, gamma);

        CellParameters {
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
            volume,
        }
    }

    /// 整体缩放：每个轴向量的每个分量乘以 `factor`
    ///
    /// 纯函数，不修改自身；晶胞参数须由调用方从新晶格重新导出。
    pub fn rescale(&self, factor: f64) -> Lattice {
        let mut matrix = self.matrix;
        for row in matrix.iter_mut() {
            for x in row.iter_mut() {
                *x *= factor;
            }
        }
        Lattice { matrix }
    }

    /// 矩阵行列式
    pub fn determinant(&self) -> f64 {
        let m = &self.matrix;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// 是否奇异（不可求逆）
    pub fn is_singular(&self) -> bool {
        self.determinant().abs() < DET_EPSILON
    }
}

/// 向量欧几里得范数
fn norm(v: &[f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

/// 两向量夹角（弧度）
///
/// 余弦值钳制到 [-1, 1]：浮点误差可能使其略微越界，
/// acos 此时必须饱和到 0 或 π 而不是产生 NaN。
fn angle_between(u: &[f64; 3], v: &[f64; 3]) -> f64 {
    let dot = u[0] * v[0] + u[1] * v[1] + u[2] * v[2];
    let cos = dot / (norm(u) * norm(v));
    cos.clamp(-1.0, 1.0).acos()
}

/// Gram 公式体积：a*b*c*sqrt(1 - cos²α - cos²β - cos²γ + 2 cosα cosβ cosγ)
///
/// 近退化晶胞的根式可能因浮点误差略微为负，钳制到 0 再开方。
fn cell_volume(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> f64 {
    let ca = alpha.cos();
    let cb = beta.cos();
    let cg = gamma.cos();

    let radicand = 1.0 - ca * ca - cb * cb - cg * cg + 2.0 * ca * cb * cg;
    a * b * c * radicand.max(0.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_cubic_parameters() {
        let lattice =
            Lattice::from_vectors([[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]]);
        let p = lattice.cell_parameters();

        assert!((p.a - 5.0).abs() < 1e-12);
        assert!((p.b - 5.0).abs() < 1e-12);
        assert!((p.c - 5.0).abs() < 1e-12);
        assert!((p.alpha - PI / 2.0).abs() < 1e-12);
        assert!((p.beta - PI / 2.0).abs() < 1e-12);
        assert!((p.gamma - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_cubic_volume_is_abc() {
        let lattice =
            Lattice::from_vectors([[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]]);
        let p = lattice.cell_parameters();

        // 立方晶胞：volume == a*b*c
        assert!((p.volume - 125.0).abs() < 1e-9);
    }

    #[test]
    fn test_hexagonal_gamma() {
        // a = b = 3, c = 5, gamma = 120°
        let half = 3.0 * (PI / 3.0).cos();
        let height = 3.0 * (PI / 3.0).sin();
        let lattice =
            Lattice::from_vectors([[3.0, 0.0, 0.0], [-half, height, 0.0], [0.0, 0.0, 5.0]]);
        let p = lattice.cell_parameters();

        assert!((p.a - 3.0).abs() < 1e-9);
        assert!((p.b - 3.0).abs() < 1e-9);
        assert!((p.gamma - 2.0 * PI / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_collinear_axes_angle_saturates() {
        // 平行轴的夹角钳制为 0，反平行为 π，均不得产生 NaN
        let lattice =
            Lattice::from_vectors([[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [-3.0, 0.0, 0.0]]);
        let p = lattice.cell_parameters();

        assert!((p.gamma - 0.0).abs() < 1e-12);
        assert!((p.beta - PI).abs() < 1e-12);
        assert!(!p.volume.is_nan());
        assert!(p.volume.abs() < 1e-9);
    }

    #[test]
    fn test_rescale_recomputes_parameters() {
        let lattice =
            Lattice::from_vectors([[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]]);
        let scaled = lattice.rescale(1.5);
        let p = scaled.cell_parameters();

        assert!((p.a - 3.0).abs() < 1e-12);
        assert!((p.volume - 27.0).abs() < 1e-9);
        // 原晶格不受影响
        assert!((lattice.matrix[0][0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_determinant_and_singularity() {
        let cubic =
            Lattice::from_vectors([[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]]);
        assert!((cubic.determinant() - 8.0).abs() < 1e-12);
        assert!(!cubic.is_singular());

        let flat =
            Lattice::from_vectors([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]]);
        assert!(flat.is_singular());
    }
}
