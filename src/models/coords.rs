//! # 坐标变换模块
//!
//! 原子位置在分数坐标（晶格坐标）与笛卡尔坐标之间的相互转换。
//! 分数坐标视为行向量，右乘晶格矩阵得到笛卡尔坐标。
//!
//! ## 依赖关系
//! - 被 `models/atoms.rs`, `symmetry.rs`, `parsers/` 使用
//! - 使用 `models/lattice.rs`, `error.rs`

use crate::error::{Result, VaspectError};
use crate::models::lattice::{Lattice, DET_EPSILON};

/// 分数坐标 -> 笛卡尔坐标：cart = frac · H
pub fn to_cartesian(fractional: &[[f64; 3]], lattice: &Lattice) -> Vec<[f64; 3]> {
    fractional
        .iter()
        .map(|f| row_times_matrix(f, &lattice.matrix))
        .collect()
}

/// 笛卡尔坐标 -> 分数坐标：frac = cart · H⁻¹
///
/// 晶格矩阵不可逆时返回 `SingularLattice`，绝不产生无穷值。
pub fn to_fractional(cartesian: &[[f64; 3]], lattice: &Lattice) -> Result<Vec<[f64; 3]>> {
    let inv = invert(&lattice.matrix)?;
    Ok(cartesian
        .iter()
        .map(|c| row_times_matrix(c, &inv))
        .collect())
}

/// 行向量乘以 3x3 矩阵
fn row_times_matrix(v: &[f64; 3], m: &[[f64; 3]; 3]) -> [f64; 3] {
    [
        v[0] * m[0][0] + v[1] * m[1][0] + v[2] * m[2][0],
        v[0] * m[0][1] + v[1] * m[1][1] + v[2] * m[2][1],
        v[0] * m[0][2] + v[1] * m[1][2] + v[2] * m[2][2],
    ]
}

/// 3x3 矩阵求逆（伴随矩阵法）
fn invert(m: &[[f64; 3]; 3]) -> Result<[[f64; 3]; 3]> {
    let det = m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]);

    if det.abs() < DET_EPSILON {
        return Err(VaspectError::SingularLattice);
    }

    Ok([
        [
            (m[1][1] * m[2][2] - m[1][2] * m[2][1]) / det,
            (m[0][2] * m[2][1] - m[0][1] * m[2][2]) / det,
            (m[0][1] * m[1][2] - m[0][2] * m[1][1]) / det,
        ],
        [
            (m[1][2] * m[2][0] - m[1][0] * m[2][2]) / det,
            (m[0][0] * m[2][2] - m[0][2] * m[2][0]) / det,
            (m[0][2] * m[1][0] - m[0][0] * m[1][2]) / det,
        ],
        [
            (m[1][0] * m[2][1] - m[1][1] * m[2][0]) / det,
            (m[0][1] * m[2][0] - m[0][0] * m[2][1]) / det,
            (m[0][0] * m[1][1] - m[0][1] * m[1][0]) / det,
        ],
    ])
}
