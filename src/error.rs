//! # 统一错误处理模块
//!
//! 定义 vaspect 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// vaspect 统一错误类型
#[derive(Error, Debug)]
pub enum VaspectError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Malformed structure file: {path} (line {line})\nReason: {reason}")]
    MalformedRecord {
        path: String,
        line: usize,
        reason: String,
    },

    // ─────────────────────────────────────────────────────────────
    // 几何错误
    // ─────────────────────────────────────────────────────────────
    #[error("Lattice matrix is singular (determinant within epsilon of zero)")]
    SingularLattice,

    #[error("No bonds found within {rcut:.2} A after {attempts} growth attempts")]
    NoBondsFound { rcut: f64, attempts: usize },

    // ─────────────────────────────────────────────────────────────
    // 对称性分析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Symmetry analysis failed: {reason}")]
    SymmetryAnalysis { reason: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, VaspectError>;
