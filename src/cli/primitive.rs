//! # primitive 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/primitive.rs`

use clap::Args;
use std::path::PathBuf;

/// primitive 子命令参数
#[derive(Args, Debug)]
pub struct PrimitiveArgs {
    /// Input POSCAR/CONTCAR structure file
    pub file: PathBuf,

    /// Symmetry detection tolerance in Cartesian coordinates (Angstrom)
    #[arg(short = 't', long = "tolerance", default_value_t = 0.05)]
    pub tolerance: f64,

    /// Output path; defaults to <compound>-primitive.vasp
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}
