//! # inspect 子命令 CLI 定义
//!
//! 默认打印全部区段；给出任一区段开关后只打印选中的区段。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/inspect.rs`

use clap::Args;
use std::path::PathBuf;

/// inspect 子命令参数
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input POSCAR/CONTCAR structure file
    pub file: PathBuf,

    /// Print atomic scale info: totals, species, masses, density
    #[arg(short = 'a', long = "atoms")]
    pub print_atoms: bool,

    /// Print bonding info: bond count, search radius, minimum pair
    #[arg(short = 'b', long = "bonds")]
    pub print_bonds: bool,

    /// Print unit cell info: vectors, angles, volume, symmetry
    #[arg(short = 'c', long = "cell")]
    pub print_cell: bool,

    /// Print bonding info plus the full nearest-neighbor listing
    #[arg(short = 'n', long = "neighbors")]
    pub print_neighbors: bool,

    /// Neighbor search radius in Angstrom; 0 grows adaptively until a bond is found
    #[arg(short = 'r', long = "radius", default_value_t = 0.0)]
    pub radius: f64,

    /// Save reports to <compound>.{cell,atoms,bonds} instead of stdout
    #[arg(short = 's', long = "save")]
    pub save: bool,

    /// Symmetry detection tolerance in Cartesian coordinates (Angstrom)
    #[arg(short = 't', long = "tolerance", default_value_t = 0.05)]
    pub tolerance: f64,
}

impl InspectArgs {
    /// 未选择任何区段时打印全部区段
    pub fn wants_everything(&self) -> bool {
        !(self.print_atoms || self.print_bonds || self.print_cell || self.print_neighbors)
    }
}
