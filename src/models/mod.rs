//! # 数据模型模块
//!
//! 晶格几何、坐标变换与原子集合的统一数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `neighbors/`, `symmetry.rs`, `commands/` 使用
//! - 子模块: lattice, coords, atoms, structure

pub mod atoms;
pub mod coords;
pub mod lattice;
pub mod structure;

pub use atoms::{AtomSet, Positions, SpeciesSpec};
pub use lattice::{CellParameters, Lattice};
pub use structure::StructureModel;
