//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `inspect`: 检查结构文件，按需打印晶胞/原子/键/近邻报告
//! - `primitive`: 约化到原胞并写出 POSCAR
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: inspect, primitive

pub mod inspect;
pub mod primitive;

use clap::{Parser, Subcommand};

/// vaspect - POSCAR/CONTCAR 结构检查工具
#[derive(Parser)]
#[command(name = "vaspect")]
#[command(version)]
#[command(about = "Inspect POSCAR/CONTCAR structure files: cell, atoms, bonds, symmetry", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Inspect a structure file and report cell, atoms, bonds and neighbors
    Inspect(inspect::InspectArgs),

    /// Reduce the conventional cell to a primitive cell and write it as POSCAR
    Primitive(primitive::PrimitiveArgs),
}
