//! # 解析器模块
//!
//! 结构文件的读取与写出。POSCAR/CONTCAR 是唯一支持的格式，
//! 任意文件名（如 sns2.vasp, mos2.contcar）都按该布局解析。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: poscar

pub mod poscar;

use crate::error::{Result, VaspectError};
use std::path::Path;

pub use poscar::{parse_poscar_content, parse_poscar_file, to_poscar_string, PoscarFile};

/// 解析结构文件
pub fn parse_structure_file(path: &Path) -> Result<PoscarFile> {
    if !path.exists() {
        return Err(VaspectError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    poscar::parse_poscar_file(path)
}
