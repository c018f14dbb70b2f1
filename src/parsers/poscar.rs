//! # VASP POSCAR 格式解析器
//!
//! 解析与写出 VASP POSCAR/CONTCAR 文件格式。
//!
//! ## POSCAR 格式说明
//! ```text
//! Comment line (structure name)
//! 1.0                    # scaling factor
//! a1 a2 a3               # lattice vector a
//! b1 b2 b3               # lattice vector b
//! c1 c2 c3               # lattice vector c
//! Element1 Element2 ...  # element symbols (VASP 5+)
//! n1 n2 ...              # number of atoms per element
//! Selective dynamics     # optional
//! Direct/Cartesian       # coordinate type ('c'/'k' => Cartesian)
//! x1 y1 z1               # atom positions
//! ...
//! ```
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/`, `error.rs`

use crate::error::{Result, VaspectError};
use crate::models::{Lattice, Positions};
use std::fs;
use std::path::Path;

/// 解析结果：基矢已按比例因子缩放，位置保持输入表示（带标记）
#[derive(Debug, Clone)]
pub struct PoscarFile {
    /// 注释行（为空时取文件名）
    pub comment: String,
    /// 均匀比例因子
    pub scale: f64,
    /// 已缩放的晶格
    pub lattice: Lattice,
    /// 原子位置；笛卡尔输入同样已按比例因子缩放
    pub positions: Positions,
    /// 逐原子元素符号（按计数展开）
    pub symbols: Vec<String>,
    /// 每物种原子数
    pub counts: Vec<usize>,
}

/// 解析 POSCAR/CONTCAR 文件
pub fn parse_poscar_file(path: &Path) -> Result<PoscarFile> {
    let content = fs::read_to_string(path).map_err(|e| VaspectError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_poscar_content(
        &content,
        path.file_name().and_then(|s| s.to_str()).unwrap_or("POSCAR"),
    )
}

/// 从字符串内容解析 POSCAR 格式
///
/// `name` 仅用于错误消息与空注释行的回退名称。
pub fn parse_poscar_content(content: &str, name: &str) -> Result<PoscarFile> {
    let lines: Vec<&str> = content.lines().collect();

    if lines.len() < 8 {
        return Err(VaspectError::MalformedRecord {
            path: name.to_string(),
            line: lines.len(),
            reason: "File too short for POSCAR layout".to_string(),
        });
    }

    // Line 0: 注释/名称
    let comment = {
        let c = lines[0].trim();
        if c.is_empty() {
            name.to_string()
        } else {
            c.to_string()
        }
    };

    // Line 1: 比例因子
    let scale: f64 = lines[1]
        .trim()
        .parse()
        .map_err(|_| VaspectError::MalformedRecord {
            path: name.to_string(),
            line: 2,
            reason: format!("Invalid scale factor: '{}'", lines[1].trim()),
        })?;

    // Lines 2-4: 晶格向量，随后整体缩放
    let mut matrix = [[0.0; 3]; 3];
    for i in 0..3 {
        matrix[i] = parse_vec3(lines[2 + i]).ok_or_else(|| VaspectError::MalformedRecord {
            path: name.to_string(),
            line: 3 + i,
            reason: "Lattice vector needs 3 numeric components".to_string(),
        })?;
    }
    let lattice = Lattice::from_vectors(matrix).rescale(scale);

    // Line 5: 元素符号行 (VASP 5+) 或原子计数行 (VASP 4)
    let line5: Vec<&str> = lines[5].split_whitespace().collect();
    if line5.is_empty() {
        return Err(VaspectError::MalformedRecord {
            path: name.to_string(),
            line: 6,
            reason: "Empty species/count line".to_string(),
        });
    }

    let (species, counts, mut cursor) = if line5[0].parse::<usize>().is_ok() {
        // VASP 4：无符号行，用占位物种名
        let counts = parse_counts(lines[5], name, 6)?;
        let species: Vec<String> = (0..counts.len()).map(|i| format!("X{}", i + 1)).collect();
        (species, counts, 6)
    } else {
        let species: Vec<String> = line5.iter().map(|s| s.to_string()).collect();
        let counts = parse_counts(lines[6], name, 7)?;
        (species, counts, 7)
    };

    if species.len() != counts.len() {
        return Err(VaspectError::MalformedRecord {
            path: name.to_string(),
            line: cursor,
            reason: format!(
                "{} species but {} counts",
                species.len(),
                counts.len()
            ),
        });
    }

    // 可选的 "Selective dynamics" 行
    if lines
        .get(cursor)
        .map(|l| l.trim_start().to_lowercase().starts_with('s'))
        .unwrap_or(false)
    {
        cursor += 1;
    }

    // 坐标模式行：首字符 'c'/'k'（不区分大小写）为笛卡尔，其余为分数
    let mode = lines
        .get(cursor)
        .ok_or_else(|| VaspectError::MalformedRecord {
            path: name.to_string(),
            line: cursor + 1,
            reason: "Missing coordinate mode line".to_string(),
        })?;
    let is_cartesian = matches!(
        mode.trim_start().chars().next().map(|c| c.to_ascii_lowercase()),
        Some('c') | Some('k')
    );
    cursor += 1;

    // 位置行：恰好 sum(counts) 行
    let natoms: usize = counts.iter().sum();
    let mut raw = Vec::with_capacity(natoms);
    for k in 0..natoms {
        let line = lines
            .get(cursor + k)
            .ok_or_else(|| VaspectError::MalformedRecord {
                path: name.to_string(),
                line: cursor + k + 1,
                reason: format!("Expected {} position lines, file ends early", natoms),
            })?;
        let pos = parse_vec3(line).ok_or_else(|| VaspectError::MalformedRecord {
            path: name.to_string(),
            line: cursor + k + 1,
            reason: "Position needs 3 numeric components".to_string(),
        })?;
        raw.push(pos);
    }

    // 笛卡尔输入与基矢一样要乘比例因子
    let positions = if is_cartesian {
        let scaled = raw
            .iter()
            .map(|p| [p[0] * scale, p[1] * scale, p[2] * scale])
            .collect();
        Positions::Cartesian(scaled)
    } else {
        Positions::Fractional(raw)
    };

    // 按计数展开逐原子符号
    let mut symbols = Vec::with_capacity(natoms);
    for (s, &count) in species.iter().zip(counts.iter()) {
        for _ in 0..count {
            symbols.push(s.clone());
        }
    }

    Ok(PoscarFile {
        comment,
        scale,
        lattice,
        positions,
        symbols,
        counts,
    })
}

/// 行内取前 3 个浮点数；不足 3 个返回 `None`
fn parse_vec3(line: &str) -> Option<[f64; 3]> {
    let parts: Vec<f64> = line
        .split_whitespace()
        .take(3)
        .map_while(|s| s.parse().ok())
        .collect();
    if parts.len() < 3 {
        return None;
    }
    Some([parts[0], parts[1], parts[2]])
}

/// 解析计数行
fn parse_counts(line: &str, name: &str, lineno: usize) -> Result<Vec<usize>> {
    let counts: Vec<usize> = line
        .split_whitespace()
        .map_while(|s| s.parse().ok())
        .collect();
    if counts.is_empty() || counts.len() != line.split_whitespace().count() {
        return Err(VaspectError::MalformedRecord {
            path: name.to_string(),
            line: lineno,
            reason: format!("Invalid atom count line: '{}'", line.trim()),
        });
    }
    Ok(counts)
}

/// 生成 POSCAR 格式字符串（Direct 坐标）
///
/// 用于写出原胞约化结果。
pub fn to_poscar_string(
    comment: &str,
    lattice: &Lattice,
    species: &[String],
    counts: &[usize],
    fractional: &[[f64; 3]],
) -> String {
    let mut result = String::new();

    result.push_str(&format!("{}\n", comment));
    result.push_str("1.0\n");

    for row in &lattice.matrix {
        result.push_str(&format!(
            "  {:16.10}  {:16.10}  {:16.10}\n",
            row[0], row[1], row[2]
        ));
    }

    result.push_str(&format!("   {}\n", species.join("   ")));
    let count_strs: Vec<String> = counts.iter().map(|c| c.to_string()).collect();
    result.push_str(&format!("   {}\n", count_strs.join("   ")));

    result.push_str("Direct\n");
    for pos in fractional {
        result.push_str(&format!(
            "  {:16.10}  {:16.10}  {:16.10}\n",
            pos[0], pos[1], pos[2]
        ));
    }

    result
}
