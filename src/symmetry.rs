//! # 对称性分析模块
//!
//! 封装外部对称性库 `moyo`：输入晶格 + 分数坐标 + 原子序数 + 数值容差，
//! 输出空间群号（1-230）、国际符号与可选的原胞约化结果。
//! Bravais 晶系由空间群号的固定区间查表得到。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/lattice.rs`, `models/atoms.rs`, `error.rs`
//! - 使用 `moyo`, `nalgebra`

use moyo::base::{AngleTolerance, Cell, Lattice as MoyoLattice};
use moyo::data::Setting;
use moyo::MoyoDataset;
use nalgebra::{Matrix3, Vector3};

use crate::error::{Result, VaspectError};
use crate::models::atoms::AtomSet;
use crate::models::lattice::Lattice;

/// 对称性分类结果
#[derive(Debug, Clone)]
pub struct SymmetryInfo {
    /// 空间群号 (1-230)
    pub number: i32,
    /// 国际（Hermann-Mauguin 短）符号
    pub symbol: String,
    /// Bravais 晶系
    pub bravais: &'static str,
}

/// 原胞约化结果：基矢 + 分数坐标 + 原子序数
#[derive(Debug, Clone)]
pub struct PrimitiveCell {
    pub lattice: Lattice,
    pub fractional: Vec<[f64; 3]>,
    pub numbers: Vec<i32>,
}

/// 空间群号 -> Bravais 晶系（固定区间查表）
pub fn bravais_class(number: i32) -> &'static str {
    match number {
        1..=2 => "triclinic",
        3..=15 => "monoclinic",
        16..=74 => "orthorhombic",
        75..=142 => "tetragonal",
        143..=167 => "trigonal",
        168..=194 => "hexagonal",
        195..=230 => "cubic",
        _ => "unknown",
    }
}

/// 分类空间群
pub fn analyze(
    lattice: &Lattice,
    fractional: &[[f64; 3]],
    numbers: &[i32],
    symprec: f64,
) -> Result<SymmetryInfo> {
    let dataset = run_moyo(lattice, fractional, numbers, symprec)?;
    let number = dataset.number;

    let symbol = if (1..=230).contains(&number) {
        SG_SYMBOLS[number as usize].to_string()
    } else {
        "unknown".to_string()
    };

    Ok(SymmetryInfo {
        number,
        symbol,
        bravais: bravais_class(number),
    })
}

/// 约化到原胞
pub fn find_primitive(
    lattice: &Lattice,
    fractional: &[[f64; 3]],
    numbers: &[i32],
    symprec: f64,
) -> Result<PrimitiveCell> {
    let dataset = run_moyo(lattice, fractional, numbers, symprec)?;
    let prim = dataset.prim_std_cell;

    let b = prim.lattice.basis;
    let matrix = [
        [b.m11, b.m12, b.m13],
        [b.m21, b.m22, b.m23],
        [b.m31, b.m32, b.m33],
    ];

    let fractional = prim.positions.iter().map(|p| [p.x, p.y, p.z]).collect();

    Ok(PrimitiveCell {
        lattice: Lattice::from_vectors(matrix),
        fractional,
        numbers: prim.numbers,
    })
}

/// 对称性分析用的原子序数列表
///
/// 未知物种没有原子序数，按首现顺序映射到元素表之外的
/// 代号（119 起），同物种同代号即可满足对称性库的要求。
pub fn numbers_for(atoms: &AtomSet) -> Vec<i32> {
    let unique = atoms.unique_species();
    atoms
        .symbols()
        .iter()
        .zip(atoms.numbers().iter())
        .map(|(symbol, number)| match number {
            Some(z) => *z,
            None => {
                let idx = unique.iter().position(|u| u == symbol).unwrap_or(0);
                119 + idx as i32
            }
        })
        .collect()
}

fn run_moyo(
    lattice: &Lattice,
    fractional: &[[f64; 3]],
    numbers: &[i32],
    symprec: f64,
) -> Result<MoyoDataset> {
    let m = &lattice.matrix;
    let basis = Matrix3::new(
        m[0][0], m[0][1], m[0][2], m[1][0], m[1][1], m[1][2], m[2][0], m[2][1], m[2][2],
    );

    let positions: Vec<Vector3<f64>> = fractional
        .iter()
        .map(|p| Vector3::new(p[0], p[1], p[2]))
        .collect();

    let cell = Cell::new(MoyoLattice::new(basis), positions, numbers.to_vec());

    MoyoDataset::new(
        &cell,
        symprec,
        AngleTolerance::Default,
        Setting::Spglib,
        true,
    )
    .map_err(|e| VaspectError::SymmetryAnalysis {
        reason: format!("{:?}", e),
    })
}

/// 空间群国际短符号，下标即空间群号
const SG_SYMBOLS: [&str; 231] = [
    "", "P1", "P-1", "P2", "P2_1", "C2", "Pm", "Pc", "Cm", "Cc", "P2/m", "P2_1/m", "C2/m",
    "P2/c", "P2_1/c", "C2/c", "P222", "P222_1", "P2_12_12", "P2_12_12_1", "C222_1", "C222",
    "F222", "I222", "I2_12_12_1", "Pmm2", "Pmc2_1", "Pcc2", "Pma2", "Pca2_1", "Pnc2",
    "Pmn2_1", "Pba2", "Pna2_1", "Pnn2", "Cmm2", "Cmc2_1", "Ccc2", "Amm2", "Aem2", "Ama2",
    "Aea2", "Fmm2", "Fdd2", "Imm2", "Iba2", "Ima2", "Pmmm", "Pnnn", "Pccm", "Pban", "Pmma",
    "Pnna", "Pmna", "Pcca", "Pbam", "Pccn", "Pbcm", "Pnnm", "Pmmn", "Pbcn", "Pbca", "Pnma",
    "Cmcm", "Cmce", "Cmmm", "Cccm", "Cmme", "Ccce", "Fmmm", "Fddd", "Immm", "Ibam", "Ibca",
    "Imma", "P4", "P4_1", "P4_2", "P4_3", "I4", "I4_1", "P-4", "I-4", "P4/m", "P4_2/m",
    "P4/n", "P4_2/n", "I4/m", "I4_1/a", "P422", "P42_12", "P4_122", "P4_12_12", "P4_222",
    "P4_22_12", "P4_322", "P4_32_12", "I422", "I4_122", "P4mm", "P4bm", "P4_2cm", "P4_2nm",
    "P4cc", "P4nc", "P4_2mc", "P4_2bc", "I4mm", "I4cm", "I4_1md", "I4_1cd", "P-42m",
    "P-42c", "P-42_1m", "P-42_1c", "P-4m2", "P-4c2", "P-4b2", "P-4n2", "I-4m2", "I-4c2",
    "I-42m", "I-42d", "P4/mmm", "P4/mcc", "P4/nbm", "P4/nnc", "P4/mbm", "P4/mnc", "P4/nmm",
    "P4/ncc", "P4_2/mmc", "P4_2/mcm", "P4_2/nbc", "P4_2/nnm", "P4_2/mbc", "P4_2/mnm",
    "P4_2/nmc", "P4_2/ncm", "I4/mmm", "I4/mcm", "I4_1/amd", "I4_1/acd", "P3", "P3_1",
    "P3_2", "R3", "P-3", "R-3", "P312", "P321", "P3_112", "P3_121", "P3_212", "P3_221",
    "R32", "P3m1", "P31m", "P3c1", "P31c", "R3m", "R3c", "P-31m", "P-31c", "P-3m1",
    "P-3c1", "R-3m", "R-3c", "P6", "P6_1", "P6_5", "P6_2", "P6_4", "P6_3", "P-6", "P6/m",
    "P6_3/m", "P622", "P6_122", "P6_522", "P6_222", "P6_422", "P6_322", "P6mm", "P6cc",
    "P6_3cm", "P6_3mc", "P-6m2", "P-6c2", "P-62m", "P-62c", "P6/mmm", "P6/mcc", "P6_3/mcm",
    "P6_3/mmc", "P23", "F23", "I23", "P2_13", "I2_13", "Pm-3", "Pn-3", "Fm-3", "Fd-3",
    "Im-3", "Pa-3", "Ia-3", "P432", "P4_232", "F432", "F4_132", "I432", "P4_332", "P4_132",
    "I4_132", "P-43m", "F-43m", "I-43m", "P-43n", "F-43c", "I-43d", "Pm-3m", "Pn-3n",
    "Pm-3n", "Pn-3m", "Fm-3m", "Fm-3c", "Fd-3m", "Fd-3c", "Im-3m", "Ia-3d",
];
