//! # 原子集合模块
//!
//! 有序原子序列：元素符号、原子序数、逐物种序号（"第 2 个 Fe"）、
//! 分数坐标与笛卡尔坐标（二者始终同时填充、保持一致）。
//! 同时提供物种索引工具：run 计数 id、连续 run 长度、首现序去重。
//!
//! ## 依赖关系
//! - 被 `models/structure.rs`, `commands/` 使用
//! - 使用 `models/lattice.rs`, `models/coords.rs`, `elements.rs`

use serde::{Deserialize, Serialize};

use crate::elements::ElementTable;
use crate::error::Result;
use crate::models::coords;
use crate::models::lattice::Lattice;

/// amu -> g
const AMU_TO_GRAMS: f64 = 1.66054e-24;
/// Å³ -> cm³
const ANG3_TO_CM3: f64 = 1e-24;

/// 位置输入：构造时一次性判别，之后不再分支
#[derive(Debug, Clone)]
pub enum Positions {
    /// 分数坐标（晶格坐标）为真值来源
    Fractional(Vec<[f64; 3]>),
    /// 笛卡尔坐标为真值来源
    Cartesian(Vec<[f64; 3]>),
}

/// 物种输入：符号列表或原子序数列表，缺失的一侧由元素表推导
#[derive(Debug, Clone)]
pub enum SpeciesSpec {
    Symbols(Vec<String>),
    Numbers(Vec<i32>),
}

/// 原子集合
///
/// 不变式：对每个原子 cartesian ≈ fractional · H（浮点容差内）。
/// 构造时完成一次坐标求全，此后两种表示同等有效，无惰性失效。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtomSet {
    /// 元素符号，长度 N
    symbols: Vec<String>,
    /// 原子序数；符号不在元素表中时缺失
    numbers: Vec<Option<i32>>,
    /// 逐物种序号，1 基，物种变化时重置
    ids: Vec<usize>,
    /// 分数坐标
    fractional: Vec<[f64; 3]>,
    /// 笛卡尔坐标
    cartesian: Vec<[f64; 3]>,
    /// 连续 run 长度（按输入顺序，非按物种排序），总和 == N
    ntypes: Vec<usize>,
    /// 每个首现物种的相对原子质量；未知物种缺失
    masses: Vec<Option<f64>>,
}

impl AtomSet {
    /// 构造原子集合
    ///
    /// 构造顺序固定：坐标求全（分数↔笛卡尔）、符号/序数互推、
    /// 物种 id 与 run 长度计数。
    pub fn new(
        lattice: &Lattice,
        positions: Positions,
        species: SpeciesSpec,
        table: &ElementTable,
    ) -> Result<AtomSet> {
        let (fractional, cartesian) = match positions {
            Positions::Fractional(frac) => {
                let cart = coords::to_cartesian(&frac, lattice);
                (frac, cart)
            }
            Positions::Cartesian(cart) => {
                let frac = coords::to_fractional(&cart, lattice)?;
                (frac, cart)
            }
        };

        let (symbols, numbers) = match species {
            SpeciesSpec::Symbols(symbols) => {
                let numbers = symbols.iter().map(|s| table.number_of(s)).collect();
                (symbols, numbers)
            }
            SpeciesSpec::Numbers(nums) => {
                let symbols = nums
                    .iter()
                    .map(|&n| table.symbol_of(n).unwrap_or("X").to_string())
                    .collect();
                let numbers = nums.iter().map(|&n| Some(n)).collect();
                (symbols, numbers)
            }
        };

        let ids = assign_ids(&symbols);
        let ntypes = run_lengths(&symbols);
        let masses = unique_ordered(&symbols)
            .iter()
            .map(|s| table.mass_of(s))
            .collect();

        Ok(AtomSet {
            symbols,
            numbers,
            ids,
            fractional,
            cartesian,
            ntypes,
            masses,
        })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn numbers(&self) -> &[Option<i32>] {
        &self.numbers
    }

    pub fn ids(&self) -> &[usize] {
        &self.ids
    }

    pub fn fractional(&self) -> &[[f64; 3]] {
        &self.fractional
    }

    pub fn cartesian(&self) -> &[[f64; 3]] {
        &self.cartesian
    }

    pub fn ntypes(&self) -> &[usize] {
        &self.ntypes
    }

    pub fn masses(&self) -> &[Option<f64>] {
        &self.masses
    }

    /// 首现顺序的物种列表
    pub fn unique_species(&self) -> Vec<String> {
        unique_ordered(&self.symbols)
    }

    /// 化学计量名，如 "Fe2O1"
    pub fn compound(&self) -> String {
        let unique = unique_ordered(&self.symbols);
        unique
            .iter()
            .map(|s| {
                let count = self.symbols.iter().filter(|x| *x == s).count();
                format!("{}{}", s, count)
            })
            .collect()
    }

    /// 总质量 (amu)；任一物种质量缺失则整体缺失
    pub fn total_mass(&self) -> Option<f64> {
        let unique = unique_ordered(&self.symbols);
        let mut total = 0.0;
        for (species, mass) in unique.iter().zip(self.masses.iter()) {
            let count = self.symbols.iter().filter(|x| *x == species).count();
            total += count as f64 * (*mass)?;
        }
        Some(total)
    }

    /// 密度 (g/cm³)，`volume` 单位 Å³
    pub fn density(&self, volume: f64) -> Option<f64> {
        if volume <= 0.0 {
            return None;
        }
        let gmass = self.total_mass()? * AMU_TO_GRAMS;
        Some(gmass / (volume * ANG3_TO_CM3))
    }
}

// ─────────────────────────────────────────────────────────────
// 物种索引工具
// ─────────────────────────────────────────────────────────────

/// 逐物种序号：1 基 run 计数，物种变化时重置为 1
///
/// ["Fe","Fe","O"] -> [1, 2, 1]；单原子列表 -> [1]。
pub fn assign_ids(symbols: &[String]) -> Vec<usize> {
    let mut ids = Vec::with_capacity(symbols.len());
    let mut count = 0usize;

    for (i, symbol) in symbols.iter().enumerate() {
        if i > 0 && symbol == &symbols[i - 1] {
            count += 1;
        } else {
            count = 1;
        }
        ids.push(count);
    }

    ids
}

/// 连续 run 长度：按输入顺序，每个最大连续同物种段一个计数
///
/// 不变式：计数之和 == 输入长度。
pub fn run_lengths(symbols: &[String]) -> Vec<usize> {
    let mut lengths = Vec::new();
    let mut count = 0usize;

    for (i, symbol) in symbols.iter().enumerate() {
        if i > 0 && symbol == &symbols[i - 1] {
            count += 1;
        } else {
            if count > 0 {
                lengths.push(count);
            }
            count = 1;
        }
    }
    if count > 0 {
        lengths.push(count);
    }

    lengths
}

/// 首现顺序去重
pub fn unique_ordered(symbols: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for s in symbols {
        if !unique.contains(s) {
            unique.push(s.clone());
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_assign_ids_restarts_on_species_change() {
        assert_eq!(assign_ids(&labels(&["Fe", "Fe", "O"])), vec![1, 2, 1]);
        assert_eq!(assign_ids(&labels(&["Fe", "Fe", "Fe"])), vec![1, 2, 3]);
        assert_eq!(assign_ids(&labels(&["Fe", "O", "Fe"])), vec![1, 1, 1]);
    }

    #[test]
    fn test_assign_ids_single_atom() {
        assert_eq!(assign_ids(&labels(&["Si"])), vec![1]);
    }

    #[test]
    fn test_run_lengths_sum_to_input_length() {
        let cases = [
            labels(&["Fe", "Fe", "O"]),
            labels(&["Si"]),
            labels(&["A", "B", "B", "A", "A", "A"]),
            labels(&["P", "P", "S", "S", "H", "H"]),
        ];
        for symbols in &cases {
            let lengths = run_lengths(symbols);
            assert_eq!(lengths.iter().sum::<usize>(), symbols.len());
        }

        assert_eq!(run_lengths(&labels(&["Fe", "Fe", "O"])), vec![2, 1]);
        // run 不按物种分组：非连续的同物种形成独立 run
        assert_eq!(
            run_lengths(&labels(&["A", "B", "B", "A", "A", "A"])),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_unique_ordered_first_occurrence() {
        assert_eq!(
            unique_ordered(&labels(&["O", "Fe", "O", "Fe", "H"])),
            labels(&["O", "Fe", "H"])
        );
    }

    fn cubic(a: f64) -> Lattice {
        Lattice::from_vectors([[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]])
    }

    #[test]
    fn test_atomset_from_fractional() {
        let lattice = cubic(4.0);
        let table = ElementTable::standard();
        let atoms = AtomSet::new(
            &lattice,
            Positions::Fractional(vec![[0.0, 0.0, 0.0], [0.5, 0.5, 0.5]]),
            SpeciesSpec::Symbols(labels(&["Na", "Cl"])),
            &table,
        )
        .unwrap();

        assert_eq!(atoms.len(), 2);
        assert!((atoms.cartesian()[1][0] - 2.0).abs() < 1e-12);
        assert_eq!(atoms.numbers()[0], Some(11));
        assert_eq!(atoms.numbers()[1], Some(17));
        assert_eq!(atoms.ids(), &[1, 1]);
    }

    #[test]
    fn test_atomset_from_cartesian_keeps_consistency() {
        let lattice = cubic(2.0);
        let table = ElementTable::standard();
        let atoms = AtomSet::new(
            &lattice,
            Positions::Cartesian(vec![[1.0, 0.0, 0.0]]),
            SpeciesSpec::Symbols(labels(&["H"])),
            &table,
        )
        .unwrap();

        // cartesian ≈ fractional · H
        assert!((atoms.fractional()[0][0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_atomset_from_numbers_derives_symbols() {
        let lattice = cubic(3.0);
        let table = ElementTable::standard();
        let atoms = AtomSet::new(
            &lattice,
            Positions::Fractional(vec![[0.0; 3], [0.5; 3]]),
            SpeciesSpec::Numbers(vec![26, 8]),
            &table,
        )
        .unwrap();

        assert_eq!(atoms.symbols(), &labels(&["Fe", "O"]));
    }

    #[test]
    fn test_unknown_species_leaves_number_and_mass_absent() {
        let lattice = cubic(3.0);
        let table = ElementTable::standard();
        let atoms = AtomSet::new(
            &lattice,
            Positions::Fractional(vec![[0.0; 3], [0.5; 3]]),
            SpeciesSpec::Symbols(labels(&["Fe", "Qq"])),
            &table,
        )
        .unwrap();

        assert_eq!(atoms.numbers()[1], None);
        assert_eq!(atoms.masses()[1], None);
        assert_eq!(atoms.total_mass(), None);
        assert_eq!(atoms.density(27.0), None);
    }

    #[test]
    fn test_compound_and_density() {
        let lattice = cubic(4.0);
        let table = ElementTable::standard();
        let atoms = AtomSet::new(
            &lattice,
            Positions::Fractional(vec![[0.0; 3], [0.25; 3], [0.5; 3]]),
            SpeciesSpec::Symbols(labels(&["Fe", "Fe", "O"])),
            &table,
        )
        .unwrap();

        assert_eq!(atoms.compound(), "Fe2O1");

        let total = atoms.total_mass().unwrap();
        assert!((total - (2.0 * 55.845 + 15.9994)).abs() < 1e-6);

        let density = atoms.density(64.0).unwrap();
        assert!(density > 0.0);
    }
}
