//! # 周期性近邻搜索模块
//!
//! 在 27 个周期平移（三个胞轴方向各取 -1/0/+1）下枚举全部有序原子对，
//! 收集间距落入截断半径内的近邻边，构建 CSR 风格的近邻记录，
//! 并跟踪全局最短键。截断半径未知时按 0.2 Å 步长自适应增长。
//!
//! O(27·N²) 的朴素搜索，外层原子循环用 rayon 并行：
//! 每个 worker 只读位置与晶格，向私有缓冲追加边，
//! 最后按原子序拼接，索引表与并列裁决均保持确定性。
//!
//! ## 依赖关系
//! - 被 `models/structure.rs`, `commands/` 使用
//! - 使用 `models/lattice.rs`, `error.rs`
//! - 使用 `rayon` 进行并行计算

use rayon::prelude::*;

use crate::error::{Result, VaspectError};
use crate::models::lattice::Lattice;

/// 自适应搜索的半径增量 (Å)
pub const GROWTH_STEP: f64 = 0.2;

/// 自适应搜索的尝试次数上限，超出后报告 `NoBondsFound`
pub const MAX_GROWTH_ATTEMPTS: usize = 200;

/// 周期平移标签：三个胞轴方向的整数倍数，各属 {-1, 0, 1}
pub type Shift = [i8; 3];

/// 零平移
pub const ZERO_SHIFT: Shift = [0, 0, 0];

/// 全局最短键累加器
///
/// 仅当新距离严格小于当前最小值时才覆盖标签，
/// 相等（并列）保留先发现者。
#[derive(Debug, Clone)]
pub struct ClosestPair {
    /// 最短键长 (Å)
    pub distance: f64,
    /// 人类可读的原子对标签，如 "Fe1-O2"
    pub label: String,
}

/// 近邻记录
///
/// 索引表长度 N+1，`index_table[i]..index_table[i+1]` 界定原子 i
/// 在扁平近邻/距离/平移数组中的切片，包含该原子在全部 27 个平移
/// 下累积的边。每次搜索整体重建，返回后只读。
#[derive(Debug, Clone)]
pub struct NeighborRecord {
    index_table: Vec<usize>,
    neighbors: Vec<usize>,
    distances: Vec<f64>,
    shifts: Vec<Shift>,
    nbonds: usize,
    rcut: f64,
    closest: Option<ClosestPair>,
}

impl NeighborRecord {
    /// 原子总数
    pub fn atom_count(&self) -> usize {
        self.index_table.len() - 1
    }

    /// 基胞键总数（仅零平移下的无序对）
    pub fn bond_count(&self) -> usize {
        self.nbonds
    }

    /// 实际使用的截断半径
    pub fn cutoff(&self) -> f64 {
        self.rcut
    }

    /// 全局最短键；近邻集为空时缺失
    pub fn closest_pair(&self) -> Option<&ClosestPair> {
        self.closest.as_ref()
    }

    /// 原子 i 的近邻数
    pub fn neighbor_count(&self, i: usize) -> usize {
        self.index_table[i + 1] - self.index_table[i]
    }

    /// 原子 i 的近邻切片：(对端原子索引, 距离, 平移标签)
    pub fn neighbors_of(&self, i: usize) -> (&[usize], &[f64], &[Shift]) {
        let lo = self.index_table[i];
        let hi = self.index_table[i + 1];
        (
            &self.neighbors[lo..hi],
            &self.distances[lo..hi],
            &self.shifts[lo..hi],
        )
    }

    /// 边总数（有向，含周期像）
    pub fn edge_count(&self) -> usize {
        self.neighbors.len()
    }

    /// 索引表（长度 N+1）
    pub fn index_table(&self) -> &[usize] {
        &self.index_table
    }
}

/// 搜索状态：截断半径未定则增长，已定则仅搜索一次
#[derive(Debug, Clone, Copy, PartialEq)]
enum SearchMode {
    /// 半径未定，按 `GROWTH_STEP` 增长直到出现零平移键
    Searching,
    /// 调用方给定正半径
    Fixed(f64),
}

/// 近邻搜索引擎
#[derive(Debug, Clone, Copy)]
pub struct NeighborSearch {
    mode: SearchMode,
}

impl NeighborSearch {
    /// `rcut` 为 0 进入 Searching 状态，正值进入 Fixed 状态
    pub fn new(rcut: f64) -> Self {
        let mode = if rcut > 0.0 {
            SearchMode::Fixed(rcut)
        } else {
            SearchMode::Searching
        };
        NeighborSearch { mode }
    }

    /// 按当前状态执行搜索
    pub fn run(
        &self,
        cartesian: &[[f64; 3]],
        lattice: &Lattice,
        species: &[String],
    ) -> Result<NeighborRecord> {
        match self.mode {
            SearchMode::Fixed(rcut) => Ok(find(cartesian, lattice, species, rcut)),
            SearchMode::Searching => find_with_growth(cartesian, lattice, species, 0.0),
        }
    }
}

/// 单个原子在全部 27 个平移下累积的边与局部统计
struct AtomEdges {
    neighbors: Vec<usize>,
    distances: Vec<f64>,
    shifts: Vec<Shift>,
    zero_shift_bonds: usize,
    closest: Option<ClosestPair>,
}

/// 单次全量近邻搜索
///
/// 对每个有序原子对 (i, j)（含 i == j）与 27 个平移的组合，
/// 计算原子 i 到「原子 j + 平移向量」的距离；0 < d <= rcut 时
/// 记录 i 指向 j 的有向边。零平移下 d == 0 的自身对自然被排除。
/// 仅零平移下的无序对 (i < j) 计入键总数；周期像只列为近邻。
pub fn find(
    cartesian: &[[f64; 3]],
    lattice: &Lattice,
    species: &[String],
    rcut: f64,
) -> NeighborRecord {
    let n = cartesian.len();
    let shifts = shift_vectors(lattice);

    let per_atom: Vec<AtomEdges> = (0..n)
        .into_par_iter()
        .map(|i| collect_edges(i, cartesian, &shifts, species, rcut))
        .collect();

    // 按原子序拼接私有缓冲，索引表取真实累计数
    let mut index_table = Vec::with_capacity(n + 1);
    index_table.push(0);

    let total: usize = per_atom.iter().map(|e| e.neighbors.len()).sum();
    let mut neighbors = Vec::with_capacity(total);
    let mut distances = Vec::with_capacity(total);
    let mut shift_tags = Vec::with_capacity(total);
    let mut nbonds = 0;
    let mut closest: Option<ClosestPair> = None;

    for edges in per_atom {
        neighbors.extend(edges.neighbors);
        distances.extend(edges.distances);
        shift_tags.extend(edges.shifts);
        index_table.push(neighbors.len());
        nbonds += edges.zero_shift_bonds;

        if let Some(candidate) = edges.closest {
            closest = match closest {
                // 严格更小才替换，先发现者在并列时胜出
                Some(best) if candidate.distance < best.distance => Some(candidate),
                Some(best) => Some(best),
                None => Some(candidate),
            };
        }
    }

    NeighborRecord {
        index_table,
        neighbors,
        distances,
        shifts: shift_tags,
        nbonds,
        rcut,
        closest,
    }
}

/// 自适应半径搜索
///
/// Searching 状态：每次未找到零平移键就把半径加 `GROWTH_STEP`，
/// 最多 `MAX_GROWTH_ATTEMPTS` 次，超出返回 `NoBondsFound`。
pub fn find_with_growth(
    cartesian: &[[f64; 3]],
    lattice: &Lattice,
    species: &[String],
    initial_rcut: f64,
) -> Result<NeighborRecord> {
    let mut rcut = initial_rcut;

    for _ in 0..MAX_GROWTH_ATTEMPTS {
        let record = find(cartesian, lattice, species, rcut);
        if record.bond_count() > 0 {
            return Ok(record);
        }
        rcut += GROWTH_STEP;
    }

    Err(VaspectError::NoBondsFound {
        rcut,
        attempts: MAX_GROWTH_ATTEMPTS,
    })
}

/// 同物种序号：species[j] 在下标 <= j 的范围内的出现次序（1 基）
///
/// 纯用于标签显示，按出现计数而非连续 run 计数，
/// 与 `models::atoms::assign_ids` 不同。
pub fn species_rank(species: &[String], j: usize) -> usize {
    let symbol = &species[j];
    species[..=j].iter().filter(|s| *s == symbol).count()
}

/// 27 个平移向量：(ix, iy, iz) ∈ {-1,0,1}³，
/// 平移 = ix·a1 + iy·a2 + iz·a3
fn shift_vectors(lattice: &Lattice) -> Vec<(Shift, [f64; 3])> {
    let (a1, a2, a3) = lattice.axes();
    let idx: [i8; 3] = [-1, 0, 1];
    let mut shifts = Vec::with_capacity(27);

    for &iz in &idx {
        for &iy in &idx {
            for &ix in &idx {
                let v = [
                    ix as f64 * a1[0] + iy as f64 * a2[0] + iz as f64 * a3[0],
                    ix as f64 * a1[1] + iy as f64 * a2[1] + iz as f64 * a3[1],
                    ix as f64 * a1[2] + iy as f64 * a2[2] + iz as f64 * a3[2],
                ];
                shifts.push(([ix, iy, iz], v));
            }
        }
    }

    shifts
}

/// 收集原子 i 在全部平移下的边（worker 私有缓冲）
fn collect_edges(
    i: usize,
    cartesian: &[[f64; 3]],
    shifts: &[(Shift, [f64; 3])],
    species: &[String],
    rcut: f64,
) -> AtomEdges {
    let pi = cartesian[i];
    let mut edges = AtomEdges {
        neighbors: Vec::new(),
        distances: Vec::new(),
        shifts: Vec::new(),
        zero_shift_bonds: 0,
        closest: None,
    };

    for (tag, shift) in shifts {
        for (j, pj) in cartesian.iter().enumerate() {
            let dx = pi[0] - (pj[0] + shift[0]);
            let dy = pi[1] - (pj[1] + shift[1]);
            let dz = pi[2] - (pj[2] + shift[2]);
            let d = (dx * dx + dy * dy + dz * dz).sqrt();

            if d > 0.0 && d <= rcut {
                edges.neighbors.push(j);
                edges.distances.push(d);
                edges.shifts.push(*tag);

                if *tag == ZERO_SHIFT && i < j {
                    edges.zero_shift_bonds += 1;
                }

                let replace = match &edges.closest {
                    Some(best) => d < best.distance,
                    None => true,
                };
                if replace {
                    let label = format!(
                        "{}{}-{}{}",
                        species[i],
                        species_rank(species, i),
                        species[j],
                        species_rank(species, j)
                    );
                    edges.closest = Some(ClosestPair { distance: d, label });
                }
            }
        }
    }

    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cubic(a: f64) -> Lattice {
        Lattice::from_vectors([[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]])
    }

    fn labels(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_two_atom_cubic_periodic_counting() {
        // 边长 2.0 的立方胞，分数坐标 (0,0,0) 与 (0.5,0,0)，截断 1.5：
        // 直接距离与一个回绕像距离均为 1.0（恰为半胞边）
        let lattice = cubic(2.0);
        let cart = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
        let species = labels(&["H", "H"]);

        let record = find(&cart, &lattice, &species, 1.5);

        // 仅零平移对计入键总数
        assert_eq!(record.bond_count(), 1);

        // 每个原子看到对方两次：一次直接，一次经非零平移
        assert_eq!(record.neighbor_count(0), 2);
        assert_eq!(record.neighbor_count(1), 2);

        let (nbrs, dists, shifts) = record.neighbors_of(0);
        assert_eq!(nbrs, &[1, 1]);
        for d in dists {
            assert!((d - 1.0).abs() < 1e-12);
        }
        assert!(shifts.iter().any(|s| *s == ZERO_SHIFT));
        assert!(shifts.iter().any(|s| *s != ZERO_SHIFT));
    }

    #[test]
    fn test_self_pair_excluded_distant_image_included() {
        // 单原子胞：自身的零平移对距离为 0 被排除，
        // 但 6 个最近的周期像落入截断
        let lattice = cubic(2.0);
        let cart = [[0.5, 0.5, 0.5]];
        let species = labels(&["Po"]);

        let record = find(&cart, &lattice, &species, 2.1);

        assert_eq!(record.bond_count(), 0);
        let (nbrs, dists, shifts) = record.neighbors_of(0);
        assert!(!nbrs.is_empty());
        assert!(shifts.iter().all(|s| *s != ZERO_SHIFT));
        // 面邻像距离 2.0
        assert!(dists.iter().filter(|d| (**d - 2.0).abs() < 1e-9).count() >= 6);
    }

    #[test]
    fn test_index_table_cumulative_over_all_shifts() {
        let lattice = cubic(3.0);
        let cart = [
            [0.0, 0.0, 0.0],
            [1.5, 0.0, 0.0],
            [0.0, 1.5, 0.0],
            [1.5, 1.5, 0.0],
        ];
        let species = labels(&["C", "C", "C", "C"]);

        let record = find(&cart, &lattice, &species, 1.6);

        let table = record.index_table();
        assert_eq!(table.len(), 5);
        assert_eq!(table[0], 0);
        assert_eq!(*table.last().unwrap(), record.edge_count());
        for w in table.windows(2) {
            assert!(w[0] <= w[1]);
        }
        let total: usize = (0..4).map(|i| record.neighbor_count(i)).sum();
        assert_eq!(total, record.edge_count());
    }

    #[test]
    fn test_closest_pair_first_found_wins_on_tie() {
        // 三个等距原子，多个 1.0 Å 的并列最小值，标签保留先发现者
        let lattice = cubic(10.0);
        let cart = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
        let species = labels(&["H", "H", "H"]);

        let record = find(&cart, &lattice, &species, 1.5);

        let pair = record.closest_pair().unwrap();
        assert!((pair.distance - 1.0).abs() < 1e-12);
        assert_eq!(pair.label, "H1-H2");
    }

    #[test]
    fn test_closest_pair_label_uses_species_rank() {
        let lattice = cubic(10.0);
        let cart = [[0.0, 0.0, 0.0], [5.0, 5.0, 5.0], [0.0, 0.0, 1.0]];
        let species = labels(&["Fe", "O", "Fe"]);

        let record = find(&cart, &lattice, &species, 1.5);

        let pair = record.closest_pair().unwrap();
        assert!((pair.distance - 1.0).abs() < 1e-12);
        // 第三个原子是第 2 个 Fe
        assert_eq!(pair.label, "Fe1-Fe2");
    }

    #[test]
    fn test_growth_terminates_within_bounded_steps() {
        // 间距 1.0 Å 的两个原子，从 0 起步：5 次 0.2 Å 增长后命中
        let lattice = cubic(10.0);
        let cart = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
        let species = labels(&["Si", "Si"]);

        let record = find_with_growth(&cart, &lattice, &species, 0.0).unwrap();

        assert!(record.bond_count() > 0);
        assert!((record.cutoff() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_growth_ceiling_reports_no_bonds() {
        // 最近像间距 50 Å，超出 200 次 × 0.2 Å 的增长上限
        let lattice = cubic(100.0);
        let cart = [[0.0, 0.0, 0.0], [50.0, 0.0, 0.0]];
        let species = labels(&["He", "He"]);

        let result = find_with_growth(&cart, &lattice, &species, 0.0);

        assert!(matches!(result, Err(VaspectError::NoBondsFound { .. })));
    }

    #[test]
    fn test_fixed_mode_searches_exactly_once() {
        // Fixed 状态下过小的半径直接返回空结果，不增长
        let lattice = cubic(10.0);
        let cart = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]];
        let species = labels(&["Si", "Si"]);

        let record = NeighborSearch::new(0.5)
            .run(&cart, &lattice, &species)
            .unwrap();

        assert_eq!(record.bond_count(), 0);
        assert_eq!(record.edge_count(), 0);
        assert!(record.closest_pair().is_none());
        assert!((record.cutoff() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_species_rank_counts_occurrences_not_runs() {
        let species = labels(&["Fe", "O", "Fe", "O", "Fe"]);
        assert_eq!(species_rank(&species, 0), 1);
        assert_eq!(species_rank(&species, 1), 1);
        assert_eq!(species_rank(&species, 2), 2);
        assert_eq!(species_rank(&species, 3), 2);
        assert_eq!(species_rank(&species, 4), 3);
    }

    #[test]
    fn test_triclinic_shift_uses_axis_combination() {
        // 斜方胞：回绕距离必须用轴向量组合而非逐分量回绕
        let lattice =
            Lattice::from_vectors([[4.0, 0.0, 0.0], [2.0, 3.0, 0.0], [0.0, 0.0, 5.0]]);
        let cart = [[0.0, 0.0, 0.0], [3.5, 0.0, 0.0]];
        let species = labels(&["C", "N"]);

        let record = find(&cart, &lattice, &species, 0.6);

        // 直接距离 3.5；经 -a1 平移后原子 1 的像在 (-0.5,0,0)，距离 0.5
        assert_eq!(record.bond_count(), 0);
        assert_eq!(record.neighbor_count(0), 1);
        let (_, dists, shifts) = record.neighbors_of(0);
        assert!((dists[0] - 0.5).abs() < 1e-12);
        assert_eq!(shifts[0], [-1, 0, 0]);
    }
}
