//! # 结构模型模块
//!
//! 组合根：一个晶格 + 晶胞参数、一个原子集合、一个可选的近邻记录。
//! 构造顺序固定：先晶格与参数，再坐标求全，再物种 id，
//! 最后（按需）自适应近邻搜索。对外只暴露只读访问器。
//!
//! ## 依赖关系
//! - 被 `commands/` 使用
//! - 使用 `models/lattice.rs`, `models/atoms.rs`, `neighbors/`, `elements.rs`

use serde::{Deserialize, Serialize};

use crate::elements::ElementTable;
use crate::error::Result;
use crate::models::atoms::{AtomSet, Positions, SpeciesSpec};
use crate::models::lattice::{CellParameters, Lattice};
use crate::neighbors::{NeighborRecord, NeighborSearch};

/// 晶体结构模型
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureModel {
    /// 结构名称（文件注释行或文件名）
    pub name: String,

    lattice: Lattice,
    parameters: CellParameters,
    atoms: AtomSet,

    /// 近邻记录；只有请求键/近邻报告时才构建
    #[serde(skip)]
    neighbors: Option<NeighborRecord>,
}

impl StructureModel {
    /// 构造结构模型
    ///
    /// 晶格独占所有权；原子集合不反向引用模型，
    /// 需要两者的代码显式接收两个参数。
    pub fn new(
        name: impl Into<String>,
        lattice: Lattice,
        positions: Positions,
        species: SpeciesSpec,
        table: &ElementTable,
    ) -> Result<StructureModel> {
        let parameters = lattice.cell_parameters();
        let atoms = AtomSet::new(&lattice, positions, species, table)?;

        Ok(StructureModel {
            name: name.into(),
            lattice,
            parameters,
            atoms,
            neighbors: None,
        })
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn parameters(&self) -> &CellParameters {
        &self.parameters
    }

    pub fn atoms(&self) -> &AtomSet {
        &self.atoms
    }

    pub fn neighbors(&self) -> Option<&NeighborRecord> {
        self.neighbors.as_ref()
    }

    /// 执行近邻搜索并缓存结果
    ///
    /// `rcut` 为 0 进入自适应增长模式。记录每次调用整体重建。
    pub fn search_neighbors(&mut self, rcut: f64) -> Result<&NeighborRecord> {
        let record = NeighborSearch::new(rcut).run(
            self.atoms.cartesian(),
            &self.lattice,
            self.atoms.symbols(),
        )?;
        Ok(self.neighbors.insert(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nacl_model() -> StructureModel {
        let lattice =
            Lattice::from_vectors([[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 4.0]]);
        StructureModel::new(
            "NaCl",
            lattice,
            Positions::Fractional(vec![[0.0, 0.0, 0.0], [0.5, 0.0, 0.0]]),
            SpeciesSpec::Symbols(vec!["Na".to_string(), "Cl".to_string()]),
            &ElementTable::standard(),
        )
        .unwrap()
    }

    #[test]
    fn test_construction_order_populates_everything() {
        let model = nacl_model();

        assert!((model.parameters().a - 4.0).abs() < 1e-12);
        assert!((model.parameters().volume - 64.0).abs() < 1e-9);
        assert_eq!(model.atoms().len(), 2);
        assert!((model.atoms().cartesian()[1][0] - 2.0).abs() < 1e-12);
        // 近邻记录只有请求时才存在
        assert!(model.neighbors().is_none());
    }

    #[test]
    fn test_search_neighbors_fixed_radius() {
        let mut model = nacl_model();
        let record = model.search_neighbors(2.5).unwrap();

        assert_eq!(record.bond_count(), 1);
        assert!((record.closest_pair().unwrap().distance - 2.0).abs() < 1e-9);
        assert!(model.neighbors().is_some());
    }

    #[test]
    fn test_search_neighbors_adaptive() {
        let mut model = nacl_model();
        let record = model.search_neighbors(0.0).unwrap();

        assert!(record.bond_count() > 0);
        assert!((record.closest_pair().unwrap().distance - 2.0).abs() < 1e-9);
    }
}
