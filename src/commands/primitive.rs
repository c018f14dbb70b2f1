//! # primitive 命令实现
//!
//! 调用对称性库把惯用胞约化为原胞，并以 POSCAR 格式写出。
//! 约化失败是警告而非崩溃。
//!
//! ## 依赖关系
//! - 使用 `cli/primitive.rs` 定义的参数
//! - 使用 `parsers/`, `models/`, `symmetry.rs`
//! - 使用 `utils/output.rs`

use std::fs;
use std::path::PathBuf;

use crate::cli::primitive::PrimitiveArgs;
use crate::elements::ElementTable;
use crate::error::{Result, VaspectError};
use crate::models::atoms::{self, AtomSet};
use crate::models::{Positions, SpeciesSpec, StructureModel};
use crate::parsers;
use crate::symmetry;
use crate::utils::output;

/// 执行 primitive 命令
pub fn execute(args: PrimitiveArgs) -> Result<()> {
    let table = ElementTable::standard();
    let parsed = parsers::parse_structure_file(&args.file)?;

    let model = StructureModel::new(
        parsed.comment.clone(),
        parsed.lattice,
        parsed.positions,
        SpeciesSpec::Symbols(parsed.symbols),
        &table,
    )?;

    let numbers = symmetry::numbers_for(model.atoms());
    let prim = match symmetry::find_primitive(
        model.lattice(),
        model.atoms().fractional(),
        &numbers,
        args.tolerance,
    ) {
        Ok(prim) => prim,
        Err(e) => {
            output::print_warning("Could not reduce to primitive cell");
            output::print_warning(&e.to_string());
            return Ok(());
        }
    };

    // 原胞原子集合：由原子序数反推符号
    let prim_atoms = AtomSet::new(
        &prim.lattice,
        Positions::Fractional(prim.fractional.clone()),
        SpeciesSpec::Numbers(prim.numbers.clone()),
        &table,
    )?;

    let compound = model.atoms().compound();
    let path = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}-primitive.vasp", compound)));

    let (species, counts, positions) = group_by_species(&prim_atoms);
    let text = parsers::to_poscar_string(
        &format!("{} - primitive cell", compound),
        &prim.lattice,
        &species,
        &counts,
        &positions,
    );

    fs::write(&path, text).map_err(|e| VaspectError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    output::print_success(&format!(
        "Primitive cell ({} atoms) written to {}",
        prim_atoms.len(),
        path.display()
    ));

    Ok(())
}

/// 按首现物种顺序分组：POSCAR 的计数行要求同物种位置连续
fn group_by_species(atoms: &AtomSet) -> (Vec<String>, Vec<usize>, Vec<[f64; 3]>) {
    let unique = atoms::unique_ordered(atoms.symbols());
    let mut counts = Vec::with_capacity(unique.len());
    let mut positions = Vec::with_capacity(atoms.len());

    for species in &unique {
        let mut count = 0;
        for (symbol, pos) in atoms.symbols().iter().zip(atoms.fractional().iter()) {
            if symbol == species {
                positions.push(*pos);
                count += 1;
            }
        }
        counts.push(count);
    }

    (unique, counts, positions)
}
