//! # inspect 命令实现
//!
//! 读取结构文件，构建结构模型，按需渲染四个报告区段：
//! Cell（晶胞与对称性）、Atoms（组成与密度）、Bonds（键统计）、
//! Neighbors（逐原子近邻列表）。`--save` 时写入
//! `<compound>.{cell,atoms,bonds}` 文件，否则打印到 stdout。
//!
//! ## 依赖关系
//! - 使用 `cli/inspect.rs` 定义的参数
//! - 使用 `parsers/`, `models/`, `neighbors/`, `symmetry.rs`
//! - 使用 `utils/output.rs`

use std::fmt::Write as _;
use std::fs;

use tabled::{Table, Tabled};

use crate::cli::inspect::InspectArgs;
use crate::elements::ElementTable;
use crate::error::{Result, VaspectError};
use crate::models::{SpeciesSpec, StructureModel};
use crate::neighbors::NeighborRecord;
use crate::parsers;
use crate::symmetry::{self, SymmetryInfo};
use crate::utils::output;

/// 弧度 -> 度
const R2D: f64 = 180.0 / std::f64::consts::PI;

/// 近邻摘要表行
#[derive(Tabled)]
struct NeighborRow {
    #[tabled(rename = "Atom")]
    atom: String,
    #[tabled(rename = "Neighbors")]
    neighbors: usize,
    #[tabled(rename = "Nearest (A)")]
    nearest: String,
}

/// 执行 inspect 命令
pub fn execute(args: InspectArgs) -> Result<()> {
    if args.radius < 0.0 {
        return Err(VaspectError::InvalidArgument(
            "search radius must be non-negative".to_string(),
        ));
    }
    if args.tolerance <= 0.0 {
        return Err(VaspectError::InvalidArgument(
            "symmetry tolerance must be positive".to_string(),
        ));
    }

    let table = ElementTable::standard();
    let parsed = parsers::parse_structure_file(&args.file)?;

    let mut model = StructureModel::new(
        parsed.comment.clone(),
        parsed.lattice,
        parsed.positions,
        SpeciesSpec::Symbols(parsed.symbols),
        &table,
    )?;

    let all = args.wants_everything();
    let want_atoms = all || args.print_atoms;
    let want_cell = all || args.print_cell;
    let want_bonds = all || args.print_bonds;
    let want_neighbors = all || args.print_neighbors;

    let file_label = args.file.display().to_string();
    let compound = model.atoms().compound();

    if !args.save {
        output::print_info(&format!(
            "{} ({} atoms)",
            model.name,
            model.atoms().len()
        ));
    }

    // 对称性分类失败降级为警告，报告退回未分类默认值
    let sym = if want_cell {
        let numbers = symmetry::numbers_for(model.atoms());
        match symmetry::analyze(
            model.lattice(),
            model.atoms().fractional(),
            &numbers,
            args.tolerance,
        ) {
            Ok(info) => Some(info),
            Err(e) => {
                output::print_warning(&e.to_string());
                None
            }
        }
    } else {
        None
    };

    // 键/近邻报告需要近邻列表；增长上限耗尽同样降级为警告
    if want_bonds || want_neighbors {
        match model.search_neighbors(args.radius) {
            Ok(_) => {}
            Err(e @ VaspectError::NoBondsFound { .. }) => {
                output::print_warning(&e.to_string());
            }
            Err(e) => return Err(e),
        }
    }

    if want_atoms {
        let text = render_atoms(&file_label, &model);
        emit(&args, &compound, "atoms", &text)?;
    }

    if want_cell {
        let text = render_cell(&file_label, &compound, args.tolerance, &model, sym.as_ref());
        emit(&args, &compound, "cell", &text)?;
    }

    if want_bonds || want_neighbors {
        let mut text = render_bonds(&file_label, &compound, args.radius, model.neighbors());
        if want_neighbors {
            if let Some(record) = model.neighbors() {
                text.push_str(&render_neighbor_list(&model, record));
            }
        }
        emit(&args, &compound, "bonds", &text)?;

        // 近邻摘要表只在终端模式下额外显示
        if want_neighbors && !args.save {
            if let Some(record) = model.neighbors() {
                print_neighbor_summary(&model, record);
            }
        }
    }

    Ok(())
}

/// 输出区段：`--save` 写 `<compound>.<ext>`，否则打印
fn emit(args: &InspectArgs, compound: &str, ext: &str, text: &str) -> Result<()> {
    if args.save {
        let path = format!("{}.{}", compound, ext);
        fs::write(&path, text).map_err(|e| VaspectError::FileWriteError {
            path: path.clone(),
            source: e,
        })?;
        output::print_success(&format!("Saved {}", path));
    } else {
        println!();
        print!("{}", text);
    }
    Ok(())
}

/// Cell 区段
fn render_cell(
    file: &str,
    compound: &str,
    symprec: f64,
    model: &StructureModel,
    sym: Option<&SymmetryInfo>,
) -> String {
    let m = &model.lattice().matrix;
    let p = model.parameters();

    // 未分类时退回 P1 / unknown 默认值
    let (symbol, number, bravais) = match sym {
        Some(info) => (info.symbol.as_str(), info.number, info.bravais),
        None => ("P1", 1, "unknown"),
    };

    let mut s = String::new();
    let _ = writeln!(s, "/*-- Cell --*/");
    let _ = writeln!(s, "Structure     = {}", file);
    let _ = writeln!(s, "Compound      = {}", compound);
    let _ = writeln!(s, "symprec       = {:3.0e}", symprec);
    let _ = writeln!(s);
    let _ = writeln!(
        s,
        "        | {:<10.6} {:10.6} {:10.6} |",
        m[0][0], m[0][1], m[0][2]
    );
    let _ = writeln!(
        s,
        "  H  =  | {:<10.6} {:10.6} {:10.6} |",
        m[1][0], m[1][1], m[1][2]
    );
    let _ = writeln!(
        s,
        "        | {:<10.6} {:10.6} {:10.6} |",
        m[2][0], m[2][1], m[2][2]
    );
    let _ = writeln!(s);
    let _ = writeln!(s, "Volume   = {:<10.6} (A^3)", p.volume);
    let _ = writeln!(s, "a        = {:<10.6} (A)", p.a);
    let _ = writeln!(s, "b        = {:<10.6} (A)", p.b);
    let _ = writeln!(s, "c        = {:<10.6} (A)", p.c);
    let _ = writeln!(s, "alpha    = {:<10.6} (deg)", p.alpha * R2D);
    let _ = writeln!(s, "beta     = {:<10.6} (deg)", p.beta * R2D);
    let _ = writeln!(s, "gamma    = {:<10.6} (deg)", p.gamma * R2D);
    let _ = writeln!(s, "symmetry = {} {}", symbol, number);
    let _ = writeln!(s, "bravais  = {}", bravais);
    s
}

/// Atoms 区段
fn render_atoms(file: &str, model: &StructureModel) -> String {
    let atoms = model.atoms();
    let species = atoms.unique_species();

    let mut s = String::new();
    let _ = writeln!(s, "/*-- Atoms --*/");
    let _ = writeln!(s, "Structure     = {}", file);
    let _ = writeln!(s, "Compound      = {}", atoms.compound());
    let _ = writeln!(s, "Natoms        = {}", atoms.len());
    let _ = writeln!(s, "Ntypes        = {}", atoms.ntypes().len());
    let _ = writeln!(s, "Species       = {}", species.join(" "));
    let counts: Vec<String> = atoms.ntypes().iter().map(|n| n.to_string()).collect();
    let _ = writeln!(s, "Type count    = {}", counts.join(" "));

    let masses: Vec<String> = atoms
        .masses()
        .iter()
        .map(|m| match m {
            Some(mass) => format!("{:.6}", mass),
            None => "n/a".to_string(),
        })
        .collect();
    let _ = writeln!(s, "Masses        = {} amu", masses.join(" "));

    match atoms.density(model.parameters().volume) {
        Some(density) => {
            let _ = writeln!(s, "Density       = {:.6} g/cm^3", density);
        }
        None => {
            let _ = writeln!(s, "Density       = n/a");
        }
    }
    s
}

/// Bonds 区段；近邻集为空时同样要能优雅渲染
fn render_bonds(
    file: &str,
    compound: &str,
    requested_rcut: f64,
    record: Option<&NeighborRecord>,
) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "/*-- Bonds --*/");
    let _ = writeln!(s, "Structure     = {}", file);
    let _ = writeln!(s, "Compound      = {}", compound);

    match record {
        Some(record) => {
            let _ = writeln!(s, "NBonds        = {}", record.bond_count());
            let _ = writeln!(s, "Search Radius = {:.6} (A)", record.cutoff());
            match record.closest_pair() {
                Some(pair) => {
                    let _ = writeln!(s, "Minimum Bond  = {:.6} (A)", pair.distance);
                    let _ = writeln!(s, "Minimum Pair  = {}", pair.label);
                }
                None => {
                    let _ = writeln!(s, "Minimum Bond  = n/a");
                    let _ = writeln!(s, "Minimum Pair  = n/a");
                }
            }
        }
        None => {
            let _ = writeln!(s, "NBonds        = 0");
            let _ = writeln!(s, "Search Radius = {:.6} (A)", requested_rcut);
            let _ = writeln!(s, "Minimum Bond  = n/a");
            let _ = writeln!(s, "Minimum Pair  = n/a");
        }
    }
    s
}

/// Neighbors 区段：逐原子近邻列表
fn render_neighbor_list(model: &StructureModel, record: &NeighborRecord) -> String {
    let atoms = model.atoms();
    let symbols = atoms.symbols();
    let ids = atoms.ids();

    let mut s = String::new();
    let _ = writeln!(s, "/*-- Neighbors --*/");
    for i in 0..atoms.len() {
        let _ = writeln!(
            s,
            " {}{} atom(#{}) has {} neighbors:",
            symbols[i],
            ids[i],
            i + 1,
            record.neighbor_count(i)
        );
        let (nbrs, dists, _) = record.neighbors_of(i);
        for (j, d) in nbrs.iter().zip(dists.iter()) {
            let _ = writeln!(
                s,
                "   {}{}-{}{} = {:.6}",
                symbols[i], ids[i], symbols[*j], ids[*j], d
            );
        }
    }
    s
}

/// 终端模式下的近邻摘要表
fn print_neighbor_summary(model: &StructureModel, record: &NeighborRecord) {
    let atoms = model.atoms();
    let rows: Vec<NeighborRow> = (0..atoms.len())
        .map(|i| {
            let (_, dists, _) = record.neighbors_of(i);
            let nearest = dists
                .iter()
                .cloned()
                .fold(f64::INFINITY, f64::min);
            NeighborRow {
                atom: format!("{}{}", atoms.symbols()[i], atoms.ids()[i]),
                neighbors: record.neighbor_count(i),
                nearest: if nearest.is_finite() {
                    format!("{:.4}", nearest)
                } else {
                    "-".to_string()
                },
            }
        })
        .collect();

    output::print_header("Neighbor summary");
    println!("{}", Table::new(&rows));
}
