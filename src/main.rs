//! # vaspect - POSCAR/CONTCAR 结构检查工具
//!
//! 检查晶体结构文件：原子组成、晶胞几何、对称性分类与键/近邻关系。
//!
//! ## 子命令
//! - `inspect`   - 打印晶胞/原子/键/近邻报告（默认全部）
//! - `primitive` - 约化到原胞并写出 POSCAR
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/    (POSCAR 读写)
//!   │     ├── models/     (晶格/坐标/原子集合/结构模型)
//!   │     ├── neighbors/  (周期性近邻搜索)
//!   │     └── symmetry.rs (moyo 对称性封装)
//!   ├── elements.rs (元素参考表)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod elements;
mod error;
mod models;
mod neighbors;
mod parsers;
mod symmetry;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
