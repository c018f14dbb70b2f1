//! # 工具模块
//!
//! ## 依赖关系
//! - 被 `main.rs`, `commands/` 使用
//! - 子模块: output

pub mod output;
