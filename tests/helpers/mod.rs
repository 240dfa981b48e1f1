// ==========================================
// 集成测试共用辅助模块
// ==========================================

#![allow(dead_code)]

pub mod seed_builder;

pub use seed_builder::*;
