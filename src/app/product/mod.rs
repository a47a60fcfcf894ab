//! 产品：共享的数据结构

pub mod model;
