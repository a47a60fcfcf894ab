//! 产品创建/编辑

pub mod handler;
pub mod service;
