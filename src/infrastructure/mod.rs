//! 基础设施层：日志与存储

pub mod logger;
pub mod storage;
