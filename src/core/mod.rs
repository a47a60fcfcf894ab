//! 核心层：错误、响应、中间件、时钟与页面调度

pub mod clock;
pub mod error;
pub mod middleware;
pub mod notification;
pub mod response;
pub mod scheduler;
