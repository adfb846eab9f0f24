//! 服务器启动准备与优雅退出

pub mod shutdown;
pub mod startup;
