pub mod init;
pub mod logs_dedupe;
pub mod logs_stats;
pub mod range_describe;
pub mod range_quick;
pub mod range_resolve;
pub mod range_validate;
