pub mod process_time;
pub mod rate_limit;
