pub mod chart;
pub mod markdown;
