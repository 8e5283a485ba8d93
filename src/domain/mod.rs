// Domain layer - Query configuration, chart data and catalog models
pub mod catalog;
pub mod chart;
pub mod errors;
pub mod notification;
pub mod query;
