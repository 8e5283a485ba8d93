// Presentation layer - JSON API for the chart renderer and input widgets
pub mod app_state;
pub mod handlers;
