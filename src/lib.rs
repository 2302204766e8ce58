pub mod api;
pub mod clock;
pub mod config;
pub mod livestock;
pub mod pipeline;
pub mod production;
pub mod session;
pub mod tui;
