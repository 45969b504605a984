pub mod commands;
pub mod handlers;
pub mod keyboards;
pub mod state;
pub mod views;
