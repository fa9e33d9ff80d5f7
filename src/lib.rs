// The binary in main.rs drives the terminal; everything it renders and
// persists lives here so integration tests can reach it.

pub mod app;
pub mod config;
pub mod event;
pub mod session;
pub mod store;
pub mod swipe;
pub mod ui;
pub mod word;
