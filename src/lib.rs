pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod formatter;
pub mod handlers;
pub mod models;
pub mod price_board;
pub mod sample;
pub mod views;
