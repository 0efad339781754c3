// src/lib.rs

pub mod api;
pub mod classify;
pub mod config;
pub mod extract;
pub mod respond;
pub mod state;
