//! Side-scrolling brawler for the terminal.
//!
//! `entities` holds pure data, `compute` the per-frame rules, `assets` and
//! `display` turn a `Session` into coloured half-block cells.

pub mod assets;
pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
