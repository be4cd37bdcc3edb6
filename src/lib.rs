//! Clone-OS: a terminal dashboard shell hosting a set of AI-assisted
//! applications behind a shared sidebar.

pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod event;
pub mod infrastructure;
pub mod modules;
pub mod service;
pub mod shell;
pub mod ui;
