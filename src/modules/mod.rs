//! Application views
//!
//! Each view implements `AppView` and owns its own:
//! - Key handling
//! - Service calls and their replies
//! - Rendering inside the content area
//!
//! Views:
//! - terminal: command line and autonomous agent pipeline
//! - chat: conversation with the assistant
//! - code: editor with completion, analysis and tests
//! - social: accounts, feed and sentiment
//! - vault: knowledge items, filtering and export
//! - ops: telemetry and service health

pub mod chat;
pub mod code;
pub mod ops;
pub mod social;
pub mod terminal;
pub mod vault;

use crossterm::event::KeyCode;

use crate::shell::NavigationEntry;

/// Built-in applications in sidebar order. The first one is active at start.
pub const DEFAULT_APPS: [NavigationEntry; 6] = [
    NavigationEntry::new(terminal::ID, "Mesh Terminal", ">_", terminal::mount)
        .with_shortcut(KeyCode::F(1)),
    NavigationEntry::new(chat::ID, "Neural Chat", "◆", chat::mount).with_shortcut(KeyCode::F(2)),
    NavigationEntry::new(code::ID, "Code Lab", "{}", code::mount).with_shortcut(KeyCode::F(3)),
    NavigationEntry::new(social::ID, "Social Hub", "@", social::mount)
        .with_shortcut(KeyCode::F(4)),
    NavigationEntry::new(vault::ID, "Knowledge Vault", "▤", vault::mount)
        .with_shortcut(KeyCode::F(5)),
    NavigationEntry::new(ops::ID, "Ops Center", "≋", ops::mount).with_shortcut(KeyCode::F(6)),
];
