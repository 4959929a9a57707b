// Resource clients, one module per remote resource family.

pub mod config;
pub mod health;
pub mod history;
pub mod updater;
