pub mod backup_exchange;
pub mod core;
pub mod export;
pub mod history;
pub mod marks;
pub mod roster;
