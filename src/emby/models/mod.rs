pub mod items;
pub mod plugin;
pub mod tasks;
