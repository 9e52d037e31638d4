pub mod charts;
pub mod chat;
pub mod health;
pub mod projects;
