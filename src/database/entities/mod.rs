pub mod charts;
pub mod chat_turns;
pub mod projects;
