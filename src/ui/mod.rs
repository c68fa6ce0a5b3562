pub mod messages;
pub mod prompt;
pub mod sheet;
