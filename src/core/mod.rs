pub mod cars;
pub mod config;
pub mod events;
pub mod garage;
pub mod log;
pub mod ordering;
pub mod parts;
pub mod resolve;
pub mod trackside;
