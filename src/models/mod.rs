pub mod car;
pub mod event;
pub mod location;
pub mod part;
pub mod session;
pub mod setup;
pub mod table_value;
pub mod track;
