pub mod connect;
pub mod header;
pub mod help;
pub mod status;
pub mod terminal;
