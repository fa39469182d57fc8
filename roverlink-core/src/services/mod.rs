pub mod command;

pub use command::CommandService;
