pub mod emit;
pub mod events;
pub mod handler;
pub mod init;
pub mod processor;
pub mod response;
