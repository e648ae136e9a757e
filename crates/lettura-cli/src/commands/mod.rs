pub mod history;
pub mod init;
pub mod sample;
pub mod segment;
pub mod study;
