pub mod fetch;
pub mod init;
pub mod status;
