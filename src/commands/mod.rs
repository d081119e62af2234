pub mod init;
pub mod search;
