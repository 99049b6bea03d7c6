pub mod init;
pub mod profiles;
pub mod resolve;
pub mod token;
