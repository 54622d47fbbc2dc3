pub mod config;
pub mod fs;
pub mod history;
pub mod init;
pub mod mkcd;
pub mod navigate;
pub mod output;
pub mod paths;
pub mod shell;
pub mod summary;
