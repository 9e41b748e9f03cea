pub mod extract;
pub mod init;
pub mod localize;
mod command_result;

pub use command_result::*;
