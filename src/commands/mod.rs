pub mod filters;
pub mod init;

pub use filters::{clean, smudge};
pub use init::init;
