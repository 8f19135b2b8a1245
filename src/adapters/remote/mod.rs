//! Remote file server adapters

pub mod ftp;
pub mod traits;

pub use ftp::FtpFeedClient;
pub use traits::RemoteFileClient;
