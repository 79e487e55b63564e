pub mod base;
pub mod tcp;

pub use base::BasicConnection;
pub use tcp::TcpConnection;
