//! Board-level error type. Capsule errors are `kernel::errorcode::ErrorCode`;
//! this layer adds the failures only the board sees — binding listener
//! sockets, reading and replaying the persisted configuration script.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("failed to bind {what} on port {port}: {source}")]
    Bind {
        what: &'static str,
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("socket registration failed: {0}")]
    Registration(#[from] kernel::errorcode::ErrorCode),

    #[error("could not read config file {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write config file {path}: {source}")]
    ConfigWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
