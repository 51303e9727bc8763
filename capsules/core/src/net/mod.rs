pub mod socket_mux;

pub use socket_mux::{Event, SocketId, SocketMux, SOCKET_CAPACITY};
