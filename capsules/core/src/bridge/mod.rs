pub mod background_pump;
pub mod command_channel;
pub mod data_channel;
pub mod telnet;

pub use background_pump::BackgroundPump;
pub use command_channel::CommandChannel;
pub use data_channel::DataChannel;

/// Shared constant bounding the command receive buffer, command send
/// buffer, and data-channel send buffer, matching the original's single
/// `buffer_size` used for all three `os_malloc` allocations.
pub const BUFFER_SIZE: usize = 512;
