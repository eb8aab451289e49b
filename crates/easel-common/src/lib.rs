pub mod errors;
pub mod id;
pub mod types;

pub use errors::{BridgeError, CodecError, ConfigError, EaselError, HostError, TransferError};
pub use id::{new_correlation_id, new_id};
pub use types::{Dimensions, SurfaceTab};

pub type Result<T> = std::result::Result<T, EaselError>;
