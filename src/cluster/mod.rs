pub mod locator;
pub mod operation;
pub mod server;
pub mod split;

pub use locator::{Locator, ParseLocatorError};
pub use operation::{ClusterOperation, OperationKey, OperationType};
pub use server::{DnsConfig, Server, ServerRole};
pub use split::split_servers;
