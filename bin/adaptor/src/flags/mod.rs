//! CLI flags.

mod globals;
pub use globals::GlobalArgs;

mod rpc;
pub use rpc::RpcArgs;

mod fetch;
pub use fetch::FetchArgs;
