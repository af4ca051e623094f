//! The relay itself: upstream transport seam, request handler, HTTP server

mod handler;
pub mod server;
mod transport;

pub use handler::RelayHandler;
pub use server::{run_server, RelayState};
pub use transport::{HttpTransport, TransportError, UpstreamReply, UpstreamTransport};
