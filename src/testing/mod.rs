//! Test support: an in-memory transport with canned replies and call accounting.

pub mod mock_transport;

pub use mock_transport::MockTransport;
