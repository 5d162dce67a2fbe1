//! Execution gateways.
//!
//! - [`PaperGateway`]: simulated venue backed by [`FillSimulator`]
//! - [`LiveGateway`]: forwards to an external [`Broker`](crate::application::ports::Broker)

mod fill_simulator;
mod live;
mod paper;
mod retry;

pub use fill_simulator::FillSimulator;
pub use live::LiveGateway;
pub use paper::{PaperGateway, PaperGatewayConfig};
pub use retry::SchedulingRetryPolicy;
