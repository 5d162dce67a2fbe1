//! Infrastructure Layer
//!
//! This module contains the adapters (implementations) for the ports defined
//! in the application layer. Following hexagonal architecture:
//!
//! - **Driven Adapters (Outbound)**
//!   - `gateway/`: Paper fill simulator and live broker gateways
//!   - `persistence/`: JSON snapshot state store
//!
//! - **Composition**
//!   - `config/`: Dependency injection container

pub mod config;
pub mod gateway;
pub mod persistence;
