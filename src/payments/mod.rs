//! Payment relay building blocks
//!
//! - `catalog`: fixed price list (always compiled)
//! - `gateway`: YooKassa client behind the `PaymentGateway` trait (`api`)
//! - `ledger`: JSON-lines record of succeeded payments (`api`)

pub mod catalog;

#[cfg(feature = "api")]
pub mod gateway;
#[cfg(feature = "api")]
pub mod ledger;

pub use catalog::{ServiceOffer, ServiceType, CURRENCY};

#[cfg(feature = "api")]
pub use gateway::{GatewayError, GatewayResponse, PaymentGateway, PaymentRequest, YooKassaGateway};
#[cfg(feature = "api")]
pub use ledger::{PaymentLedger, PaymentRecord};
