//! Domain types mirroring the school backend contracts.

pub mod auth;
pub mod expense;
pub mod fee_item;
pub mod invoice;
pub mod payment;
pub mod refund;
pub mod school;
pub mod staff;
pub mod student;
pub mod types;
