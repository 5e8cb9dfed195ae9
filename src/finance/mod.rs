//! Client-side computations over rows already fetched from the backend.

pub mod fees;
pub mod filters;
pub mod ledger;
pub mod summary;
