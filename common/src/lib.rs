pub mod anchor;
pub mod batch;
pub mod currency;
pub mod herb;
pub mod identity;
pub mod location;
pub mod payment;
pub mod photo;
pub mod trace;
pub mod transaction;
