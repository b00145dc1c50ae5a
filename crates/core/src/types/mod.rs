//! Core types for Dealflow.
//!
//! Entity records use the record store's column names on the wire
//! (`Id`, `name_c`, `contact_id_c`, ...) and idiomatic names in Rust.

pub mod activity;
pub mod coerce;
pub mod contact;
pub mod deal;
pub mod id;
pub mod patch;
pub mod stage;

pub use activity::{Activity, ActivityPatch, NewActivity};
pub use coerce::CoerceError;
pub use contact::{Contact, ContactPatch, NewContact};
pub use deal::{Deal, DealPatch, NewDeal};
pub use id::*;
pub use patch::PatchField;
pub use stage::DealStage;
