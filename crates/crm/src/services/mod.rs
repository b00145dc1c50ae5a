//! Resource services: typed CRUD over the record store tables.
//!
//! One generic [`ResourceService`] is instantiated per table:
//!
//! | Service              | Table        | Relation lookup             |
//! |----------------------|--------------|-----------------------------|
//! | [`ContactsService`]  | `contact_c`  | -                           |
//! | [`DealsService`]     | `deal_c`     | by contact, unordered       |
//! | [`ActivitiesService`]| `activity_c` | by contact, newest first    |
//!
//! The record client is injected, never read from global scope, so tests
//! can substitute an in-memory store.

mod activities;
mod contacts;
mod deals;
mod error;
mod policy;
mod resource;

pub use activities::{ActivityCreateRecord, ActivityResource};
pub use contacts::{ContactCreateRecord, ContactResource};
pub use deals::{DealCreateRecord, DealResource};
pub use error::{Operation, ServiceError};
pub use policy::{OnError, ReadPolicies};
pub use resource::{CONTACT_FIELD, ContactScoped, Resource, ResourceService};

/// CRUD over `contact_c`.
pub type ContactsService<C> = ResourceService<C, ContactResource>;
/// CRUD over `deal_c`.
pub type DealsService<C> = ResourceService<C, DealResource>;
/// CRUD over `activity_c`.
pub type ActivitiesService<C> = ResourceService<C, ActivityResource>;
