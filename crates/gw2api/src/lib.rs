//! Client for the Guild Wars 2 public api.
//!
//! Most endpoints answer with json objects whose shape depends on a discriminator field (`type`,
//! `unlock_type` ...). Those payloads go through one pipeline:
//! 1. [discriminator::resolve] looks the discriminator up in the family's [discriminator::Registry]
//!    and decodes the remaining fields into the registered contract
//! 2. an entity converter turns the contract into a [model] entity, using the field converters in
//!    [convert] and recursing into nested families (eg: item -> consumable -> unlock)
//!
//! Unrecognized discriminators never fail, they resolve to the family's unknown variant.
//! All registries live in [Registries], built once and shared by reference.
//!
//! resources:
//! 1. https://wiki.guildwars2.com/wiki/API:Main
//! 2. https://wiki.guildwars2.com/wiki/API:1
//! 3. https://wiki.guildwars2.com/wiki/API:2
pub mod client;
pub mod convert;
pub mod discriminator;
pub mod end_point;
pub mod error;
pub mod families;
pub mod model;

pub use client::{ApiError, HttpServiceClient, Request, Response, ServiceClient};
pub use error::ConversionError;
pub use families::Registries;

pub(crate) mod prelude {
    pub use crate::client::{Request, Response, ServiceClient};
    pub use crate::end_point::{EndPoint, EndPointIds};
    pub use crate::families::Registries;
    pub use gw2_core::prelude::*;
    pub const API_V1: &str = "v1";
    pub const API_V2: &str = "v2";
}
