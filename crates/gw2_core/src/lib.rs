//! Shared plumbing for the gw2api crates: one prelude for the common stack,
//! tracing installation and the api configuration.
pub mod config;
pub mod trace;

pub mod prelude {
    pub use crate::config::{ApiConfig, Locale};
    pub use enumflags2::{self, bitflags, BitFlag, BitFlags};
    pub use glam::{DVec2, DVec3};
    pub use indexmap::{self, IndexMap};
    pub use itertools::Itertools;
    pub use miette;
    pub use miette::{bail, Context, Diagnostic, IntoDiagnostic, Result, WrapErr};
    pub use rayon;
    pub use serde;
    pub use serde::{de::DeserializeOwned, Deserialize, Serialize};
    pub use serde_json::{from_str, from_value, Map, Value};
    pub use std::sync::Arc;
    pub use thiserror::{self, Error};
    pub use time::OffsetDateTime;
    pub use tracing::{
        debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
    };
    pub use ureq;
    pub use url::Url;
    pub use uuid::Uuid;
}
