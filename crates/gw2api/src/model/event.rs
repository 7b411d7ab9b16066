use enumflags2::{bitflags, BitFlags};
use glam::{DVec2, DVec3};
use serde::Serialize;
use uuid::Uuid;

use super::MapId;

symbol!(
    /// `type` of an event location
    pub enum LocationKind {
        Sphere,
        Cylinder,
        #[strum(serialize = "poly", serialize = "polygon")]
        Polygon,
    }
);

#[bitflags]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EventFlag {
    GroupEvent = 1 << 0,
    MapWide = 1 << 1,
    MetaEvent = 1 << 2,
    DungeonEvent = 1 << 3,
}

#[derive(Debug, Clone, Serialize)]
pub struct DynamicEvent {
    pub id: Uuid,
    pub name: String,
    pub level: i32,
    pub map_id: MapId,
    pub flags: BitFlags<EventFlag>,
    pub location: Location,
    pub icon: Option<RenderIcon>,
}

/// Where an event takes place, in map coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Location {
    Sphere {
        center: DVec3,
        radius: f64,
        rotation: f64,
    },
    Cylinder {
        center: DVec3,
        height: f64,
        radius: f64,
        rotation: f64,
    },
    Polygon {
        center: DVec3,
        /// min and max height
        z_range: DVec2,
        points: Vec<DVec2>,
    },
    Unknown {
        center: DVec3,
    },
}

impl Location {
    pub fn kind(&self) -> LocationKind {
        match self {
            Location::Sphere { .. } => LocationKind::Sphere,
            Location::Cylinder { .. } => LocationKind::Cylinder,
            Location::Polygon { .. } => LocationKind::Polygon,
            Location::Unknown { .. } => LocationKind::Unknown,
        }
    }

    pub fn center(&self) -> DVec3 {
        match self {
            Location::Sphere { center, .. }
            | Location::Cylinder { center, .. }
            | Location::Polygon { center, .. }
            | Location::Unknown { center } => *center,
        }
    }
}

/// An icon served by the render service (`https://render.guildwars2.com/file/<signature>/<file_id>.png`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderIcon {
    pub file_id: u32,
    pub signature: String,
}

impl RenderIcon {
    pub fn url(&self) -> String {
        format!(
            "https://render.guildwars2.com/file/{}/{}.png",
            self.signature, self.file_id
        )
    }
}
