use glam::DVec2;
use serde::Serialize;
use url::Url;

pub type ContinentId = u32;
pub type RegionId = u32;
pub type MapId = u32;
pub type PointOfInterestId = u32;

symbol!(
    pub enum PointOfInterestKind {
        Landmark,
        Waypoint,
        Vista,
        Unlock,
    }
);

/// One floor of a continent, with everything on it in continent coordinates.
#[derive(Debug, Clone, Serialize)]
pub struct Floor {
    pub continent_id: ContinentId,
    pub floor: i32,
    pub texture_dims: DVec2,
    /// bounds to clamp the camera to, if the floor has any
    pub clamped_view: Vec<DVec2>,
    pub regions: Vec<Region>,
}

impl Floor {
    pub fn maps(&self) -> impl Iterator<Item = &MapDetails> {
        self.regions.iter().flat_map(|region| region.maps.iter())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
    pub label_coord: DVec2,
    pub continent_rect: Vec<DVec2>,
    pub maps: Vec<MapDetails>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapDetails {
    pub id: MapId,
    pub region_id: RegionId,
    pub name: String,
    pub min_level: i32,
    pub max_level: i32,
    pub default_floor: i32,
    pub label_coord: DVec2,
    pub map_rect: Vec<DVec2>,
    pub continent_rect: Vec<DVec2>,
    pub points_of_interest: Vec<PointOfInterest>,
    pub tasks: Vec<RenownTask>,
    pub sectors: Vec<Sector>,
    pub skill_challenges: Vec<SkillChallenge>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PointOfInterest {
    pub id: PointOfInterestId,
    pub map_id: MapId,
    pub kind: PointOfInterestKind,
    pub name: String,
    pub floor: i32,
    pub coord: DVec2,
    pub chat_link: Option<String>,
    pub icon: Option<Url>,
}

/// A renown heart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenownTask {
    pub id: u32,
    pub map_id: MapId,
    pub objective: String,
    pub level: i32,
    pub coord: DVec2,
    pub bounds: Vec<DVec2>,
    pub chat_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sector {
    pub id: u32,
    pub map_id: MapId,
    pub name: String,
    pub level: i32,
    pub coord: DVec2,
    pub bounds: Vec<DVec2>,
    pub chat_link: Option<String>,
}

/// A hero challenge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillChallenge {
    /// `<expansion>-<index>`, only sent by v2
    pub id: Option<String>,
    pub map_id: MapId,
    pub coord: DVec2,
}
