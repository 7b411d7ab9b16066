use crate::convert::{collection, number, point2, point_list, ListOrKeyed, Scalar};
use crate::discriminator::{resolve, Resolved};
use crate::error::Result as ConversionResult;
use crate::families::PointOfInterestRegistry;
use crate::model::{
    ContinentId, Floor, MapDetails, MapId, PointOfInterest, Region, RegionId, RenownTask, Sector,
    SkillChallenge,
};
use crate::prelude::*;

const V1_URL: &str = const_format::concatcp!(API_V1, "/map_floor.json");
const V2_URL: &str = const_format::concatcp!(API_V2, "/continents");

/// A floor as `/v1/map_floor.json` and `/v2/continents/:id/floors/:floor` send it. Both key regions
/// and maps by id, v2 additionally keys points of interest, tasks and sectors.
#[derive(Debug, Clone, Deserialize)]
pub struct FloorContract {
    pub texture_dims: Option<Vec<f64>>,
    pub clamped_view: Option<Vec<Vec<Scalar>>>,
    pub regions: Option<IndexMap<String, RegionContract>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegionContract {
    pub id: Option<RegionId>,
    pub name: Option<String>,
    pub label_coord: Option<Vec<f64>>,
    pub continent_rect: Option<Vec<Vec<Scalar>>>,
    pub maps: Option<IndexMap<String, MapContract>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapContract {
    pub id: Option<MapId>,
    pub name: Option<String>,
    pub min_level: Option<i32>,
    pub max_level: Option<i32>,
    pub default_floor: Option<i32>,
    pub label_coord: Option<Vec<f64>>,
    pub map_rect: Option<Vec<Vec<Scalar>>>,
    pub continent_rect: Option<Vec<Vec<Scalar>>>,
    /// resolved on their own `type`
    pub points_of_interest: Option<ListOrKeyed<Value>>,
    pub tasks: Option<ListOrKeyed<TaskContract>>,
    pub sectors: Option<ListOrKeyed<SectorContract>>,
    pub skill_challenges: Option<Vec<SkillChallengeContract>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PointOfInterestContract {
    #[serde(alias = "poi_id")]
    pub id: Scalar,
    pub name: Option<String>,
    pub floor: Option<i32>,
    pub coord: Option<Vec<f64>>,
    pub chat_link: Option<String>,
    pub icon: Option<Url>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TaskContract {
    #[serde(alias = "task_id")]
    pub id: Scalar,
    pub objective: Option<String>,
    pub level: Option<i32>,
    pub coord: Option<Vec<f64>>,
    pub bounds: Option<Vec<Vec<Scalar>>>,
    pub chat_link: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectorContract {
    #[serde(alias = "sector_id")]
    pub id: Scalar,
    pub name: Option<String>,
    pub level: Option<i32>,
    pub coord: Option<Vec<f64>>,
    pub bounds: Option<Vec<Vec<Scalar>>>,
    pub chat_link: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SkillChallengeContract {
    pub id: Option<String>,
    pub coord: Option<Vec<f64>>,
}

/// Floors, with every map pointing back to its region and everything on a map pointing back to
/// the map.
#[derive(Debug, Clone, Copy)]
pub struct FloorConverter<'r> {
    points_of_interest: &'r PointOfInterestRegistry,
}

impl<'r> FloorConverter<'r> {
    pub fn new(points_of_interest: &'r PointOfInterestRegistry) -> Self {
        Self { points_of_interest }
    }

    pub fn convert(
        &self,
        continent_id: ContinentId,
        floor: i32,
        contract: FloorContract,
    ) -> ConversionResult<Floor> {
        let regions = contract
            .regions
            .unwrap_or_default()
            .into_iter()
            .map(|(key, region)| self.region(&key, region))
            .collect::<ConversionResult<Vec<_>>>()?;
        Ok(Floor {
            continent_id,
            floor,
            texture_dims: point2(contract.texture_dims.as_deref()),
            clamped_view: point_list(contract.clamped_view)?,
            regions,
        })
    }

    fn region(&self, key: &str, region: RegionContract) -> ConversionResult<Region> {
        let id = keyed_id(region.id, key)?;
        let maps = region
            .maps
            .unwrap_or_default()
            .into_iter()
            .map(|(key, map)| self.map(id, &key, map))
            .collect::<ConversionResult<Vec<_>>>()?;
        Ok(Region {
            id,
            name: region.name.unwrap_or_default(),
            label_coord: point2(region.label_coord.as_deref()),
            continent_rect: point_list(region.continent_rect)?,
            maps,
        })
    }

    fn map(&self, region_id: RegionId, key: &str, map: MapContract) -> ConversionResult<MapDetails> {
        let id = keyed_id(map.id, key)?;
        Ok(MapDetails {
            id,
            region_id,
            name: map.name.unwrap_or_default(),
            min_level: map.min_level.unwrap_or_default(),
            max_level: map.max_level.unwrap_or_default(),
            default_floor: map.default_floor.unwrap_or_default(),
            label_coord: point2(map.label_coord.as_deref()),
            map_rect: point_list(map.map_rect)?,
            continent_rect: point_list(map.continent_rect)?,
            points_of_interest: collection(
                map.points_of_interest.map(ListOrKeyed::into_values),
                |raw| self.point_of_interest(id, raw),
            )?,
            tasks: collection(map.tasks.map(ListOrKeyed::into_values), |task| {
                Ok(RenownTask {
                    id: number(&task.id)?,
                    map_id: id,
                    objective: task.objective.unwrap_or_default(),
                    level: task.level.unwrap_or_default(),
                    coord: point2(task.coord.as_deref()),
                    bounds: point_list(task.bounds)?,
                    chat_link: task.chat_link,
                })
            })?,
            sectors: collection(map.sectors.map(ListOrKeyed::into_values), |sector| {
                Ok(Sector {
                    id: number(&sector.id)?,
                    map_id: id,
                    name: sector.name.unwrap_or_default(),
                    level: sector.level.unwrap_or_default(),
                    coord: point2(sector.coord.as_deref()),
                    bounds: point_list(sector.bounds)?,
                    chat_link: sector.chat_link,
                })
            })?,
            skill_challenges: collection(map.skill_challenges, |challenge| {
                Ok(SkillChallenge {
                    id: challenge.id,
                    map_id: id,
                    coord: point2(challenge.coord.as_deref()),
                })
            })?,
        })
    }

    pub fn point_of_interest(
        &self,
        map_id: MapId,
        raw: Value,
    ) -> ConversionResult<PointOfInterest> {
        let Resolved { kind, contract, .. } = resolve(raw, self.points_of_interest)?;
        Ok(PointOfInterest {
            id: number(&contract.id)?,
            map_id,
            kind,
            name: contract.name.unwrap_or_default(),
            floor: contract.floor.unwrap_or_default(),
            coord: point2(contract.coord.as_deref()),
            chat_link: contract.chat_link,
            icon: contract.icon,
        })
    }
}

/// the entry's own id, else its key
fn keyed_id(id: Option<u32>, key: &str) -> ConversionResult<u32> {
    match id {
        Some(id) => Ok(id),
        None => number(&Scalar::from(key)),
    }
}

/// A floor from the legacy v1 api.
pub fn get_floor<C: ServiceClient>(
    client: &C,
    registries: &Registries,
    continent_id: ContinentId,
    floor: i32,
) -> Result<Response<Floor>> {
    let request = Request::new(V1_URL)
        .query("continent_id", continent_id)
        .query("floor", floor);
    fetch_floor(client, registries, &request, continent_id, floor)
}

/// A floor from v2.
pub fn get_floor_v2<C: ServiceClient>(
    client: &C,
    registries: &Registries,
    continent_id: ContinentId,
    floor: i32,
) -> Result<Response<Floor>> {
    let request = Request::new(V2_URL)
        .segment(continent_id)
        .segment("floors")
        .segment(floor);
    fetch_floor(client, registries, &request, continent_id, floor)
}

fn fetch_floor<C: ServiceClient>(
    client: &C,
    registries: &Registries,
    request: &Request,
    continent_id: ContinentId,
    floor: i32,
) -> Result<Response<Floor>> {
    let response = client
        .send::<FloorContract>(request)
        .wrap_err_with(|| format!("failed to get floor {floor} of continent {continent_id}"))?;
    let converter = FloorConverter::new(&registries.points_of_interest);
    let response = response
        .try_map(|contract| converter.convert(continent_id, floor, contract))
        .wrap_err_with(|| format!("failed to convert floor {floor} of continent {continent_id}"))?;
    debug!(
        continent_id,
        floor,
        regions = response.content.regions.len(),
        maps = response.content.maps().count(),
        "converted floor"
    );
    Ok(response)
}
