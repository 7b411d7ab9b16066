use crate::convert::{flags, number, number_or, point2, point3, point_list, Scalar};
use crate::discriminator::{resolve, Resolved};
use crate::error::ConversionError;
use crate::families::LocationRegistry;
use crate::model::{DynamicEvent, Location, MapId, RenderIcon};
use crate::prelude::*;

const E_P_URL: &str = const_format::concatcp!(API_V1, "/event_details.json");

/// `/v1/event_details.json`, events keyed by their guid.
#[derive(Debug, Clone, Deserialize)]
pub struct EventDetailsContract {
    #[serde(default)]
    pub events: IndexMap<String, EventContract>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventContract {
    pub name: Option<String>,
    pub level: Option<i32>,
    pub map_id: Option<MapId>,
    pub flags: Option<Vec<String>>,
    /// resolved on its own `type`
    pub location: Option<Value>,
    pub icon: Option<RenderIconContract>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderIconContract {
    pub file_id: Scalar,
    pub signature: String,
}

/// Event location after `type` was resolved.
#[derive(Debug, Clone)]
pub enum LocationContract {
    Sphere(SphereLocationContract),
    Cylinder(CylinderLocationContract),
    Polygon(PolygonLocationContract),
    Unknown(UnknownLocationContract),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SphereLocationContract {
    pub center: Option<Vec<f64>>,
    pub radius: Option<Scalar>,
    pub rotation: Option<Scalar>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CylinderLocationContract {
    pub center: Option<Vec<f64>>,
    pub height: Option<Scalar>,
    pub radius: Option<Scalar>,
    pub rotation: Option<Scalar>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PolygonLocationContract {
    pub center: Option<Vec<f64>>,
    pub z_range: Option<Vec<f64>>,
    pub points: Option<Vec<Vec<Scalar>>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnknownLocationContract {
    pub center: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Copy)]
pub struct EventConverter<'r> {
    locations: &'r LocationRegistry,
}

impl<'r> EventConverter<'r> {
    pub fn new(locations: &'r LocationRegistry) -> Self {
        Self { locations }
    }

    /// every event of the document, in document order
    pub fn convert_all(
        &self,
        details: EventDetailsContract,
    ) -> crate::error::Result<Vec<DynamicEvent>> {
        details
            .events
            .into_iter()
            .map(|(id, event)| self.convert(&id, event))
            .collect()
    }

    pub fn convert(&self, id: &str, event: EventContract) -> crate::error::Result<DynamicEvent> {
        let id = Uuid::parse_str(id).map_err(|source| ConversionError::InvalidIdentifier {
            text: id.to_string(),
            source,
        })?;
        Ok(DynamicEvent {
            id,
            name: event.name.unwrap_or_default(),
            level: event.level.unwrap_or_default(),
            map_id: event.map_id.unwrap_or_default(),
            flags: flags(event.flags.as_deref()),
            location: match event.location {
                Some(location) => self.location(location)?,
                None => Location::Unknown { center: DVec3::ZERO },
            },
            icon: event
                .icon
                .map(|icon| -> crate::error::Result<RenderIcon> {
                    Ok(RenderIcon {
                        file_id: number(&icon.file_id)?,
                        signature: icon.signature,
                    })
                })
                .transpose()?,
        })
    }

    pub fn location(&self, raw: Value) -> crate::error::Result<Location> {
        let Resolved { contract, .. } = resolve(raw, self.locations)?;
        Ok(match contract {
            LocationContract::Sphere(sphere) => Location::Sphere {
                center: point3(sphere.center.as_deref()),
                radius: number_or(sphere.radius.as_ref(), 0.0)?,
                rotation: number_or(sphere.rotation.as_ref(), 0.0)?,
            },
            LocationContract::Cylinder(cylinder) => Location::Cylinder {
                center: point3(cylinder.center.as_deref()),
                height: number_or(cylinder.height.as_ref(), 0.0)?,
                radius: number_or(cylinder.radius.as_ref(), 0.0)?,
                rotation: number_or(cylinder.rotation.as_ref(), 0.0)?,
            },
            LocationContract::Polygon(polygon) => Location::Polygon {
                center: point3(polygon.center.as_deref()),
                z_range: point2(polygon.z_range.as_deref()),
                points: point_list(polygon.points)?,
            },
            LocationContract::Unknown(unknown) => Location::Unknown {
                center: point3(unknown.center.as_deref()),
            },
        })
    }
}

/// All events, or only `event_id`.
pub fn get_event_details<C: ServiceClient>(
    client: &C,
    registries: &Registries,
    event_id: Option<Uuid>,
) -> Result<Response<Vec<DynamicEvent>>> {
    let mut request = Request::new(E_P_URL);
    if let Some(event_id) = event_id {
        request = request.query("event_id", event_id);
    }
    let response = client
        .send::<EventDetailsContract>(&request)
        .wrap_err_with(|| format!("failed to get {E_P_URL}"))?;
    let converter = EventConverter::new(&registries.locations);
    let response = response
        .try_map(|details| converter.convert_all(details))
        .wrap_err("failed to convert event details")?;
    debug!(events = response.content.len(), "converted event details");
    Ok(response)
}

#[cfg(test)]
mod test {
    use rstest::*;
    use serde_json::json;
    use similar_asserts::assert_eq;

    use super::*;
    use crate::client::fake::FixtureClient;
    use crate::model::{EventFlag, LocationKind};

    const EVENT_DETAILS_JSON: &str = include_str!("event_details.json");

    #[fixture]
    fn converter() -> EventConverter<'static> {
        EventConverter::new(&Registries::global().locations)
    }

    #[fixture]
    fn events(converter: EventConverter<'static>) -> Vec<DynamicEvent> {
        let details = serde_json::from_str(EVENT_DETAILS_JSON).expect("fixture is valid json");
        converter.convert_all(details).expect("fixture events convert")
    }

    #[rstest]
    fn events_keep_document_order(events: Vec<DynamicEvent>) {
        assert_eq!(
            events.iter().map(|event| event.location.kind()).collect::<Vec<_>>(),
            vec![
                LocationKind::Sphere,
                LocationKind::Cylinder,
                LocationKind::Polygon,
                LocationKind::Unknown
            ]
        );
        assert_eq!(
            events[0].id,
            Uuid::parse_str("eed8a79f-b374-4ae6-ba6f-b7b98d9d7142").expect("valid guid")
        );
        assert_eq!(events[0].map_id, 20);
        assert_eq!(
            events[0].location,
            Location::Sphere {
                center: DVec3::new(-9463.6, -40310.2, -785.799),
                radius: 2500.0,
                rotation: 0.0
            }
        );
    }

    #[rstest]
    fn cylinder_with_empty_center(events: Vec<DynamicEvent>) {
        assert_eq!(
            events[1].location,
            Location::Cylinder {
                center: DVec3::ZERO,
                height: 0.0,
                radius: 0.0,
                rotation: 0.0
            }
        );
        let icon = events[1].icon.as_ref().expect("icon");
        assert_eq!(icon.file_id, 102439);
        assert!(icon.url().ends_with("/102439.png"));
    }

    #[rstest]
    fn polygon_points(events: Vec<DynamicEvent>) {
        let Location::Polygon {
            z_range, points, ..
        } = &events[2].location
        else {
            panic!("expected a polygon, got {:?}", events[2].location);
        };
        assert_eq!(*z_range, DVec2::new(-2000.0, 500.0));
        assert_eq!(
            points,
            &vec![
                DVec2::new(-18000.5, 13000.0),
                DVec2::new(-16000.0, 15500.25),
                // a triple is not a point
                DVec2::ZERO,
            ]
        );
    }

    #[rstest]
    fn flags_are_or_composed(events: Vec<DynamicEvent>) {
        assert_eq!(events[0].flags, BitFlags::empty());
        assert_eq!(events[1].flags, EventFlag::GroupEvent | EventFlag::MapWide);
        assert_eq!(events[2].flags, BitFlags::from(EventFlag::MetaEvent));
        assert_eq!(events[3].flags, BitFlags::from(EventFlag::DungeonEvent));
        assert_eq!(
            events[3].location,
            Location::Unknown {
                center: DVec3::new(100.0, 200.0, 300.0)
            }
        );
    }

    #[rstest]
    #[case(json!({"type": "cylinder", "center": [], "height": 0, "radius": 0, "rotation": 0}), LocationKind::Cylinder)]
    #[case(json!({"type": "Polygon"}), LocationKind::Polygon)]
    #[case(json!({"type": "SPHERE"}), LocationKind::Sphere)]
    #[case(json!({}), LocationKind::Unknown)]
    fn location_kinds(
        converter: EventConverter<'static>,
        #[case] raw: Value,
        #[case] kind: LocationKind,
    ) {
        let location = converter.location(raw).expect("location converts");
        assert_eq!(location.kind(), kind);
    }

    #[rstest]
    fn missing_location_is_unknown(converter: EventConverter<'static>) {
        let event: EventContract =
            serde_json::from_value(json!({"name": "Nowhere"})).expect("minimal event");
        let event = converter
            .convert("EED8A79F-B374-4AE6-BA6F-B7B98D9D7142", event)
            .expect("event converts");
        assert_eq!(event.location, Location::Unknown { center: DVec3::ZERO });
        assert_eq!(event.icon, None);
    }

    #[rstest]
    fn invalid_guid_fails(converter: EventConverter<'static>) {
        let event: EventContract = serde_json::from_value(json!({})).expect("minimal event");
        let error = converter.convert("not-a-guid", event).expect_err("invalid guid");
        assert!(
            matches!(error, ConversionError::InvalidIdentifier { ref text, .. } if text == "not-a-guid")
        );
    }

    #[rstest]
    fn single_event_request() {
        let client = FixtureClient::fixed(EVENT_DETAILS_JSON);
        let id = Uuid::parse_str("EED8A79F-B374-4AE6-BA6F-B7B98D9D7142").expect("valid guid");
        let response =
            get_event_details(&client, Registries::global(), Some(id)).expect("fixture events");
        assert_eq!(response.content.len(), 4);
        let sent = client.sent();
        assert_eq!(sent[0].path(), "v1/event_details.json");
        assert_eq!(
            sent[0].query_value("event_id"),
            Some("eed8a79f-b374-4ae6-ba6f-b7b98d9d7142")
        );
    }
}
