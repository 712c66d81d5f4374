//! JSON persistence, one file per registry.
//!
//! Each owner's links are written verbatim as their snapshots under
//! `pilotLink`, `crewLink`, `planeLink` and `locationLink`. On load, owners
//! are rebuilt against a [`ModelHandle`] before any target registry exists;
//! their ids resolve once the handle is installed.

use crate::{ItemManager, Model, ModelHandle};
use serde::de::{self, DeserializeOwned, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use wingman_core::{
    CrewLocationRole, EntityType, Flight, FlightCrewRole, FlightLocationRole, FlightPilotRole,
    FlightPlaneRole, Item, ItemLookup, Link, LinkSnapshot, Location, PilotLocationRole,
    PlaneLocationRole, Resolvers, RoleTag, StorageError, ValidationError, WingmanConfig, CREW_FLIGHT_SHAPE,
    CREW_LOCATION_SHAPE, LOCATION_FLIGHT_SHAPE, PILOT_FLIGHT_SHAPE, PILOT_LOCATION_SHAPE,
    PLANE_FLIGHT_SHAPE, PLANE_LOCATION_SHAPE,
};

// ============================================================================
// RECORDS
// ============================================================================

/// On-disk envelope for one registry.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryFile<T> {
    pub items: Vec<T>,
}

/// Persisted form of a [`Flight`]. A missing link field loads as an empty link.
///
/// Unknown fields and a role key repeated inside one link are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FlightRecord {
    pub id: Option<String>,
    pub code: Option<String>,
    #[serde(default, deserialize_with = "strict_snapshot")]
    pub pilot_link: Option<LinkSnapshot<FlightPilotRole>>,
    #[serde(default, deserialize_with = "strict_snapshot")]
    pub crew_link: Option<LinkSnapshot<FlightCrewRole>>,
    #[serde(default, deserialize_with = "strict_snapshot")]
    pub plane_link: Option<LinkSnapshot<FlightPlaneRole>>,
    #[serde(default, deserialize_with = "strict_snapshot")]
    pub location_link: Option<LinkSnapshot<FlightLocationRole>>,
}

impl From<&Flight> for FlightRecord {
    fn from(flight: &Flight) -> Self {
        Self {
            id: Some(flight.id.clone()),
            code: Some(flight.code.clone()),
            pilot_link: Some(flight.pilot_link.snapshot()),
            crew_link: Some(flight.crew_link.snapshot()),
            plane_link: Some(flight.plane_link.snapshot()),
            location_link: Some(flight.location_link.snapshot()),
        }
    }
}

impl FlightRecord {
    /// Rebuild the flight. No link id is resolved here.
    pub fn into_flight(self, resolvers: &Resolvers) -> Result<Flight, StorageError> {
        let id = required(EntityType::Flight, "?", "id", self.id)?;
        let code = required(EntityType::Flight, &id, "code", self.code)?;
        let corrupt = |e: wingman_core::LinkError| corrupt_record(EntityType::Flight, &id, e);

        Ok(Flight {
            pilot_link: Link::rebuild_or_empty(
                &PILOT_FLIGHT_SHAPE,
                self.pilot_link,
                resolvers.pilots.clone(),
            )
            .map_err(corrupt)?,
            crew_link: Link::rebuild_or_empty(
                &CREW_FLIGHT_SHAPE,
                self.crew_link,
                resolvers.crew.clone(),
            )
            .map_err(corrupt)?,
            plane_link: Link::rebuild_or_empty(
                &PLANE_FLIGHT_SHAPE,
                self.plane_link,
                resolvers.planes.clone(),
            )
            .map_err(corrupt)?,
            location_link: Link::rebuild_or_empty(
                &LOCATION_FLIGHT_SHAPE,
                self.location_link,
                resolvers.locations.clone(),
            )
            .map_err(corrupt)?,
            code,
            id,
        })
    }
}

/// Persisted form of a [`Location`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LocationRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "strict_snapshot")]
    pub crew_link: Option<LinkSnapshot<CrewLocationRole>>,
    #[serde(default, deserialize_with = "strict_snapshot")]
    pub pilot_link: Option<LinkSnapshot<PilotLocationRole>>,
    #[serde(default, deserialize_with = "strict_snapshot")]
    pub plane_link: Option<LinkSnapshot<PlaneLocationRole>>,
}

impl From<&Location> for LocationRecord {
    fn from(location: &Location) -> Self {
        Self {
            id: Some(location.id.clone()),
            name: Some(location.name.clone()),
            crew_link: Some(location.crew_link.snapshot()),
            pilot_link: Some(location.pilot_link.snapshot()),
            plane_link: Some(location.plane_link.snapshot()),
        }
    }
}

impl LocationRecord {
    pub fn into_location(self, resolvers: &Resolvers) -> Result<Location, StorageError> {
        let id = required(EntityType::Location, "?", "id", self.id)?;
        let name = required(EntityType::Location, &id, "name", self.name)?;
        let corrupt = |e: wingman_core::LinkError| corrupt_record(EntityType::Location, &id, e);

        Ok(Location {
            crew_link: Link::rebuild_or_empty(
                &CREW_LOCATION_SHAPE,
                self.crew_link,
                resolvers.crew.clone(),
            )
            .map_err(corrupt)?,
            pilot_link: Link::rebuild_or_empty(
                &PILOT_LOCATION_SHAPE,
                self.pilot_link,
                resolvers.pilots.clone(),
            )
            .map_err(corrupt)?,
            plane_link: Link::rebuild_or_empty(
                &PLANE_LOCATION_SHAPE,
                self.plane_link,
                resolvers.planes.clone(),
            )
            .map_err(corrupt)?,
            name,
            id,
        })
    }
}

// ============================================================================
// LINK SNAPSHOT DECODING
// ============================================================================

/// A link object whose role keys must be unique.
struct StrictSnapshot<R: RoleTag>(LinkSnapshot<R>);

struct StrictSnapshotVisitor<R> {
    _phantom: PhantomData<R>,
}

impl<'de, R: RoleTag> Visitor<'de> for StrictSnapshotVisitor<R> {
    type Value = StrictSnapshot<R>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map from role to a list of ids, each role at most once")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut snapshot = LinkSnapshot::new();
        while let Some(role) = map.next_key::<R>()? {
            let ids: Vec<String> = map.next_value()?;
            if snapshot.insert(role, ids).is_some() {
                return Err(de::Error::custom(format!("role {role} listed more than once")));
            }
        }
        Ok(StrictSnapshot(snapshot))
    }
}

impl<'de, R: RoleTag> Deserialize<'de> for StrictSnapshot<R> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(StrictSnapshotVisitor {
            _phantom: PhantomData,
        })
    }
}

fn strict_snapshot<'de, D, R>(deserializer: D) -> Result<Option<LinkSnapshot<R>>, D::Error>
where
    D: Deserializer<'de>,
    R: RoleTag,
{
    let snapshot = Option::<StrictSnapshot<R>>::deserialize(deserializer)?;
    Ok(snapshot.map(|StrictSnapshot(inner)| inner))
}

fn required(
    entity_type: EntityType,
    id: &str,
    field: &'static str,
    value: Option<String>,
) -> Result<String, StorageError> {
    value.ok_or_else(|| {
        corrupt_record(
            entity_type,
            id,
            ValidationError::RequiredFieldMissing {
                field: field.to_string(),
            },
        )
    })
}

fn corrupt_record(entity_type: EntityType, id: &str, e: impl ToString) -> StorageError {
    StorageError::CorruptRecord {
        entity_type,
        id: id.to_string(),
        reason: e.to_string(),
    }
}

// ============================================================================
// JSON STORAGE
// ============================================================================

/// Reads and writes a [`Model`] as a directory of JSON files.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    dir: PathBuf,
    pretty: bool,
}

impl JsonStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            pretty: true,
        }
    }

    pub fn from_config(config: &WingmanConfig) -> Self {
        Self::new(&config.data_dir).with_pretty(config.pretty_json)
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the registry for `entity_type`.
    pub fn path_for(&self, entity_type: EntityType) -> PathBuf {
        self.dir
            .join(format!("{}.json", entity_type.collection_name()))
    }

    /// Write every registry. Links are stored as their snapshots.
    pub fn save(&self, model: &Model) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;

        self.write_registry(EntityType::Pilot, plain_items(model.pilots()))?;
        self.write_registry(EntityType::Crew, plain_items(model.crew()))?;
        self.write_registry(EntityType::Plane, plain_items(model.planes()))?;
        let flights: Vec<FlightRecord> = model
            .flights()
            .items()
            .iter()
            .map(|flight| FlightRecord::from(flight.as_ref()))
            .collect();
        self.write_registry(EntityType::Flight, flights)?;
        let locations: Vec<LocationRecord> = model
            .locations()
            .items()
            .iter()
            .map(|location| LocationRecord::from(location.as_ref()))
            .collect();
        self.write_registry(EntityType::Location, locations)?;

        info!(
            dir = %self.dir.display(),
            pilots = model.pilots().len(),
            crew = model.crew().len(),
            planes = model.planes().len(),
            flights = model.flights().len(),
            locations = model.locations().len(),
            "saved model"
        );
        Ok(())
    }

    /// Load every registry into a new model and install it into `handle`.
    ///
    /// Owners are read first and rebuilt against `handle`, so their links
    /// resolve only after the install at the end. A missing file is an empty
    /// registry.
    pub fn load(&self, handle: &ModelHandle) -> Result<Arc<Model>, StorageError> {
        let resolvers = handle.resolvers();
        let model = Model::new();

        for record in self.read_registry::<FlightRecord>(EntityType::Flight)? {
            model.flights().insert(record.into_flight(&resolvers)?)?;
        }
        for record in self.read_registry::<LocationRecord>(EntityType::Location)? {
            model.locations().insert(record.into_location(&resolvers)?)?;
        }
        insert_all(model.pilots(), self.read_registry(EntityType::Pilot)?)?;
        insert_all(model.crew(), self.read_registry(EntityType::Crew)?)?;
        insert_all(model.planes(), self.read_registry(EntityType::Plane)?)?;

        let model = Arc::new(model);
        handle.install(Arc::clone(&model))?;

        let dangling = count_dangling(&model);
        if dangling > 0 {
            warn!(dangling, "loaded links reference ids with no registered item");
        }
        info!(
            dir = %self.dir.display(),
            flights = model.flights().len(),
            locations = model.locations().len(),
            "loaded model"
        );
        Ok(model)
    }

    /// Load into a fresh handle.
    pub fn load_model(&self) -> Result<Arc<Model>, StorageError> {
        self.load(&ModelHandle::new())
    }

    fn write_registry<T: Serialize>(
        &self,
        entity_type: EntityType,
        items: Vec<T>,
    ) -> Result<(), StorageError> {
        let path = self.path_for(entity_type);
        let file = RegistryFile { items };
        let contents = if self.pretty {
            serde_json::to_string_pretty(&file)
        } else {
            serde_json::to_string(&file)
        }
        .map_err(|e| StorageError::Serialization {
            entity_type,
            reason: e.to_string(),
        })?;
        std::fs::write(&path, contents).map_err(|e| io_error(&path, e))?;
        debug!(path = %path.display(), count = file.items.len(), "wrote registry");
        Ok(())
    }

    fn read_registry<T: DeserializeOwned>(
        &self,
        entity_type: EntityType,
    ) -> Result<Vec<T>, StorageError> {
        let path = self.path_for(entity_type);
        if !path.exists() {
            debug!(path = %path.display(), "registry file missing, starting empty");
            return Ok(Vec::new());
        }
        let contents = std::fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
        let file: RegistryFile<T> =
            serde_json::from_str(&contents).map_err(|e| StorageError::Serialization {
                entity_type,
                reason: e.to_string(),
            })?;
        Ok(file.items)
    }
}

fn plain_items<T: Clone + Item + Send + Sync + 'static>(manager: &ItemManager<T>) -> Vec<T> {
    manager.items().iter().map(|item| T::clone(item)).collect()
}

fn insert_all<T: Clone + Item + Send + Sync + 'static>(
    manager: &ItemManager<T>,
    items: Vec<T>,
) -> Result<(), StorageError> {
    for item in items {
        manager.insert(item)?;
    }
    Ok(())
}

fn count_dangling(model: &Model) -> usize {
    let mut dangling = 0;
    for flight in model.flights().items() {
        dangling += flight.pilot_link.resolved_contents().filter(|e| !e.is_resolved()).count();
        dangling += flight.crew_link.resolved_contents().filter(|e| !e.is_resolved()).count();
        dangling += flight.plane_link.resolved_contents().filter(|e| !e.is_resolved()).count();
        dangling += flight
            .location_link
            .resolved_contents()
            .filter(|e| !e.is_resolved())
            .count();
    }
    for location in model.locations().items() {
        dangling += location.crew_link.resolved_contents().filter(|e| !e.is_resolved()).count();
        dangling += location.pilot_link.resolved_contents().filter(|e| !e.is_resolved()).count();
        dangling += location.plane_link.resolved_contents().filter(|e| !e.is_resolved()).count();
    }
    dangling
}

fn io_error(path: &Path, e: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flight_record_uses_original_field_names() {
        let flight = Flight::with_id("f1", "WM1", &Resolvers::detached());
        let value = serde_json::to_value(FlightRecord::from(&flight)).unwrap();
        for key in ["id", "code", "pilotLink", "crewLink", "planeLink", "locationLink"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn test_missing_links_load_empty() {
        let record: FlightRecord =
            serde_json::from_value(json!({ "id": "f1", "code": "WM1" })).unwrap();
        let flight = record.into_flight(&Resolvers::detached()).unwrap();
        assert!(flight.pilot_link.is_empty());
        assert!(flight.location_link.is_empty());
    }

    #[test]
    fn test_missing_code_is_corrupt() {
        let record: FlightRecord = serde_json::from_value(json!({ "id": "f1" })).unwrap();
        let err = record.into_flight(&Resolvers::detached()).unwrap_err();
        assert!(matches!(
            err,
            StorageError::CorruptRecord { entity_type: EntityType::Flight, ref id, ref reason }
                if id == "f1" && reason == "Required field missing: code"
        ));
    }

    #[test]
    fn test_repeated_role_key_fails_to_parse() {
        let result = serde_json::from_str::<FlightRecord>(
            r#"{"id":"f1","code":"WM1","crewLink":{"TRAINEE":["a","b"],"TRAINEE":["c"]}}"#,
        );
        let err = result.unwrap_err().to_string();
        assert!(err.contains("listed more than once"), "{err}");
    }

    #[test]
    fn test_misspelled_link_field_fails_to_parse() {
        let result = serde_json::from_value::<FlightRecord>(json!({
            "id": "f1",
            "code": "WM1",
            "crewlink": { "TRAINEE": ["a"] }
        }));
        assert!(result.is_err());

        let result = serde_json::from_value::<LocationRecord>(json!({
            "id": "l1",
            "name": "Base",
            "planeLinks": { "LOCATION_USING": ["p1"] }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_null_link_loads_empty() {
        let record: FlightRecord = serde_json::from_value(json!({
            "id": "f1",
            "code": "WM1",
            "crewLink": null
        }))
        .unwrap();
        assert_eq!(record.crew_link, None);
    }

    #[test]
    fn test_over_capacity_link_is_corrupt() {
        let record: FlightRecord = serde_json::from_value(json!({
            "id": "f1",
            "code": "WM1",
            "pilotLink": { "PILOT_FLYING": ["a", "b"] }
        }))
        .unwrap();
        let err = record.into_flight(&Resolvers::detached()).unwrap_err();
        match err {
            StorageError::CorruptRecord { reason, .. } => assert!(reason.contains("capacity 1")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_role_fails_to_parse() {
        let result = serde_json::from_value::<FlightRecord>(json!({
            "id": "f1",
            "code": "WM1",
            "crewLink": { "CAPTAIN": ["a"] }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_location_record_roundtrip() {
        let location = Location::with_id("l1", "Base", &Resolvers::detached());
        let record = LocationRecord::from(&location);
        let value = serde_json::to_value(&record).unwrap();
        let back: LocationRecord = serde_json::from_value(value).unwrap();
        let rebuilt = back.into_location(&Resolvers::detached()).unwrap();
        assert_eq!(rebuilt, location);
    }
}
