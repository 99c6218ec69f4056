//! Sensor adapters
//!
//! Thin read-only views over a coordinator's [`MedalRecord`] for hosts that
//! render metrics as sensors. Every tracked country exposes five sensors:
//! gold, silver, bronze and total counts plus the table rank. They share
//! one device description.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::coordinator::MedalCoordinator;
use crate::countries::CountryRef;
use crate::models::{MedalKind, MedalRecord, UNRANKED};

/// Prefix of every unique id
pub const UNIQUE_ID_PREFIX: &str = "olympics_2026";

/// Unit of the count sensors
pub const MEDAL_UNIT: &str = "medals";

/// What a sensor reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    Medal(MedalKind),
    Rank,
}

/// How a host should aggregate the value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateClass {
    Total,
}

/// Native value of a sensor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SensorValue {
    Count(u32),
    Rank(String),
}

/// Device grouping the sensors of one country
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub identifiers: Vec<(String, String)>,
    pub name: String,
    pub manufacturer: &'static str,
    pub model: &'static str,
    pub entry_type: &'static str,
}

impl DeviceInfo {
    pub fn for_country(country: &CountryRef) -> Self {
        Self {
            identifiers: vec![(UNIQUE_ID_PREFIX.to_string(), country.code.to_string())],
            name: format!("Olympics 2026 - {}", country.display_name),
            manufacturer: "2026 Winter Olympics",
            model: "Medal Tracker",
            entry_type: "service",
        }
    }
}

/// Rendered state of one sensor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorReading {
    pub name: String,
    pub unique_id: String,
    pub icon: &'static str,
    pub unit_of_measurement: Option<&'static str>,
    pub state_class: Option<StateClass>,
    pub value: SensorValue,
    pub attributes: Map<String, Value>,
}

/// One sensor of a tracked country
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MedalSensor {
    country: &'static CountryRef,
    kind: SensorKind,
}

impl MedalSensor {
    pub fn new(country: &'static CountryRef, kind: SensorKind) -> Self {
        Self { country, kind }
    }

    /// The five sensors of a country
    pub fn for_country(country: &'static CountryRef) -> Vec<Self> {
        MedalKind::all()
            .into_iter()
            .map(SensorKind::Medal)
            .chain(std::iter::once(SensorKind::Rank))
            .map(|kind| Self::new(country, kind))
            .collect()
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    /// Display name, e.g. "Norway Gold Medals"
    pub fn name(&self) -> String {
        match self.kind {
            SensorKind::Medal(kind) => {
                format!("{} {} Medals", self.country.display_name, capitalize(kind.as_str()))
            }
            SensorKind::Rank => format!("{} Rank", self.country.display_name),
        }
    }

    pub fn unique_id(&self) -> String {
        match self.kind {
            SensorKind::Medal(kind) => {
                format!("{UNIQUE_ID_PREFIX}_{}_{}_medals", self.country.code, kind.as_str())
            }
            SensorKind::Rank => format!("{UNIQUE_ID_PREFIX}_{}_rank", self.country.code),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self.kind {
            SensorKind::Medal(MedalKind::Gold | MedalKind::Bronze) => "mdi:medal",
            SensorKind::Medal(MedalKind::Silver) => "mdi:medal-outline",
            SensorKind::Medal(MedalKind::Total) => "mdi:trophy",
            SensorKind::Rank => "mdi:podium",
        }
    }

    pub fn unit_of_measurement(&self) -> Option<&'static str> {
        match self.kind {
            SensorKind::Medal(_) => Some(MEDAL_UNIT),
            SensorKind::Rank => None,
        }
    }

    pub fn state_class(&self) -> Option<StateClass> {
        match self.kind {
            SensorKind::Medal(_) => Some(StateClass::Total),
            SensorKind::Rank => None,
        }
    }

    /// Value for a snapshot; zero or unranked before any data exists
    pub fn native_value(&self, snapshot: Option<&MedalRecord>) -> SensorValue {
        match self.kind {
            SensorKind::Medal(kind) => SensorValue::Count(snapshot.map_or(0, |r| r.count(kind))),
            SensorKind::Rank => SensorValue::Rank(
                snapshot.map_or_else(|| UNRANKED.to_string(), |r| r.rank().to_string()),
            ),
        }
    }

    /// Extra attributes; empty before any data exists
    ///
    /// Count sensors carry the rank, and all counts except on the total
    /// sensor. The rank sensor carries all counts.
    pub fn attributes(&self, snapshot: Option<&MedalRecord>) -> Map<String, Value> {
        let mut attrs = Map::new();
        let Some(record) = snapshot else {
            return attrs;
        };

        attrs.insert("country".into(), json!(self.country.display_name));
        attrs.insert("country_code".into(), json!(self.country.code));

        let with_counts = match self.kind {
            SensorKind::Medal(kind) => {
                attrs.insert("rank".into(), json!(record.rank()));
                kind != MedalKind::Total
            }
            SensorKind::Rank => true,
        };

        if with_counts {
            for kind in MedalKind::all() {
                attrs.insert(kind.as_str().into(), json!(record.count(kind)));
            }
        }

        attrs
    }

    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo::for_country(self.country)
    }

    /// Render against a snapshot
    pub fn read_snapshot(&self, snapshot: Option<&MedalRecord>) -> SensorReading {
        SensorReading {
            name: self.name(),
            unique_id: self.unique_id(),
            icon: self.icon(),
            unit_of_measurement: self.unit_of_measurement(),
            state_class: self.state_class(),
            value: self.native_value(snapshot),
            attributes: self.attributes(snapshot),
        }
    }

    /// Render against a coordinator's current snapshot
    pub fn read(&self, coordinator: &MedalCoordinator) -> SensorReading {
        self.read_snapshot(coordinator.snapshot().as_ref())
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
