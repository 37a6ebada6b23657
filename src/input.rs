use crate::calendar::Weekday;
use crate::errors::InvalidDomainValueError;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_enum_str::Deserialize_enum_str;
use std::hash::Hash;
use std::io::{BufReader, Read};
use strum_macros::{Display, EnumCount, EnumIter};

pub const MAX_LIGHTING_ZONES: usize = 6;

pub fn ingest_for_processing(json: impl Read) -> anyhow::Result<BuildingSpecification> {
    let reader = BufReader::new(json);

    Ok(serde_json::from_reader(reader)?)
}

/// Description of a building as supplied by a user. Every field is optional: gaps are
/// expected and only affect the end uses that need them.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BuildingSpecification {
    pub name: Option<String>,
    /// kWh per month
    pub other_electricity_usage: Option<f64>,
    /// kWh per month
    pub building_standby_load: Option<f64>,
    #[serde(default)]
    pub lighting_systems: Vec<LightingSystem>,
    #[serde(default)]
    pub hot_water_system: HotWaterSystem,
    #[serde(default)]
    pub ventilation_system: VentilationSystem,
    #[serde(default)]
    pub cooling_system: CoolingSystem,
    #[serde(default)]
    pub heating_system: HeatingSystem,
    #[serde(default)]
    pub occupied_days: IndexMap<Weekday, bool>,
    pub observe_public_holidays: Option<bool>,
    #[serde(default)]
    pub zone_schedules: IndexMap<OccupationZone, ZoneSchedule>,
    /// Floor area in m2 for each zone type, per floor
    #[serde(default)]
    pub floor_areas: IndexMap<OccupationZone, IndexMap<Floor, f64>>,
    pub building_capacity: Option<f64>,
    pub typical_occupation: Option<f64>,
    /// Conditioned floor area in m2
    pub building_area: Option<f64>,
    pub meteorological_file: Option<String>,
}

impl BuildingSpecification {
    /// The record that user-supplied fields are laid over before a run:
    /// open Monday to Friday, closed on public holidays, with electric hot water,
    /// ventilation and cooling.
    pub fn defaults() -> Self {
        Self {
            hot_water_system: HotWaterSystem {
                energy_source: Some(EnergySource::Electricity),
                ..Default::default()
            },
            ventilation_system: VentilationSystem {
                energy_source: Some(EnergySource::Electricity),
                ..Default::default()
            },
            cooling_system: CoolingSystem {
                energy_source: Some(EnergySource::Electricity),
                ..Default::default()
            },
            occupied_days: IndexMap::from([
                (Weekday::Mon, true),
                (Weekday::Tue, true),
                (Weekday::Wed, true),
                (Weekday::Thu, true),
                (Weekday::Fri, true),
                (Weekday::Sat, false),
                (Weekday::Sun, false),
            ]),
            observe_public_holidays: Some(true),
            ..Default::default()
        }
    }

    pub fn merged_over_defaults(&self) -> Self {
        self.merged_over(&Self::defaults())
    }

    /// Build a new specification from this one, taking any field left unset here from
    /// `defaults`. Neither input is modified.
    pub fn merged_over(&self, defaults: &Self) -> Self {
        Self {
            name: self.name.clone().or_else(|| defaults.name.clone()),
            other_electricity_usage: self
                .other_electricity_usage
                .or(defaults.other_electricity_usage),
            building_standby_load: self
                .building_standby_load
                .or(defaults.building_standby_load),
            lighting_systems: if self.lighting_systems.is_empty() {
                defaults.lighting_systems.clone()
            } else {
                self.lighting_systems.clone()
            },
            hot_water_system: self.hot_water_system.merged_over(&defaults.hot_water_system),
            ventilation_system: self
                .ventilation_system
                .merged_over(&defaults.ventilation_system),
            cooling_system: self.cooling_system.merged_over(&defaults.cooling_system),
            heating_system: HeatingSystem {
                start_time: self
                    .heating_system
                    .start_time
                    .or(defaults.heating_system.start_time),
            },
            occupied_days: overlay(&defaults.occupied_days, &self.occupied_days, |_, own| {
                *own
            }),
            observe_public_holidays: self
                .observe_public_holidays
                .or(defaults.observe_public_holidays),
            zone_schedules: overlay(&defaults.zone_schedules, &self.zone_schedules, |base, own| {
                ZoneSchedule {
                    open_time: own.open_time.or(base.open_time),
                    close_time: own.close_time.or(base.close_time),
                }
            }),
            floor_areas: overlay(&defaults.floor_areas, &self.floor_areas, |base, own| {
                overlay(base, own, |_, area| *area)
            }),
            building_capacity: self.building_capacity.or(defaults.building_capacity),
            typical_occupation: self.typical_occupation.or(defaults.typical_occupation),
            building_area: self.building_area.or(defaults.building_area),
            meteorological_file: self
                .meteorological_file
                .clone()
                .or_else(|| defaults.meteorological_file.clone()),
        }
    }

    pub fn observes_public_holidays(&self) -> bool {
        self.observe_public_holidays.unwrap_or(false)
    }

    pub fn occupied_on(&self, weekday: Weekday) -> Option<bool> {
        self.occupied_days.get(&weekday).copied()
    }

    /// Lighting system for a zone slot (0-based), if one was declared.
    pub fn lighting_system(&self, zone: usize) -> Option<&LightingSystem> {
        self.lighting_systems.get(zone)
    }

    pub fn zone_schedule(&self, zone: OccupationZone) -> Option<&ZoneSchedule> {
        self.zone_schedules.get(&zone)
    }
}

/// Lay `own` over `base`: keys only in one map are kept as-is, shared keys are combined
/// with `combine(base_value, own_value)`.
fn overlay<K, V>(
    base: &IndexMap<K, V>,
    own: &IndexMap<K, V>,
    combine: impl Fn(&V, &V) -> V,
) -> IndexMap<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    let mut merged = base.clone();
    for (key, value) in own {
        let value = match base.get(key) {
            Some(base_value) => combine(base_value, value),
            None => value.clone(),
        };
        merged.insert(key.clone(), value);
    }
    merged
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LightingSystem {
    pub name: Option<String>,
    #[serde(rename = "tech")]
    pub technology: Option<LightingTechnology>,
    pub ballast: Option<LightingBallast>,
    pub lamp_number: Option<u32>,
    /// W per lamp
    pub lamp_power: Option<u32>,
    #[serde(alias = "luminary_number")]
    pub luminaire_number: Option<u32>,
    pub similar_zone_number: Option<u32>,
    /// hours per day
    pub operating_hours: Option<f64>,
    pub simultaneity_factor: Option<f64>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HotWaterSystem {
    pub energy_source: Option<EnergySource>,
    pub efficiency_cop: Option<f64>,
    /// litres per day
    pub water_demand: Option<f64>,
    /// delivered hot water temperature in deg C
    pub reference_temperature: Option<f64>,
    /// cold feed temperature in deg C
    pub supply_temperature: Option<f64>,
}

impl HotWaterSystem {
    fn merged_over(&self, defaults: &Self) -> Self {
        Self {
            energy_source: self
                .energy_source
                .clone()
                .or_else(|| defaults.energy_source.clone()),
            efficiency_cop: self.efficiency_cop.or(defaults.efficiency_cop),
            water_demand: self.water_demand.or(defaults.water_demand),
            reference_temperature: self.reference_temperature.or(defaults.reference_temperature),
            supply_temperature: self.supply_temperature.or(defaults.supply_temperature),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct VentilationSystem {
    pub energy_source: Option<EnergySource>,
    /// kW
    pub rated_input_power: Option<f64>,
    /// hour of day the system switches on
    pub on_time: Option<u32>,
    /// last hour of day the system runs (inclusive)
    pub off_time: Option<u32>,
}

impl VentilationSystem {
    fn merged_over(&self, defaults: &Self) -> Self {
        Self {
            energy_source: self
                .energy_source
                .clone()
                .or_else(|| defaults.energy_source.clone()),
            rated_input_power: self.rated_input_power.or(defaults.rated_input_power),
            on_time: self.on_time.or(defaults.on_time),
            off_time: self.off_time.or(defaults.off_time),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CoolingSystem {
    pub energy_source: Option<EnergySource>,
    /// number of identical units installed
    pub number: Option<u32>,
    /// kW per unit
    pub nominal_capacity: Option<f64>,
    /// kW per unit
    pub sensible_nominal_capacity: Option<f64>,
    pub energy_efficiency_ratio: Option<f64>,
    /// deg C
    pub set_point_temperature: Option<f64>,
}

impl CoolingSystem {
    fn merged_over(&self, defaults: &Self) -> Self {
        Self {
            energy_source: self
                .energy_source
                .clone()
                .or_else(|| defaults.energy_source.clone()),
            number: self.number.or(defaults.number),
            nominal_capacity: self.nominal_capacity.or(defaults.nominal_capacity),
            sensible_nominal_capacity: self
                .sensible_nominal_capacity
                .or(defaults.sensible_nominal_capacity),
            energy_efficiency_ratio: self
                .energy_efficiency_ratio
                .or(defaults.energy_efficiency_ratio),
            set_point_temperature: self.set_point_temperature.or(defaults.set_point_temperature),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HeatingSystem {
    /// hour of day the heating comes on
    pub start_time: Option<u32>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ZoneSchedule {
    pub open_time: Option<u32>,
    pub close_time: Option<u32>,
}

/// Reserved for run-wide settings; no field is read yet.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SimulationParameters {}

#[derive(Clone, Debug, Deserialize_enum_str, PartialEq)]
pub enum EnergySource {
    Electricity,
    Diesel,
    #[serde(rename = "LPG")]
    Lpg,
    #[serde(rename = "Natural gas")]
    NaturalGas,
    Biomass,
    Pellets,
    #[serde(other)]
    Unrecognised(String),
}

impl EnergySource {
    /// Whether consumption from this source counts towards the building's electricity.
    pub(crate) fn is_electric(&self, field: &str) -> Result<bool, InvalidDomainValueError> {
        match self {
            EnergySource::Electricity => Ok(true),
            EnergySource::Unrecognised(value) => Err(InvalidDomainValueError::new(
                field,
                value.as_str(),
                "energy source",
            )),
            _ => Ok(false),
        }
    }
}

#[derive(Clone, Debug, Deserialize_enum_str, PartialEq)]
pub enum LightingTechnology {
    #[serde(rename = "Tubular fluorescent T8")]
    FtT8,
    #[serde(rename = "Tubular fluorescent T5")]
    FtT5,
    #[serde(rename = "Compact fluorescent")]
    Fc,
    #[serde(rename = "Incandescent")]
    Ic,
    #[serde(rename = "Halogen")]
    Hal,
    #[serde(rename = "Mercury vapor")]
    Vm,
    #[serde(rename = "Sodium vapour")]
    Vs,
    #[serde(rename = "Metal halide")]
    Im,
    #[serde(rename = "Induction")]
    Ind,
    #[serde(rename = "LED")]
    Led,
    #[serde(other)]
    Unrecognised(String),
}

#[derive(Clone, Debug, Deserialize_enum_str, PartialEq)]
pub enum LightingBallast {
    #[serde(rename = "Electronic ballast")]
    Electronic,
    #[serde(rename = "Ferromagnetic ballast")]
    Ferromagnetic,
    #[serde(other)]
    Unrecognised(String),
}

#[derive(Clone, Copy, Debug, Deserialize, Display, EnumCount, EnumIter, Eq, Hash, PartialEq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OccupationZone {
    Office,
    Teaching,
    Canteen,
    CommonAreas,
    Other,
}

#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, Hash, PartialEq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Floor {
    Ground,
    First,
    Second,
    Third,
    Fourth,
}
