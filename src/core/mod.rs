pub mod cooling_systems;
pub mod energy_supply;
pub mod lighting;
pub mod occupancy;
pub mod schedule;
pub mod units;
pub mod ventilation;
pub mod water_heat_demand;
