use crate::core::energy_supply::energy_supply::{EnergyCategory, MonthlyRow};
use crate::corpus::Corpus;
use crate::diagnostics::{Diagnostics, Subsystem, Warning, WarningKind};
use crate::input::{ingest_for_processing, BuildingSpecification, SimulationParameters};
use crate::output::{FileOutput, SinkOutput};
use crate::read_weather_file::WeatherData;
use crate::{run_project, simulate_batch, ProjectFlags};
use approx::{assert_abs_diff_eq, assert_relative_eq};
use indexmap::IndexMap;
use itertools::Itertools;
use pretty_assertions::assert_eq;
use rstest::*;
use std::fs;
use std::sync::Arc;

const HOLYWELL_HOUSE: &str = include_str!("../../demos/holywell_house.json");

const COOLING: MonthlyRow = [
    0.0, 0.0, 0.0, 77.257219, 0.0, 578.141948, 1148.711630, 522.771472, 63.590424, 0.0, 0.0,
    0.0,
];

#[fixture]
fn spec() -> BuildingSpecification {
    ingest_for_processing(HOLYWELL_HOUSE.as_bytes()).unwrap()
}

#[fixture]
fn corpus(spec: BuildingSpecification) -> Corpus {
    Corpus::from_inputs(&spec, &SimulationParameters::default())
        .with_fixed_row(EnergyCategory::Cooling, COOLING)
}

#[rstest]
fn should_match_holywell_house_annual_total(corpus: Corpus) {
    let mut diagnostics = Diagnostics::new();
    let results = corpus.run(&mut diagnostics).unwrap();

    assert_abs_diff_eq!(results.total, 55_358.15269, epsilon = 1e-5);
    assert!(
        diagnostics.warnings().is_empty(),
        "{:?}",
        diagnostics.warnings()
    );
}

#[rstest]
fn should_match_holywell_house_annual_totals_by_category(corpus: Corpus) {
    let mut sink: Vec<Warning> = vec![];
    let results = corpus.run(&mut sink).unwrap();

    let expected = [
        (EnergyCategory::Others, 13_632.0),
        (EnergyCategory::BuildingStandby, 27_854.4),
        (EnergyCategory::Lighting, 7_140.0),
        (EnergyCategory::HotWater, 3_954.28),
        (EnergyCategory::Ventilation, 387.0),
        (EnergyCategory::Cooling, 2_390.472693),
        (EnergyCategory::Heating, 0.0),
    ];
    assert_eq!(
        results.annual.iter().map(|(category, _)| category).collect_vec(),
        expected.iter().map(|(category, _)| *category).collect_vec()
    );
    for (category, total) in expected {
        assert_abs_diff_eq!(results.annual.get(category).unwrap(), total, epsilon = 1e-5);
    }
    assert_relative_eq!(
        results.monthly.row(EnergyCategory::Lighting)[6],
        588.0,
        max_relative = 1e-9
    );
}

#[rstest]
fn should_give_identical_results_on_repeated_runs(corpus: Corpus) {
    let mut sink: Vec<Warning> = vec![];
    let first = corpus.run(&mut sink).unwrap();
    let second = corpus.run(&mut sink).unwrap();
    assert_eq!(first, second);
}

#[rstest]
fn should_leave_caller_specification_untouched(spec: BuildingSpecification) {
    let before = spec.clone();
    let corpus = Corpus::from_inputs(&spec, &SimulationParameters::default());
    let mut sink: Vec<Warning> = vec![];
    corpus.run(&mut sink).unwrap();

    assert_eq!(spec, before);
    assert!(spec.occupied_days.is_empty());
    assert!(!corpus.specification().occupied_days.is_empty());
}

#[rstest]
fn should_degrade_cooling_without_weather(spec: BuildingSpecification) {
    let mut diagnostics = Diagnostics::new();
    let results = Corpus::from_inputs(&spec, &SimulationParameters::default())
        .run(&mut diagnostics)
        .unwrap();

    assert_abs_diff_eq!(results.total, 55_358.152693 - 2_390.472693, epsilon = 1e-6);
    let cooling_warnings = diagnostics.for_subsystem(Subsystem::Cooling).collect_vec();
    assert_eq!(cooling_warnings.len(), 1);
    assert_eq!(cooling_warnings[0].kind, WarningKind::MissingInput);
    assert_eq!(cooling_warnings[0].field, "meteorological_file");
}

#[rstest]
fn should_calculate_cooling_from_named_weather(spec: BuildingSpecification) {
    let spec = BuildingSpecification {
        meteorological_file: Some("hot_year.epw".to_string()),
        ..spec
    };
    let weather = WeatherData {
        air_temperatures: vec![30.; 8760],
        relative_humidities: vec![55.; 8760],
        latitude: None,
        longitude: None,
    };
    let provider = IndexMap::from([("hot_year.epw".to_string(), Arc::new(weather))]);

    let mut sink: Vec<Warning> = vec![];
    let results = Corpus::from_inputs(&spec, &SimulationParameters::default())
        .with_weather_provider(Arc::new(provider))
        .run(&mut sink)
        .unwrap();

    assert!(results
        .monthly
        .row(EnergyCategory::Cooling)
        .iter()
        .all(|kwh| *kwh > 0.));
    assert!(sink.is_empty(), "{sink:?}");
}

#[rstest]
fn should_run_project_from_json() {
    let results = run_project(
        HOLYWELL_HOUSE.as_bytes(),
        SinkOutput,
        None,
        ProjectFlags::default(),
    )
    .unwrap();
    assert_abs_diff_eq!(results.total, 52_967.68, epsilon = 1e-6);
}

#[rstest]
fn should_reject_malformed_json() {
    assert!(run_project(
        "{\"lighting_systems\": 3}".as_bytes(),
        SinkOutput,
        None,
        ProjectFlags::default()
    )
    .is_err());
}

#[rstest]
fn should_write_results_and_occupancy_files() {
    let directory = std::env::temp_dir().join(format!("openbes-test-{}", std::process::id()));
    fs::create_dir_all(&directory).unwrap();
    let output = FileOutput::new(directory.clone(), "holywell__{}.csv".to_string());

    run_project(
        HOLYWELL_HOUSE.as_bytes(),
        &output,
        None,
        ProjectFlags {
            write_occupancy: true,
        },
    )
    .unwrap();

    let results = fs::read_to_string(directory.join("holywell__results.csv")).unwrap();
    let lines = results.lines().collect_vec();
    assert_eq!(lines.len(), 10);
    assert_eq!(
        lines[0],
        "Category,Jan,Feb,Mar,Apr,May,Jun,Jul,Aug,Sep,Oct,Nov,Dec,Annual"
    );
    assert_eq!(
        lines[2..9]
            .iter()
            .map(|line| line.split(',').next().unwrap())
            .collect_vec(),
        vec![
            "Others",
            "Building standby",
            "Lighting",
            "Hot water",
            "Ventilation",
            "Cooling",
            "Heating"
        ]
    );
    assert!(lines[9].starts_with("Total,"));

    let occupancy = fs::read_to_string(directory.join("holywell__occupancy.csv")).unwrap();
    let lines = occupancy.lines().collect_vec();
    assert_eq!(lines.len(), 8761);
    assert_eq!(
        lines[0],
        "Month,Day,Hour,office,teaching,canteen,common_areas,other"
    );
    assert!(lines[1].starts_with("Jan,1,0,"));

    fs::remove_dir_all(&directory).unwrap();
}

#[rstest]
fn should_simulate_batch_in_order(spec: BuildingSpecification) {
    let smaller = BuildingSpecification {
        other_electricity_usage: Some(0.),
        ..spec.clone()
    };
    let outcomes = simulate_batch(&[spec, smaller], &SimulationParameters::default(), None);

    assert_eq!(outcomes.len(), 2);
    let totals = outcomes
        .iter()
        .map(|outcome| outcome.results.as_ref().unwrap().total)
        .collect_vec();
    assert_abs_diff_eq!(totals[0] - totals[1], 13_632.0, epsilon = 1e-6);
    assert!(outcomes
        .iter()
        .all(|outcome| outcome.warnings.len() == 1));
}
