pub mod calendar;
mod compare_floats;
pub mod core;
pub mod corpus;
pub mod diagnostics;
pub mod errors;
pub mod input;
pub mod output;
pub mod read_weather_file;
#[cfg(test)]
mod tests;

extern crate lazy_static;

pub use crate::corpus::RunResults;
use crate::core::occupancy::HourlyOccupancy;
use crate::corpus::Corpus;
use crate::diagnostics::{Diagnostics, Warning};
use crate::errors::{OpenBesError, OutputError};
use crate::input::{
    ingest_for_processing, BuildingSpecification, OccupationZone, SimulationParameters,
};
use crate::output::Output;
use crate::read_weather_file::WeatherProvider;
use crate::calendar::Month;
use csv::WriterBuilder;
use rayon::prelude::*;
use std::borrow::Cow;
use std::io::Read;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::info;

#[derive(Clone, Copy, Debug, Default)]
pub struct ProjectFlags {
    /// Also write the hourly occupancy of each zone type.
    pub write_occupancy: bool,
}

pub fn run_project(
    input: impl Read,
    output: impl Output,
    weather: Option<Arc<dyn WeatherProvider>>,
    flags: ProjectFlags,
) -> Result<RunResults, OpenBesError> {
    let spec = ingest_for_processing(input)?;

    let mut corpus = Corpus::from_inputs(&spec, &SimulationParameters::default());
    if let Some(weather) = weather {
        corpus = corpus.with_weather_provider(weather);
    }

    let mut diagnostics = Diagnostics::new();
    let results = corpus.run(&mut diagnostics)?;
    let occupancy = if flags.write_occupancy {
        Some(corpus.occupancy(&mut diagnostics)?)
    } else {
        None
    };

    if !diagnostics.warnings().is_empty() {
        info!(
            "{} part(s) of the calculation fell back to zero",
            diagnostics.warnings().len()
        );
    }

    if !output.is_noop() {
        write_results_file(&output, &results).map_err(OutputError::new)?;
        if let Some(occupancy) = occupancy {
            write_occupancy_file(&output, &occupancy).map_err(OutputError::new)?;
        }
    }

    Ok(results)
}

/// Outcome of one building in a batch, with the warnings raised while computing it.
#[derive(Debug)]
pub struct BatchOutcome {
    pub results: Result<RunResults, OpenBesError>,
    pub warnings: Vec<Warning>,
}

/// Run independent buildings in parallel. Results come back in the order of `specs`.
pub fn simulate_batch(
    specs: &[BuildingSpecification],
    parameters: &SimulationParameters,
    weather: Option<Arc<dyn WeatherProvider>>,
) -> Vec<BatchOutcome> {
    specs
        .par_iter()
        .map(|spec| {
            let mut corpus = Corpus::from_inputs(spec, parameters);
            if let Some(weather) = &weather {
                corpus = corpus.with_weather_provider(weather.clone());
            }
            let mut diagnostics = Diagnostics::new();
            let results = corpus.run(&mut diagnostics);
            BatchOutcome {
                results,
                warnings: diagnostics.into_warnings(),
            }
        })
        .collect()
}

fn write_results_file(output: &impl Output, results: &RunResults) -> anyhow::Result<()> {
    let output_key = "results";
    info!("writing out to {output_key}");
    let writer = output.writer_for_location_key(output_key)?;
    let mut writer = WriterBuilder::new().from_writer(writer);

    let mut headings: Vec<Cow<'static, str>> = vec!["Category".into()];
    headings.extend(Month::iter().map(|month| Cow::Owned(month.to_string())));
    headings.push("Annual".into());
    writer.write_record(headings.iter().map(|heading| heading.as_ref()))?;

    let mut units_row = vec![""];
    units_row.extend(Month::iter().map(|_| "[kWh]"));
    units_row.push("[kWh]");
    writer.write_record(&units_row)?;

    for (category, row) in results.monthly.rows() {
        let mut record = vec![category.to_string()];
        record.extend(row.iter().map(|kwh| kwh.to_string()));
        record.push(
            results
                .annual
                .get(category)
                .map(|kwh| kwh.to_string())
                .unwrap_or_default(),
        );
        writer.write_record(&record)?;
    }

    let mut total_row = vec!["Total".to_string()];
    total_row.extend(results.monthly.monthly_totals().iter().map(|kwh| kwh.to_string()));
    total_row.push(results.total.to_string());
    writer.write_record(&total_row)?;

    writer.flush()?;

    Ok(())
}

fn write_occupancy_file(output: &impl Output, occupancy: &HourlyOccupancy) -> anyhow::Result<()> {
    let output_key = "occupancy";
    info!("writing out to {output_key}");
    let writer = output.writer_for_location_key(output_key)?;
    let mut writer = WriterBuilder::new().from_writer(writer);

    let mut headings = vec!["Month".to_string(), "Day".to_string(), "Hour".to_string()];
    headings.extend(OccupationZone::iter().map(|zone| zone.to_string()));
    writer.write_record(&headings)?;

    for (hour, values) in occupancy.rows() {
        let mut record = vec![
            hour.month.to_string(),
            hour.day_of_month().to_string(),
            hour.hour.to_string(),
        ];
        record.extend(values.iter().map(|value| value.to_string()));
        writer.write_record(&record)?;
    }

    writer.flush()?;

    Ok(())
}
