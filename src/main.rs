extern crate openbes;

use anyhow::Context;
use clap::Parser;
use openbes::output::FileOutput;
use openbes::read_weather_file::{EpwDirectory, WeatherProvider};
use openbes::{run_project, ProjectFlags};
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Default, Debug)]
#[clap(author, version, about, long_about = None)]
struct OpenBesArgs {
    /// Building specification JSON files
    #[arg(required = true)]
    input_files: Vec<String>,
    /// Directory holding the EPW files named by the specifications
    #[arg(long, short)]
    weather_dir: Option<String>,
    /// Also write the hourly occupancy of each zone type
    #[arg(long, default_value_t = false)]
    occupancy: bool,
    #[arg(long, short, default_value_t = false)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = OpenBesArgs::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let weather: Option<Arc<dyn WeatherProvider>> = args
        .weather_dir
        .as_ref()
        .map(|directory| Arc::new(EpwDirectory::new(directory)) as Arc<dyn WeatherProvider>);
    let flags = ProjectFlags {
        write_occupancy: args.occupancy,
    };

    for input_file in &args.input_files {
        let input_path = Path::new(input_file);
        let input_file_stem = input_path
            .file_stem()
            .and_then(OsStr::to_str)
            .unwrap_or("openbes");
        let output_directory = input_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let output = FileOutput::new(output_directory, format!("{input_file_stem}__{{}}.csv"));

        let results = run_project(
            BufReader::new(
                File::open(input_path).with_context(|| format!("Could not open {input_file}"))?,
            ),
            &output,
            weather.clone(),
            flags,
        )?;

        info!("{input_file}: {:.2} kWh/yr", results.total);
    }

    Ok(())
}
