use clap::{Arg, Command};
use fare_zone_extractor::{run, ExtractorConfig};
use std::path::PathBuf;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = Command::new("Fare Zone Extractor")
        .version("1.0")
        .author("Jesper Fjellin")
        .about("Splits a municipal boundary shapefile into one GeoJSON file per fare zone")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .num_args(1)
                .help("TOML or JSON file replacing the built-in ARTM zone configuration"),
        )
        .get_matches();

    let config = match matches.get_one::<String>("config").map(PathBuf::from) {
        None => ExtractorConfig::default(),
        Some(path) => {
            log::info!("reading configuration from {}", path.display());
            match ExtractorConfig::try_from(path.as_path()) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            }
        }
    };

    match run(&config) {
        Ok(report) => {
            if let Some(first) = report.written.first() {
                if let Some(dir) = first.path.parent() {
                    println!("Output files can be found in: {}", dir.display());
                }
            }
            println!("Processing completed successfully");
        }
        Err(e) => {
            eprintln!("Error processing zones: {e}");
            std::process::exit(1);
        }
    }
}
