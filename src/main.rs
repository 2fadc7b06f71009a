use std::env;
use std::path::PathBuf;
use std::process;

use clap::{App, Arg, ArgMatches};
use log::info;
use rusoto_core::Region;

mod error;
mod list;
mod locator;
mod manifest;

use error::Error;
use locator::S3Locator;

fn args() -> ArgMatches<'static> {
    App::new("s3manifest")
        .about("Generate a datalad-addurls CSV manifest from an S3 bucket listing")
        .arg(
            Arg::with_name("no_anon")
                .long("no-anon")
                .help("Uses resolved AWS credentials instead of unsigned requests"),
        )
        .arg(
            Arg::with_name("dataset_name")
                .short("d")
                .long("dataset-name")
                .value_name("NAME")
                .help("Sets the dataset column (defaults to the URI's key prefix)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("suffix")
                .short("s")
                .long("suffix")
                .value_name("SUFFIX")
                .help("Only lists keys ending with this suffix")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("overwrite")
                .long("overwrite")
                .help("Replaces the output file if it already exists"),
        )
        .arg(
            Arg::with_name("S3_URI")
                .help("Sets the bucket and key prefix, as (s3://)<bucket>/<prefix>")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("CSV_PATH")
                .help("Sets the path of the csv to be written")
                .required(true)
                .index(2),
        )
        .get_matches()
}

fn main() {
    pretty_env_logger::init();

    let region = if let Ok(endpoint) = env::var("S3_ENDPOINT") {
        let region = Region::Custom {
            name: "custom".to_owned(),
            endpoint,
        };
        info!(
            "picked up non-standard endpoint {:?} from S3_ENDPOINT env. variable",
            region
        );
        region
    } else {
        Region::default()
    };

    let matches = args();

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to create Runtime");

    if let Err(e) = rt.block_on(run(&matches, region)) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

async fn run(matches: &ArgMatches<'_>, region: Region) -> Result<(), Error> {
    let s3_uri = matches.value_of("S3_URI").expect("no s3 uri");
    let csv_path: PathBuf = matches.value_of_os("CSV_PATH").expect("no csv path").into();
    let anon = !matches.is_present("no_anon");
    let overwrite = matches.is_present("overwrite");
    let suffix = matches.value_of("suffix").unwrap_or("").to_string();

    let locator = S3Locator::parse(s3_uri)?;
    let dataset = matches
        .value_of("dataset_name")
        .unwrap_or(&locator.prefix)
        .to_string();

    let s3 = list::client(region, anon)?;
    let entries = list::matching_keys(s3, locator.clone(), suffix);
    manifest::write_manifest(entries, &dataset, &locator.prefix, &csv_path, overwrite).await?;
    Ok(())
}
