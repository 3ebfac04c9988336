use std::io::Read;

use bnlearn::structure::NetworkStructure;
use bnlearn::Dataset;
use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use ndarray::prelude::*;
use ndarray_csv::{Array2Reader, ReadError};

/// Convert Gzipped CSV bytes into a 2D array of labels and the header names
pub fn array_from_gz_csv<R: Read>(
    gz: R,
    separator: u8,
) -> Result<(Vec<String>, Array2<String>), ReadError> {
    // unzip file
    let file = GzDecoder::new(gz);
    array_from_csv(file, separator)
}

/// Convert CSV bytes with a header row into a 2D array of labels and the header names
pub fn array_from_csv<R: Read>(
    csv: R,
    separator: u8,
) -> Result<(Vec<String>, Array2<String>), ReadError> {
    // parse CSV
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(separator)
        .from_reader(csv);

    let headers = reader
        .headers()
        .map_err(ReadError::Csv)?
        .iter()
        .map(String::from)
        .collect();

    // extract ndarray
    let records = reader.deserialize_array2_dynamic()?;

    Ok((headers, records))
}

#[cfg(any(feature = "sprinkler", feature = "asia"))]
fn dataset_from_gz_csv(data: &[u8]) -> Dataset<String> {
    let (headers, records) = array_from_gz_csv(data, b',').unwrap();

    Dataset::new(records).with_feature_names(headers)
}

fn binary(values: [&str; 2]) -> Vec<String> {
    values.iter().map(|x| x.to_string()).collect()
}

#[cfg(feature = "sprinkler")]
/// Read in the sprinkler dataset
///
/// Every row observes whether the sky is `cloudy`, the `sprinkler` is on, it `rain`s and the
/// grass is wet (`wet_grass`).
pub fn sprinkler() -> Dataset<String> {
    let data = include_bytes!("../data/sprinkler.csv.gz");

    dataset_from_gz_csv(&data[..])
}

/// Structure of the sprinkler network
///
/// `cloudy` is the parent of `sprinkler` and `rain`, which are the parents of `wet_grass`.
pub fn sprinkler_structure() -> NetworkStructure<String> {
    NetworkStructure::builder()
        .variable("cloudy", binary(["no", "yes"]))
        .variable("sprinkler", binary(["off", "on"]))
        .variable("rain", binary(["no", "yes"]))
        .variable("wet_grass", binary(["no", "yes"]))
        .parents("sprinkler", vec!["cloudy"])
        .parents("rain", vec!["cloudy"])
        .parents("wet_grass", vec!["sprinkler", "rain"])
        .build()
        .unwrap()
}

#[cfg(feature = "asia")]
/// Read in the Asia dataset
///
/// Every row records a visit to Asia (`asia`), tuberculosis (`tub`), smoking (`smoke`), lung
/// cancer (`lung`), bronchitis (`bronc`), either tuberculosis or lung cancer (`either`), a
/// positive X-ray (`xray`) and dyspnoea (`dysp`).
///
/// # Reference:
/// Lauritzen, Spiegelhalter (1988). Local computation with probabilities on graphical structures
/// and their application to expert systems. Journal of the Royal Statistical Society B 50(2).
pub fn asia() -> Dataset<String> {
    let data = include_bytes!("../data/asia.csv.gz");

    dataset_from_gz_csv(&data[..])
}

/// Structure of the Asia network
pub fn asia_structure() -> NetworkStructure<String> {
    let names = ["asia", "tub", "smoke", "lung", "bronc", "either", "xray", "dysp"];

    names
        .iter()
        .fold(NetworkStructure::builder(), |builder, name| {
            builder.variable(*name, binary(["no", "yes"]))
        })
        .parents("tub", vec!["asia"])
        .parents("lung", vec!["smoke"])
        .parents("bronc", vec!["smoke"])
        .parents("either", vec!["tub", "lung"])
        .parents("xray", vec!["either"])
        .parents("dysp", vec!["bronc", "either"])
        .build()
        .unwrap()
}
