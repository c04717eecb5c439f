//! Reading signal strength recordings.
//!
//! Recordings are `;`-separated text files without a header, one measurement per row:
//!
//! ```text
//! 49.754592;9.961313;17
//! ```
//!
//! The fields are latitude, longitude and signal strength. Latitude becomes the `x`
//! and longitude the `y` coordinate of the sample location.
use std::{fs::File, io::Read, path::Path};

use csv::{ReaderBuilder, StringRecord, Trim};
use vegvisir::Sample;

use crate::{Error, Result};

/// Samples read from a recording.
#[derive(Debug, Clone, PartialEq)]
pub struct Recording {
    /// Samples with a strictly positive strength, in file order.
    pub samples: Vec<Sample>,
    /// Number of rows dropped because their strength was not positive.
    pub dropped: usize,
}

/// Load a recording from `path`.
pub fn load_samples(path: &Path) -> Result<Recording> {
    let recording = read_samples(File::open(path)?, path)?;

    if recording.samples.is_empty() {
        return Err(Error::NoSamples {
            path: path.to_path_buf(),
        });
    }

    tracing::info!(
        path = %path.display(),
        samples = recording.samples.len(),
        dropped = recording.dropped,
        "loaded recording"
    );

    Ok(recording)
}

/// Read a recording from `reader`, `path` is only used in error messages.
pub fn read_samples(reader: impl Read, path: &Path) -> Result<Recording> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut samples = Vec::new();
    let mut dropped = 0;

    for record in reader.records() {
        let record = record.map_err(|source| Error::ReadSamples {
            path: path.to_path_buf(),
            source,
        })?;

        let sample = parse_record(&record)?;

        // weak readings carry no usable weight
        if sample.strength > 0.0 {
            samples.push(sample);
        } else {
            tracing::debug!(line = line(&record), strength = sample.strength, "dropping sample");
            dropped += 1;
        }
    }

    if dropped > 0 {
        tracing::warn!(dropped, "dropped samples without a positive strength");
    }

    Ok(Recording { samples, dropped })
}

fn parse_record(record: &StringRecord) -> Result<Sample> {
    let malformed = |reason: String| Error::MalformedRecord {
        line: line(record),
        reason,
    };

    if record.len() != 3 {
        return Err(malformed(format!("expected 3 fields, found {}", record.len())));
    }

    let mut values = [0.0; 3];
    for ((value, field), name) in values
        .iter_mut()
        .zip(record.iter())
        .zip(["latitude", "longitude", "strength"])
    {
        *value = field
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| malformed(format!("{name} `{field}` is not a finite number")))?;
    }

    let [latitude, longitude, strength] = values;
    Ok(Sample::new(latitude, longitude, strength))
}

fn line(record: &StringRecord) -> u64 {
    record.position().map_or(0, csv::Position::line)
}
