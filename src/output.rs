use serde::Serialize;
use std::fmt;
use std::io::Write;

use crate::error::SedError;
use crate::levenshtein::Distance;

/// The single number the calculator prints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SedValue {
    Raw(Distance),
    Normalized(f64),
}

impl fmt::Display for SedValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SedValue::Raw(dist) => write!(f, "{}", dist),
            // Whole values print without a fractional part ("1", not "1.0").
            SedValue::Normalized(value) => write!(f, "{}", value),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SedReport {
    pub first_len: usize,
    pub second_len: usize,
    pub distance: Distance,
    pub normalized_distance: f64,
}

/// Writes the bare value: no newline, no separator.
pub fn write_value<W: Write>(mut out: W, value: &SedValue) -> Result<(), SedError> {
    write!(out, "{}", value)?;
    out.flush()?;
    Ok(())
}

pub fn write_report_json<W: Write>(mut out: W, report: &SedReport) -> Result<(), SedError> {
    serde_json::to_writer(&mut out, report).map_err(std::io::Error::from)?;
    out.flush()?;
    Ok(())
}
