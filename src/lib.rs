pub mod error;
pub mod levenshtein;
pub mod output;
pub mod sequence_reader;

use wasm_bindgen::prelude::*;

pub use error::SedError;
pub use levenshtein::{
    distance, normalized_distance, try_distance, try_normalized_distance, Distance, Strategy,
    Token,
};
pub use output::{SedReport, SedValue};
pub use sequence_reader::SequencePair;

/// Computes both the raw and the normalized distance of a sequence pair.
pub fn build_report(pair: &SequencePair, strategy: Strategy) -> Result<SedReport, SedError> {
    let distance = try_distance(&pair.first, &pair.second, strategy)?;
    Ok(SedReport {
        first_len: pair.first.len(),
        second_len: pair.second.len(),
        distance,
        normalized_distance: levenshtein::normalize(pair.first.len(), pair.second.len(), distance),
    })
}

/// Parses the textual encoding (optionally gzipped) and builds its report.
pub fn report_from_bytes(content: &[u8], is_gzipped: bool) -> Result<SedReport, SedError> {
    let pair = sequence_reader::load_sequence_pair_from_bytes(content, is_gzipped)?;
    build_report(&pair, Strategy::RollingRows)
}

#[wasm_bindgen]
pub fn sed_distance(seq1: &[i32], seq2: &[i32]) -> i32 {
    distance(seq1, seq2)
}

#[wasm_bindgen]
pub fn sed_normalized_distance(seq1: &[i32], seq2: &[i32]) -> f64 {
    normalized_distance(seq1, seq2)
}

#[wasm_bindgen]
pub fn sed_report_json(content: &[u8], is_gzipped: bool) -> Result<String, JsValue> {
    let report = report_from_bytes(content, is_gzipped)
        .map_err(|e| JsValue::from_str(&format!("SED error: {}", e)))?;
    serde_json::to_string(&report)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {}", e)))
}
