use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use crate::error::SedError;
use crate::levenshtein::Token;

/// Separates the first sequence from the second in the input stream.
pub const SENTINEL: Token = -1;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SequencePair {
    pub first: Vec<Token>,
    pub second: Vec<Token>,
}

/// Opens the token stream: stdin when `path` is `None`, otherwise the file.
/// Input is gzip-decoded if `gzip` is set or the path ends with `.gz`.
pub fn open_input(path: Option<&Path>, gzip: bool) -> Result<Box<dyn BufRead>, SedError> {
    let raw: Box<dyn Read> = match path {
        Some(path) => {
            let file = File::open(path).map_err(|e| {
                io::Error::new(e.kind(), format!("failed to open '{}': {}", path.display(), e))
            })?;
            Box::new(file)
        }
        None => Box::new(io::stdin()),
    };

    let gzipped = gzip || path.is_some_and(|p| p.extension().is_some_and(|ext| ext == "gz"));
    if gzipped {
        log::debug!("reading input as gzip");
        Ok(Box::new(BufReader::new(GzDecoder::new(raw))))
    } else {
        Ok(Box::new(BufReader::new(raw)))
    }
}

/// Reads whitespace-separated integer tokens until end of stream.
///
/// Tokens up to the first [`SENTINEL`] form the first sequence, tokens after it
/// the second. The sentinel itself belongs to neither. Every further sentinel
/// starts the second sequence over. Without any sentinel the second sequence
/// is empty.
pub fn read_sequence_pair<R: BufRead>(reader: R) -> Result<SequencePair, SedError> {
    let mut pair = SequencePair::default();
    let mut sentinels_seen = 0usize;

    for (line_idx, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        for word in line.split_whitespace() {
            let token: Token = word.parse().map_err(|_| SedError::MalformedToken {
                token: word.to_string(),
                line: line_idx + 1,
            })?;

            if token == SENTINEL {
                sentinels_seen += 1;
                if sentinels_seen > 1 {
                    log::warn!(
                        "separator repeated on line {}, discarding {} tokens of the second sequence",
                        line_idx + 1,
                        pair.second.len()
                    );
                }
                pair.second.clear();
                continue;
            }

            if sentinels_seen == 0 {
                pair.first.push(token);
            } else {
                pair.second.push(token);
            }
        }
    }

    log::debug!(
        "read sequences of {} and {} tokens",
        pair.first.len(),
        pair.second.len()
    );
    Ok(pair)
}

pub fn parse_sequence_pair(text: &str) -> Result<SequencePair, SedError> {
    read_sequence_pair(text.as_bytes())
}

/// In-memory variant of [`open_input`] + [`read_sequence_pair`].
pub fn load_sequence_pair_from_bytes(
    content: &[u8],
    is_gzipped: bool,
) -> Result<SequencePair, SedError> {
    if is_gzipped {
        read_sequence_pair(BufReader::new(GzDecoder::new(content)))
    } else {
        read_sequence_pair(content)
    }
}
