//! File I/O for corpus blocks and JSONL datasets.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::block::write_blocks;
use crate::error::CorpusError;
use crate::ingest::{ingest, CorpusEntry, IngestReport};

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> CorpusError + '_ {
    move |source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Reads and ingests a corpus file.
pub fn read_corpus(path: &Path) -> Result<IngestReport, CorpusError> {
    let text = fs::read_to_string(path).map_err(io_error(path))?;
    Ok(ingest(&text))
}

/// Writes entries back in block format.
pub fn write_corpus(path: &Path, entries: &[CorpusEntry]) -> Result<(), CorpusError> {
    let text = write_blocks(entries.iter().map(|e| (e.sentence.as_str(), e.amr.as_str())));
    fs::write(path, text).map_err(io_error(path))
}

/// Writes one JSON object per line.
pub fn write_jsonl(path: &Path, entries: &[CorpusEntry]) -> Result<(), CorpusError> {
    let mut out = Vec::new();
    for entry in entries {
        serde_json::to_writer(&mut out, entry)?;
        out.push(b'\n');
    }
    let mut file = fs::File::create(path).map_err(io_error(path))?;
    file.write_all(&out).map_err(io_error(path))
}
