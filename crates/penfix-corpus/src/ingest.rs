//! Turning raw corpus blocks into normalized one-line entries.

use penfix_core::{decode, encode_one_line, to_one_line};
use penfix_repair::RepairPipeline;
use serde::{Deserialize, Serialize};

use crate::block::{split_blocks, split_blocks_aligned};

/// A sentence and its graph, normalized to one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub sentence: String,
    pub amr: String,
}

/// A block that still failed to decode after repair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedBlock {
    pub sentence: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub entries: Vec<CorpusEntry>,
    pub dropped: Vec<DroppedBlock>,
}

/// Reads every block of `text`, repairs its graph with the corpus preset,
/// decodes it and re-encodes it on one line. Blocks that do not decode are
/// reported in [`IngestReport::dropped`].
pub fn ingest(text: &str) -> IngestReport {
    let pipeline = RepairPipeline::corpus();
    let mut report = IngestReport::default();

    for block in split_blocks(text) {
        let repaired = pipeline.run(&block.graph_text());
        match decode(&repaired) {
            Ok(decoded) => {
                for warning in &decoded.warnings {
                    tracing::warn!(sentence = %block.sentence, %warning, "decode warning");
                }
                report.entries.push(CorpusEntry {
                    sentence: block.sentence,
                    amr: encode_one_line(&decoded.tree),
                });
            }
            Err(err) => {
                tracing::debug!(sentence = %block.sentence, error = %err, "dropping block");
                report.dropped.push(DroppedBlock {
                    sentence: block.sentence,
                    error: err.to_string(),
                });
            }
        }
    }

    tracing::info!(
        kept = report.entries.len(),
        dropped = report.dropped.len(),
        "ingested corpus"
    );
    report
}

/// Graph of every block in file order, repaired with the corpus preset
/// and flattened to one line, without decoding. Nothing is dropped: a graph
/// that will not decode keeps its slot (empty when the block had no graph
/// lines), so two corpora with the same sentences line up block by block.
pub fn aligned_graphs(text: &str) -> Vec<String> {
    let pipeline = RepairPipeline::corpus();
    split_blocks_aligned(text)
        .iter()
        .map(|block| to_one_line(&pipeline.run(&block.graph_text())))
        .collect()
}
