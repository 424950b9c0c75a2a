//! Corpus block files: `#::snt <sentence>` followed by graph lines,
//! blocks separated by blank lines.
//!
//! [`split_blocks`] reads the raw blocks, [`ingest`] repairs and
//! re-encodes each graph to one line, and [`split_train_test`] makes a
//! reproducible train/test partition.

pub mod block;
pub mod error;
pub mod ingest;
pub mod io;
pub mod split;

pub use block::{split_blocks, split_blocks_aligned, write_blocks, RawBlock};
pub use error::CorpusError;
pub use ingest::{aligned_graphs, ingest, CorpusEntry, DroppedBlock, IngestReport};
pub use io::{read_corpus, write_corpus, write_jsonl};
pub use split::{split_train_test, TrainTestSplit};
