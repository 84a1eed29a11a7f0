//! Block segmentation and metadata propagation.
//!
//! The raw export is a flat key/value stream. Conversations are delimited
//! only by block-start rows (`APD<digits>`), and each block's metadata
//! appears once, anywhere inside the block.
//!
//! Segmentation runs in two passes over the immutable [`RawTable`]:
//!
//! 1. classify every row, assign its `conv_seq`, and record the first value
//!    seen for each `(conv_seq, metadata key)` pair;
//! 2. join every row with the resolved metadata of its block.
//!
//! # Example
//!
//! ```
//! use convforensic::config::TransformConfig;
//! use convforensic::core::segment::segment;
//! use convforensic::record::RawTable;
//!
//! let table = RawTable::from_pairs([
//!     (Some("APD1"), None),
//!     (Some("a@b.com"), Some("hi")),
//!     (Some("Platform Call ID:"), Some("call-9")),
//! ]);
//! let segmented = segment(&table, &TransformConfig::default());
//!
//! // Metadata found after the message still applies to the whole block.
//! let message = &segmented.rows()[1];
//! assert_eq!(message.block.platform_call_id.as_deref(), Some("call-9"));
//! ```

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use tracing::{debug, warn};

use crate::config::TransformConfig;
use crate::core::models::{AnnotatedRow, BlockMetadata};
use crate::parsing::{MetadataKey, RowKind, classify, parse_conversation_datetime};
use crate::record::{RawRow, RawTable};

/// Annotated rows plus the resolved metadata of every block.
#[derive(Debug, Clone)]
pub struct SegmentedExport<'a> {
    rows: Vec<AnnotatedRow<'a>>,
    blocks: BTreeMap<usize, Rc<BlockMetadata>>,
}

impl<'a> SegmentedExport<'a> {
    /// All annotated rows in `row_num` order.
    pub fn rows(&self) -> &[AnnotatedRow<'a>] {
        &self.rows
    }

    /// Block metadata in `conv_seq` order.
    pub fn blocks(&self) -> impl Iterator<Item = &BlockMetadata> {
        self.blocks.values().map(AsRef::as_ref)
    }

    /// Metadata of one block.
    pub fn block(&self, conv_seq: usize) -> Option<&BlockMetadata> {
        self.blocks.get(&conv_seq).map(AsRef::as_ref)
    }

    /// Number of blocks whose start marker was seen.
    pub fn block_count(&self) -> usize {
        self.blocks.keys().filter(|&&seq| seq > 0).count()
    }

    /// Rows that precede the first block-start marker (`conv_seq == 0`).
    pub fn orphan_rows(&self) -> impl Iterator<Item = &AnnotatedRow<'a>> {
        self.rows.iter().take_while(|row| row.conv_seq == 0)
    }

    /// Removes block 0 and its rows.
    #[must_use]
    pub fn without_orphans(mut self) -> Self {
        self.rows.retain(|row| row.conv_seq > 0);
        self.blocks.remove(&0);
        self
    }
}

/// Segments `table` into blocks and propagates block metadata to every row.
pub fn segment<'a>(table: &'a RawTable, config: &TransformConfig) -> SegmentedExport<'a> {
    let classified = classify_rows(table);
    let blocks = resolve_blocks(&classified, config);

    let rows = classified
        .into_iter()
        .map(|(raw, kind, conv_seq)| AnnotatedRow {
            raw,
            kind,
            conv_seq,
            block: Rc::clone(&blocks[&conv_seq]),
        })
        .collect();

    debug!(
        rows = table.len(),
        blocks = blocks.len(),
        "export segmented into blocks"
    );

    SegmentedExport { rows, blocks }
}

/// Pass 1a: row kind and running block index.
fn classify_rows(table: &RawTable) -> Vec<(&RawRow, RowKind, usize)> {
    table
        .rows()
        .iter()
        .scan(0usize, |conv_seq, row| {
            let kind = classify(row.col1());
            if kind.is_block_start() {
                *conv_seq += 1;
            }
            Some((row, kind, *conv_seq))
        })
        .collect()
}

/// Pass 1b: first value per `(block, key)`, then one [`BlockMetadata`] per block.
fn resolve_blocks(
    classified: &[(&RawRow, RowKind, usize)],
    config: &TransformConfig,
) -> BTreeMap<usize, Rc<BlockMetadata>> {
    let mut first_rows: BTreeMap<usize, &RawRow> = BTreeMap::new();
    let mut markers: HashMap<usize, &str> = HashMap::new();
    // First occurrence wins even when its value cell is empty.
    let mut values: HashMap<(usize, MetadataKey), Option<&str>> = HashMap::new();

    for &(row, kind, conv_seq) in classified {
        first_rows.entry(conv_seq).or_insert(row);
        match kind {
            RowKind::BlockStart => {
                if let Some(marker) = row.col1() {
                    markers.insert(conv_seq, marker);
                }
            }
            RowKind::Metadata(key) => {
                values.entry((conv_seq, key)).or_insert(row.col2());
            }
            RowKind::Message | RowKind::Unclassified => {}
        }
    }

    let value_of = |conv_seq: usize, key: MetadataKey| {
        values
            .get(&(conv_seq, key))
            .copied()
            .flatten()
            .map(str::to_string)
    };

    first_rows
        .into_iter()
        .map(|(conv_seq, first_row)| {
            let datetime_raw = value_of(conv_seq, MetadataKey::DateAndTime);
            let conversation_datetime = datetime_raw
                .as_deref()
                .and_then(|raw| parse_conversation_datetime(raw, &config.datetime_format));

            let block = BlockMetadata {
                conv_seq,
                extraction_group_id: markers.get(&conv_seq).map(|m| (*m).to_string()),
                conversation_id: value_of(conv_seq, MetadataKey::ConversationIdentifier),
                platform_call_id: value_of(conv_seq, MetadataKey::PlatformCallId),
                datetime_raw,
                conversation_datetime,
                first_row_num: first_row.row_num(),
            };

            if block.has_unparsed_datetime() {
                warn!(
                    conv_seq,
                    row_num = block.first_row_num,
                    value = block.datetime_raw.as_deref().unwrap_or_default(),
                    "unparseable conversation datetime, leaving it null"
                );
            }

            (conv_seq, Rc::new(block))
        })
        .collect()
}
