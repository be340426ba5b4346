//! 类型定义模块

mod batch;
mod export;
mod selection;
mod status;

pub use batch::{BatchOutcome, RecordMap, StatusMap};
pub use export::{
    description_record, AttributeSequences, ExportArtifact, ExportPayload, DESCRIPTION_KEY,
    NO_DESCRIPTION,
};
pub use selection::SelectionSet;
pub use status::{is_error, ScanStatus, StatusKind};

// Re-export provider 库的公共类型
pub use twin_scanner_provider::{AttributeMetadata, Record, RecordExt, Value};
