pub mod code_extractor;
pub mod output_manager;

pub use code_extractor::{
    read_source_file, CodeExtraction, CodeExtractor, CombinedRecord, ExtractedFileSet,
    ExtractionProgress, ReadFailure, ReadFailureKind, SEPARATOR,
};
pub use output_manager::{ArtifactPaths, ConfigSnapshot, OutputManager, RunReport, RunSummary};
