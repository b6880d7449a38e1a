//! sentex-core: Text-to-sentences core.
//! Turns parsed article documents into clean, ordered sentences:
//! - Boilerplate section filtering
//! - Body paragraph extraction
//! - Whitespace normalisation
//! - Abbreviation guarding
//! - Sentence segmentation (trainable Punkt-style model or rule fallback)
//! - Per-document pipeline and batch driver

pub mod batch;
pub mod boilerplate;
pub mod document;
pub mod error;
pub mod extractor;
pub mod guard;
pub mod html;
pub mod normalize;
pub mod pipeline;
pub mod segmenter;

pub use batch::{run_batch, BatchJob, BatchProgress, BatchResult};
pub use document::{BlockKind, BlockNode, Document};
pub use error::{Result, SentexError};
pub use extractor::{ExtractorConfig, ParagraphExtractor};
pub use html::HtmlParseOptions;
pub use pipeline::{DocumentOutcome, PipelineContext, Stage};
pub use segmenter::{SegmenterConfig, SentenceSegmenter};
