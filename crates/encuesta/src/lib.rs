//! Encuesta: survey record reconciliation, browsing and workbook export.
//!
//! Encuesta loads survey datasets (socioeconomic and clinical questionnaires)
//! together with a codebook that maps coded answers to their labels, renders
//! them as cards, filters them by free text, and exports them to workbooks.
//! It also builds the labeled dataset from raw form submissions and codes
//! labeled answers back to codebook codes.
//!
//! # Core Principles
//!
//! - **Records stay as they came**: field sets and order vary per dataset and
//!   are never forced into a fixed schema
//! - **Partial data is still data**: a dataset that fails to load is empty,
//!   the others remain usable
//! - **Export is raw**: missing fields export as empty cells, not as the
//!   `N/A` shown on screen
//!
//! # Example
//!
//! ```no_run
//! use encuesta::{DatasetKind, ExportTarget, FileSource, Session, XlsxWriter};
//!
//! let mut session = Session::new();
//! let report = session.load_all(&FileSource::new("data"));
//! println!("Loaded: {:?}", report.loaded);
//!
//! for card in session.cards(DatasetKind::Original, "norte") {
//!     println!("{}", card);
//! }
//!
//! for path in session.export(ExportTarget::All, &XlsxWriter::new(), "out").unwrap() {
//!     println!("Saved {}", path.display());
//! }
//! ```

pub mod codebook;
pub mod codify;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod filter;
pub mod import;
pub mod normalize;
pub mod record;
pub mod render;
pub mod session;
pub mod source;
pub mod translate;

pub use codebook::{
    Codebook, CodebookEntry, DisplayEntry, ExportRow, OptionMatch, display_entries, export_rows,
    fold_text,
};
pub use codify::{
    CodifyReport, DEFAULT_MIN_SCORE, LowConfidenceMatch, codify_records, codify_records_with,
};
pub use config::{ExportConfig, ExportFormat, SourceConfig};
pub use dataset::{DatasetKind, ExportTarget};
pub use error::{EncuestaError, Result};
pub use export::{CsvWriter, WorkbookWriter, XlsxWriter, build_workbook};
pub use filter::{Searchable, filter_codebook, filter_records};
pub use import::import_workbook;
pub use normalize::{IDENTIFIER_ALIASES, NOT_AVAILABLE, NormalizedRecord, normalize};
pub use record::Record;
pub use render::{Card, codebook_cards, record_card, record_cards};
pub use session::{EMPTY_EXPORT_NOTICE, LoadReport, Session, SlotStatus};
pub use source::{DataSource, FileSource, Loaded, SourceMetadata};
pub use translate::{FormStructure, read_submissions, translate_records};
