//! Arcana description extraction
//!
//! Turns the arcana description text (`=== N АРКАН ===` blocks with
//! `### Сфера: ... ###` sections) into the nested arcana → sphere → text
//! mapping consumed by the front-end.
//!
//! ## Modules
//! - `categories`: ordered keyword table, label → sphere category
//! - `descriptions`: insertion-ordered result mapping
//! - `extractor`: block/section splitting and the single extraction pass
//! - `output`: data script rendering and the file pipeline

pub mod categories;
pub mod descriptions;
pub mod extractor;
pub mod output;

pub use categories::{classify_sphere, SphereCategory, SphereRule, SPHERE_RULES};
pub use descriptions::{ArcanaDescriptions, SphereTexts};
pub use extractor::{
    extract_descriptions, extract_sections, normalize_newlines, parse_block_id, split_blocks,
    ExtractionOutcome, ExtractionStats, SphereSection,
};
pub use output::{render_data_script, run_extraction, ArcanaSummary, ExtractionSummary, GENERATED_HEADER};
