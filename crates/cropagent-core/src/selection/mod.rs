//! Selection domain module.
//!
//! The selection is the (region, crop, language) triple the user is looking
//! at. `SelectionState` owns it and guarantees the crop always belongs to
//! the region's crop set.
//!
//! # Module Structure
//!
//! - `language`: Supported response languages (`Language`)
//! - `model`: The selection triple and its state holder (`Selection`, `SelectionState`)

mod language;
mod model;

pub use language::Language;
pub use model::{ChangeKind, Selection, SelectionChanged, SelectionState};
