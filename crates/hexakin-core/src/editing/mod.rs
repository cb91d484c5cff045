//! Editing parameters and selection tracking.

mod params;
mod selection;

pub use params::{
    DEFAULT_REFINE_INSTRUCTION, EditingParameters, EditorType, Purpose, RefinePreset, Style,
    TargetTone, option_labels, refine_instruction,
};
pub use selection::{SelectionState, SelectionTracker};
