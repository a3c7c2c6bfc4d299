//! What the user chose: fields, themes, palettes and message suggestions.

pub mod model;
pub mod palette;
pub mod suggest;
