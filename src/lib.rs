//! Wishly composes greeting cards.
//!
//! A [`Session`] holds the design fields and an optional uploaded image, renders the card on the
//! CPU, and keeps the last design and a list of recurring reminders in a [`KeyValueStore`].
//!
//! - Edit fields with [`Session::apply_edit`]
//! - Drag and scale the image with the pointer methods
//! - Export or share the rendered [`FrameRGBA`]
#![forbid(unsafe_code)]

pub mod assets;
pub mod config;
pub mod design;
pub mod export;
pub mod foundation;
pub mod persist;
pub mod placement;
pub mod reminder;
pub mod render;
pub mod session;

pub use crate::config::EngineConfig;
pub use crate::design::model::{Background, BgPreset, DesignState, Edit, Occasion};
pub use crate::export::share::{NoShareTarget, ShareOutcome, SharePayload, ShareTarget};
pub use crate::foundation::color::Rgba8;
pub use crate::foundation::core::{DisplaySize, Point, Rect, Surface, Vec2};
pub use crate::foundation::error::{WishlyError, WishlyResult};
pub use crate::persist::store::{FileStore, KeyValueStore, MemoryStore};
pub use crate::placement::model::{ImagePlacement, PlacedImage, PlacementLimits, Pointer};
pub use crate::reminder::schedule::{ReminderRecord, ReminderView};
pub use crate::render::cpu::CardRenderer;
pub use crate::render::frame::FrameRGBA;
pub use crate::session::Session;
