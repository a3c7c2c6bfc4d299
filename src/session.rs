use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use rand::SeedableRng;
use rand_pcg::Pcg64;

use crate::config::EngineConfig;
use crate::design::model::{DesignState, Edit};
use crate::design::suggest::{random_message, random_preset, suggest_message};
use crate::export::file::export_png;
use crate::export::share::{ShareOutcome, ShareTarget, share_or_export};
use crate::foundation::core::Surface;
use crate::foundation::error::{WishlyError, WishlyResult};
use crate::persist::design::{load_design, save_design};
use crate::persist::reminders::{clear_reminders, list_reminders, save_reminder};
use crate::persist::snapshot::flatten_image;
use crate::persist::store::KeyValueStore;
use crate::placement::model::{ImagePlacement, PlacedImage, PlacementModel, Pointer};
use crate::reminder::schedule::{ReminderRecord, ReminderView, rank_upcoming};
use crate::render::cpu::CardRenderer;
use crate::render::frame::FrameRGBA;

/// Single-writer editing session: owns the design, the image placement and the latest frame.
///
/// Every mutation re-renders, then writes the design snapshot; drag moves only re-render and
/// the snapshot is written when the drag ends.
pub struct Session {
    config: EngineConfig,
    design: DesignState,
    placement: PlacementModel,
    surface: Surface,
    display_width: Option<u32>,
    renderer: CardRenderer,
    store: Box<dyn KeyValueStore>,
    rng: Pcg64,
    frame: Option<FrameRGBA>,
}

impl Session {
    /// Fresh session with default design. Nothing is rendered yet.
    pub fn new(config: EngineConfig, store: Box<dyn KeyValueStore>) -> WishlyResult<Self> {
        config.validate()?;
        let fonts = config.load_fonts()?;
        let renderer = CardRenderer::new(fonts, config.speckles)?;
        let rng = match config.speckle_seed {
            Some(seed) => Pcg64::seed_from_u64(seed),
            None => Pcg64::seed_from_u64(rand::random()),
        };
        let design = DesignState::default();
        let surface = Surface::for_card(config.base_width, None, design.card_ratio)?;
        Ok(Self {
            placement: PlacementModel::new(config.placement),
            config,
            design,
            surface,
            display_width: None,
            renderer,
            store,
            rng,
            frame: None,
        })
    }

    /// Session seeded from the last saved design (if any) and rendered once.
    pub fn restore(config: EngineConfig, store: Box<dyn KeyValueStore>) -> WishlyResult<Self> {
        let mut session = Self::new(config, store)?;
        if let Some(mut restored) = load_design(session.store.as_ref()) {
            tracing::debug!(saved_at = restored.saved_at, "restoring saved design");
            match Surface::for_card(
                session.config.base_width,
                session.display_width,
                restored.design.card_ratio,
            ) {
                Ok(surface) => session.surface = surface,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        ratio = restored.design.card_ratio,
                        "saved card size does not fit; using the default size"
                    );
                    restored.design.card_ratio = DesignState::default().card_ratio;
                }
            }
            session.design = restored.design;
            if let Some(img) = restored.image {
                session
                    .placement
                    .restore(img.source, img.placement, session.surface);
            }
        }
        session.render()?;
        Ok(session)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn design(&self) -> &DesignState {
        &self.design
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn image(&self) -> Option<&PlacedImage> {
        self.placement.image()
    }

    pub fn placement(&self) -> Option<&ImagePlacement> {
        self.placement.placement()
    }

    pub fn is_dragging(&self) -> bool {
        self.placement.is_dragging()
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// Most recent rendered frame.
    pub fn frame(&self) -> Option<&FrameRGBA> {
        self.frame.as_ref()
    }

    /// Apply a field edit, re-render, and persist. A rejected edit changes nothing.
    pub fn apply_edit(&mut self, edit: Edit) -> WishlyResult<&DesignState> {
        let next = self.design.clone().apply_edit(edit)?;
        let resized = next.card_ratio != self.design.card_ratio;
        if resized {
            self.surface = Surface::for_card(self.config.base_width, self.display_width, next.card_ratio)?;
        }
        self.design = next;
        if resized {
            self.placement.on_surface_resized(self.surface);
        }
        self.refresh()?;
        Ok(&self.design)
    }

    pub fn set_card_size(&mut self, ratio: f64) -> WishlyResult<&DesignState> {
        self.apply_edit(Edit::CardRatio(ratio))
    }

    /// The displayed card width changed; the surface grows with wide displays.
    pub fn resize_display(&mut self, display_width: Option<u32>) -> WishlyResult<Surface> {
        let surface = Surface::for_card(self.config.base_width, display_width, self.design.card_ratio)?;
        self.display_width = display_width;
        if surface != self.surface {
            self.surface = surface;
            self.placement.on_surface_resized(surface);
            self.render()?;
        }
        Ok(self.surface)
    }

    /// Decode and place an uploaded image. Undecodable bytes leave the session untouched.
    pub fn load_image(&mut self, bytes: &[u8]) -> WishlyResult<ImagePlacement> {
        let placement = self.placement.load_image(bytes, self.surface)?;
        self.refresh()?;
        Ok(placement)
    }

    /// Drop the uploaded image (empty file selection).
    pub fn clear_image(&mut self) -> WishlyResult<()> {
        self.placement.clear_image();
        self.refresh()
    }

    /// Press on the card. Returns whether a drag started; a miss recenters the image.
    pub fn pointer_down(&mut self, pointer: Pointer) -> WishlyResult<bool> {
        let had_image = self.placement.image().is_some();
        let dragging = self.placement.begin_drag(pointer, self.surface);
        if !dragging && had_image {
            self.refresh()?;
        }
        Ok(dragging)
    }

    pub fn pointer_move(&mut self, pointer: Pointer) -> WishlyResult<bool> {
        let moved = self.placement.drag_to(pointer, self.surface);
        if moved {
            self.render()?;
        }
        Ok(moved)
    }

    /// Release. The snapshot is written whether or not a drag was active.
    pub fn pointer_up(&mut self) {
        self.placement.end_drag();
        self.persist();
    }

    /// Set the image scale; returns the clamped factor.
    pub fn set_scale(&mut self, factor: f64) -> WishlyResult<f64> {
        let applied = self.placement.set_scale(factor, self.surface);
        self.refresh()?;
        Ok(applied)
    }

    /// Replace the message with a suggestion for the current occasion.
    pub fn suggest_message(&mut self) -> WishlyResult<&DesignState> {
        let msg = suggest_message(self.design.occasion, &mut self.rng);
        self.apply_edit(Edit::Message(msg.to_string()))
    }

    /// Replace the message with a suggestion for a random occasion.
    pub fn random_message(&mut self) -> WishlyResult<&DesignState> {
        let msg = random_message(&mut self.rng);
        self.apply_edit(Edit::Message(msg.to_string()))
    }

    /// Pick a random background preset. An explicit background color still wins.
    pub fn random_theme(&mut self) -> WishlyResult<&DesignState> {
        let preset = random_preset(&mut self.rng);
        self.apply_edit(Edit::BgPreset(preset))
    }

    /// Render the current state into the session frame.
    #[tracing::instrument(skip(self), fields(w = self.surface.width, h = self.surface.height))]
    pub fn render(&mut self) -> WishlyResult<&FrameRGBA> {
        let frame = self.renderer.render(
            &self.design,
            self.placement.image(),
            self.surface,
            &mut self.rng,
        )?;
        Ok(self.frame.insert(frame))
    }

    /// Write the design snapshot. Storage failures are logged, not returned.
    pub fn persist(&mut self) {
        let saved_at = chrono::Utc::now().timestamp_millis();
        save_design(
            self.store.as_mut(),
            &self.design,
            self.placement.image(),
            saved_at,
        );
    }

    fn refresh(&mut self) -> WishlyResult<()> {
        self.render()?;
        self.persist();
        Ok(())
    }

    fn current_frame(&mut self) -> WishlyResult<&FrameRGBA> {
        if self.frame.is_none() {
            self.render()?;
        }
        self.frame
            .as_ref()
            .ok_or_else(|| WishlyError::validation("no frame rendered"))
    }

    /// Save the current design as a recurring reminder.
    pub fn save_reminder(&mut self, now: NaiveDateTime) -> WishlyResult<ReminderRecord> {
        let image = self.placement.image().map(flatten_image).transpose()?;
        let id = now.and_utc().timestamp_millis();
        let record = ReminderRecord::from_design(&self.design, id, now, image);
        save_reminder(self.store.as_mut(), record.clone())?;
        Ok(record)
    }

    pub fn reminders(&self) -> Vec<ReminderRecord> {
        list_reminders(self.store.as_ref())
    }

    /// Upcoming list rows, soonest first.
    pub fn upcoming(&self, now: NaiveDateTime) -> Vec<ReminderView> {
        let records = self.reminders();
        rank_upcoming(&records, now)
            .iter()
            .map(ReminderView::from)
            .collect()
    }

    pub fn clear_reminders(&mut self) -> WishlyResult<()> {
        clear_reminders(self.store.as_mut())
    }

    /// Export the latest frame as `{recipient}_wish.png` into `dir`.
    pub fn export(&mut self, dir: &Path) -> WishlyResult<PathBuf> {
        let recipient = self.design.recipient.clone();
        let frame = self.current_frame()?;
        export_png(frame, &recipient, dir)
    }

    /// Share the latest frame, exporting into `dir` when the target cannot share.
    pub fn share(&mut self, target: &mut dyn ShareTarget, dir: &Path) -> WishlyResult<ShareOutcome> {
        let recipient = self.design.recipient.clone();
        let message = self.design.message.clone();
        let frame = self.current_frame()?;
        share_or_export(target, frame, &recipient, &message, dir)
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
