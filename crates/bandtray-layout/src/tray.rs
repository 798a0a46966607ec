#![forbid(unsafe_code)]

//! The tray: owns the items, the band table, and the drag engine.
//!
//! All mutation goes through explicit calls. Structural setters report
//! whether the band table must be regenerated; the regeneration itself is
//! deferred to the next layout pass or drag event, which call
//! [`BandTable::ensure`] first.
//!
//! # Invariants
//!
//! 1. Item ids are allocated by the tray, never reused, and never zero.
//! 2. Collection order is insertion order (adjusted by [`Tray::move_item`]);
//!    it breaks `band_index` ties and nothing else.
//! 3. The item being dragged cannot be removed until its gesture ends.
//!
//! # Failure Modes
//!
//! Invalid lengths and unknown ids are rejected with [`TrayError`] before
//! any state changes.

use bandtray_core::geometry::{Orientation, Point, Rect, Size};

use bandtray_core::logging::{debug, info_span};

use crate::band::{Band, BandTable};
use crate::config::TrayConfig;
use crate::drag::{DragReflowEngine, ReflowContext, ReflowTransition};
use crate::error::{TrayConfigError, TrayError};
use crate::item::{ItemId, ItemSpec, ToolbarItem, validate_explicit_length};
use crate::layout::{self, IntrinsicMeasure, ItemMeasure};
use crate::store::ItemStore;
use crate::transform::ItemTransform;

/// A toolbar tray.
#[derive(Debug, Clone)]
pub struct Tray {
    config: TrayConfig,
    store: ItemStore,
    table: BandTable,
    engine: DragReflowEngine,
    next_id: ItemId,
    measure_pending: bool,
}

impl Default for Tray {
    fn default() -> Self {
        Self::with_config(TrayConfig::default())
    }
}

impl Tray {
    /// Create a tray from a validated config.
    pub fn new(config: TrayConfig) -> Result<Self, TrayConfigError> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: TrayConfig) -> Self {
        Self {
            config,
            store: ItemStore::new(),
            table: BandTable::new(),
            engine: DragReflowEngine::new(),
            next_id: ItemId::MIN,
            measure_pending: true,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &TrayConfig {
        &self.config
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.config.orientation
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    // --- structure ---------------------------------------------------------

    /// Append an item to the collection.
    pub fn add_item(&mut self, spec: ItemSpec) -> Result<ItemId, TrayError> {
        self.insert_item(self.store.len(), spec)
    }

    /// Insert an item at collection position `at` (`0..=len`).
    pub fn insert_item(&mut self, at: usize, spec: ItemSpec) -> Result<ItemId, TrayError> {
        if at > self.store.len() {
            return Err(TrayError::IndexOutOfBounds {
                index: at,
                len: self.store.len(),
            });
        }
        let id = self.next_id;
        let item = ToolbarItem::from_spec(id, spec)?;
        self.next_id = id.next();
        self.store.insert(at, item);
        self.structure_changed();
        debug!(item = %id, at, band = spec.band, band_index = spec.band_index, "toolbar added");
        Ok(id)
    }

    /// Remove an item and return it.
    pub fn remove_item(&mut self, id: ItemId) -> Result<ToolbarItem, TrayError> {
        if self.engine.active_item() == Some(id) {
            return Err(TrayError::DragInProgress(id));
        }
        let item = self.store.remove(id).ok_or(TrayError::UnknownItem(id))?;
        self.structure_changed();
        debug!(item = %id, "toolbar removed");
        Ok(item)
    }

    /// Move an item to collection position `to` (`0..len`).
    ///
    /// Returns whether the band table needs regeneration.
    pub fn move_item(&mut self, id: ItemId, to: usize) -> Result<bool, TrayError> {
        let from = self.store.position(id).ok_or(TrayError::UnknownItem(id))?;
        if to >= self.store.len() {
            return Err(TrayError::IndexOutOfBounds {
                index: to,
                len: self.store.len(),
            });
        }
        if from == to {
            return Ok(false);
        }
        self.store.move_item(from, to);
        self.structure_changed();
        Ok(true)
    }

    /// Request a band for `id`. Returns whether the band table needs
    /// regeneration.
    pub fn set_band(&mut self, id: ItemId, band: i32) -> Result<bool, TrayError> {
        self.item_mut(id)?.band = band;
        Ok(self.coordinates_changed())
    }

    /// Request a position within the item's band. Returns whether the band
    /// table needs regeneration.
    pub fn set_band_index(&mut self, id: ItemId, band_index: i32) -> Result<bool, TrayError> {
        self.item_mut(id)?.band_index = band_index;
        Ok(self.coordinates_changed())
    }

    /// Set or clear (`None`) the explicit length override.
    ///
    /// Band structure is unaffected, so this always returns `Ok(false)`;
    /// the next measure pass picks the change up.
    pub fn set_explicit_length(
        &mut self,
        id: ItemId,
        length: Option<f64>,
    ) -> Result<bool, TrayError> {
        if let Some(length) = length {
            validate_explicit_length(length)?;
        }
        self.item_mut(id)?.explicit_length = length;
        self.invalidate_band_of(id);
        Ok(false)
    }

    /// Replace an item's `[min_length, max_length]` range.
    ///
    /// Returns `Ok(false)`: lengths never change band structure.
    pub fn set_length_bounds(&mut self, id: ItemId, min: f64, max: f64) -> Result<bool, TrayError> {
        self.item_mut(id)?.set_length_bounds(min, max)?;
        self.invalidate_band_of(id);
        Ok(false)
    }

    /// Change the natural content size reported by [`IntrinsicMeasure`].
    pub fn set_content(&mut self, id: ItemId, content: Size) -> Result<(), TrayError> {
        self.item_mut(id)?.content = content;
        self.invalidate_band_of(id);
        Ok(())
    }

    /// Switch orientation. Returns whether the band table needs
    /// regeneration.
    pub fn set_orientation(&mut self, orientation: Orientation) -> bool {
        if self.config.orientation == orientation {
            return false;
        }
        self.config.orientation = orientation;
        // Provisional thickness is read from the other axis now.
        self.structure_changed();
        true
    }

    /// Lock or unlock every toolbar against dragging.
    pub fn set_locked(&mut self, locked: bool) {
        self.config.locked = locked;
    }

    /// Lock or unlock a single toolbar against dragging.
    pub fn set_item_locked(&mut self, id: ItemId, locked: bool) -> Result<(), TrayError> {
        self.item_mut(id)?.locked = locked;
        Ok(())
    }

    fn item_mut(&mut self, id: ItemId) -> Result<&mut ToolbarItem, TrayError> {
        self.store.get_mut(id).ok_or(TrayError::UnknownItem(id))
    }

    fn structure_changed(&mut self) {
        self.table.mark_dirty();
        self.measure_pending = true;
    }

    fn coordinates_changed(&mut self) -> bool {
        let dirty = self.table.is_dirty(&self.store);
        if dirty {
            self.measure_pending = true;
        }
        dirty
    }

    fn invalidate_band_of(&mut self, id: ItemId) {
        if let Some((band, _)) = self.table.locate(id) {
            self.table.invalidate_thickness(band);
        }
        self.measure_pending = true;
    }

    // --- layout ------------------------------------------------------------

    /// Regenerate the band table if it is dirty. Returns whether it was.
    pub fn ensure_bands(&mut self) -> bool {
        let orientation = self.config.orientation;
        self.table.ensure(&mut self.store, orientation)
    }

    /// Whether a layout pass is due.
    #[must_use]
    pub fn needs_measure(&self) -> bool {
        self.measure_pending
            || self.table.has_stale_thickness()
            || self.table.is_dirty(&self.store)
    }

    /// Measure with each item's declared content size.
    pub fn measure(&mut self, available: Size) -> Size {
        self.measure_with(available, &mut IntrinsicMeasure)
    }

    /// Measure with a host-supplied measurement callback.
    pub fn measure_with(&mut self, available: Size, measurer: &mut dyn ItemMeasure) -> Size {
        self.ensure_bands();
        let desired = layout::measure(
            &mut self.table,
            &mut self.store,
            self.config.orientation,
            available,
            measurer,
        );
        self.measure_pending = false;
        desired
    }

    /// Arrange from the last measure pass. Returns `final_size`.
    pub fn arrange(&mut self, final_size: Size) -> Size {
        layout::arrange(
            &self.table,
            &mut self.store,
            self.config.orientation,
            final_size,
        )
    }

    /// Measure against `available`, then arrange into it. Returns the
    /// desired size.
    pub fn update_layout(&mut self, available: Size) -> Size {
        let _span = info_span!("bandtray.update_layout").entered();
        let desired = self.measure(available);
        self.arrange(available);
        desired
    }

    // --- drag --------------------------------------------------------------

    fn drag_parts(&mut self) -> (&mut DragReflowEngine, ReflowContext<'_>) {
        (
            &mut self.engine,
            ReflowContext {
                table: &mut self.table,
                store: &mut self.store,
                config: &self.config,
            },
        )
    }

    fn after_drag(&mut self, transition: ReflowTransition) -> ReflowTransition {
        if !transition.effect.is_noop() {
            self.measure_pending = true;
        }
        transition
    }

    #[must_use]
    pub const fn drag_engine(&self) -> &DragReflowEngine {
        &self.engine
    }

    /// Item being dragged, if any.
    #[must_use]
    pub fn dragging(&self) -> Option<ItemId> {
        self.engine.active_item()
    }

    pub fn begin_drag(&mut self, id: ItemId) -> ReflowTransition {
        let (engine, mut ctx) = self.drag_parts();
        let transition = engine.begin(&mut ctx, id);
        self.after_drag(transition)
    }

    /// Apply a drag delta, deriving item transforms from the live model.
    pub fn drag_delta(&mut self, id: ItemId, delta: f64, pointer: Point) -> ReflowTransition {
        let (engine, mut ctx) = self.drag_parts();
        let transition = engine.delta(&mut ctx, id, delta, pointer, None);
        self.after_drag(transition)
    }

    /// Apply a drag delta using host-supplied item transforms.
    pub fn drag_delta_with(
        &mut self,
        id: ItemId,
        delta: f64,
        pointer: Point,
        transform: &dyn ItemTransform,
    ) -> ReflowTransition {
        let (engine, mut ctx) = self.drag_parts();
        let transition = engine.delta(&mut ctx, id, delta, pointer, Some(transform));
        self.after_drag(transition)
    }

    pub fn end_drag(&mut self, id: ItemId, canceled: bool) -> ReflowTransition {
        let (engine, mut ctx) = self.drag_parts();
        let transition = engine.end(&mut ctx, id, canceled);
        self.after_drag(transition)
    }

    // --- queries -----------------------------------------------------------

    /// Items in collection order.
    #[must_use]
    pub fn items(&self) -> &[ToolbarItem] {
        self.store.as_slice()
    }

    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&ToolbarItem> {
        self.store.get(id)
    }

    /// Bands as of the last generation. Call [`Tray::ensure_bands`] (or
    /// run a layout pass) first for a current view.
    #[must_use]
    pub fn bands(&self) -> &[Band] {
        self.table.bands()
    }

    #[must_use]
    pub const fn band_table(&self) -> &BandTable {
        &self.table
    }

    /// Items a drag detached that band generation has not placed yet.
    pub fn pending_items(&self) -> impl Iterator<Item = &ToolbarItem> {
        self.store.iter().filter(|item| item.is_pending())
    }

    /// Arranged slot of `id` from the last arrange pass.
    #[must_use]
    pub fn item_rect(&self, id: ItemId) -> Option<Rect> {
        self.store.get(id).map(ToolbarItem::rendered_rect)
    }
}
