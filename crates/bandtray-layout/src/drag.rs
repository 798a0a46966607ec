#![forbid(unsafe_code)]

//! Drag reflow: resize, reorder, and re-band toolbars from pointer drags.
//!
//! A toolbar is dragged by its leading grip. Each delta moves the grip along
//! the primary axis and is resolved one of two ways:
//!
//! - **Same band** (pointer still over the item's band): the items *before*
//!   the dragged one shrink or grow, nearest first, each clamped to its own
//!   `[min_length, max_length]`, so the grip tracks the pointer. When the
//!   preceding items cannot absorb the move and the pointer has crossed into
//!   the adjacent neighbor, the two items swap positions.
//! - **Other band**: the item is re-banded. Inside an existing band it is
//!   inserted where its grip lands (its leading edge plus the delta); the
//!   pointer only picks the band. Before the first or past the last band it
//!   is detached into a new band of its own.
//!
//! ```text
//! Idle --begin--> Dragging --delta*--> Dragging --end(complete|cancel)--> Idle
//! ```
//!
//! # Invariants
//!
//! 1. Same-band reflow keeps the band table current (swaps exchange list
//!    positions and re-stamp both `band_index` values in place).
//! 2. Cross-band reflow only rewrites item coordinates and marks the table
//!    dirty; the next generation normalizes them.
//! 3. Cancel restores every item's `(band, band_index, explicit_length)` as
//!    recorded by `begin`, bit for bit.
//! 4. Completion leaves the table in the form generation would reproduce.
//!
//! # Failure Modes
//!
//! None surfaced. Infeasible moves are clamped silently; lifecycle misuse is
//! reported as a [`ReflowEffect::Noop`] with a reason.

use bandtray_core::geometry::{Orientation, Point, close, greater_than, less_than};
use serde::{Deserialize, Serialize};

use bandtray_core::logging::{debug, trace, warn};

use crate::band::BandTable;
use crate::config::TrayConfig;
use crate::item::ItemId;
use crate::store::ItemStore;
use crate::transform::{BandGeometry, ItemTransform};

/// Coarse lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragPhase {
    Idle,
    Dragging,
}

/// One item's restorable coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub id: ItemId,
    pub band: i32,
    pub band_index: i32,
    pub explicit_length: Option<f64>,
}

/// An active gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragSession {
    pub item: ItemId,
    /// Dragged item's explicit length when the gesture began.
    pub original_length: Option<f64>,
    /// Every item's coordinates when the gesture began.
    pub snapshot: Vec<ItemSnapshot>,
    /// Deltas applied so far.
    pub deltas: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

impl DragState {
    #[must_use]
    pub const fn phase(&self) -> DragPhase {
        match self {
            Self::Idle => DragPhase::Idle,
            Self::Dragging(_) => DragPhase::Dragging,
        }
    }
}

/// Why a drag event was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReflowNoopReason {
    IdleWithoutActiveDrag,
    DragAlreadyInProgress,
    ItemMismatch,
    UnknownItem,
    TrayLocked,
    ItemLocked,
    /// The transform could not map the pointer into the dragged item.
    NoTransform,
    NonFiniteInput,
    /// Pointer moved only across the band; nothing to reflow.
    ZeroDelta,
}

impl ReflowNoopReason {
    /// Whether the event points at a caller error rather than ordinary
    /// pointer jitter.
    #[must_use]
    pub const fn is_misuse(self) -> bool {
        !matches!(self, Self::ZeroDelta)
    }
}

/// Result of one drag event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum ReflowEffect {
    Started {
        item: ItemId,
        original_length: Option<f64>,
    },
    /// Preceding items were resized; `applied` is the part of `requested`
    /// (same sign) the length ranges allowed.
    Resized {
        item: ItemId,
        requested: f64,
        applied: f64,
    },
    /// The dragged item exchanged positions with `with`.
    Swapped {
        item: ItemId,
        with: ItemId,
        band_index: usize,
    },
    /// The dragged item moved into an existing band. `band_index` is `-1`
    /// when the pointer sat at the band start and the item still awaits
    /// placement.
    Rebanded {
        item: ItemId,
        band: i32,
        band_index: i32,
    },
    /// The pointer left the band range: the item starts a band of its own,
    /// before the first (`band == -1`) or after the last
    /// (`band == band_count`).
    Detached {
        item: ItemId,
        band: i32,
    },
    Completed {
        item: ItemId,
    },
    Canceled {
        item: ItemId,
        restored_length: Option<f64>,
    },
    Noop {
        reason: ReflowNoopReason,
    },
}

impl ReflowEffect {
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        matches!(self, Self::Noop { .. })
    }
}

/// One state-machine step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReflowTransition {
    pub transition_id: u64,
    pub from: DragPhase,
    pub to: DragPhase,
    pub effect: ReflowEffect,
}

/// Mutable view of the tray state the engine operates on.
pub struct ReflowContext<'a> {
    pub table: &'a mut BandTable,
    pub store: &'a mut ItemStore,
    pub config: &'a TrayConfig,
}

impl ReflowContext<'_> {
    fn orientation(&self) -> Orientation {
        self.config.orientation
    }

    fn ensure_bands(&mut self) {
        let orientation = self.orientation();
        self.table.ensure(self.store, orientation);
    }
}

/// Explicit drag lifecycle machine driving reflow.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DragReflowEngine {
    state: DragState,
    transition_counter: u64,
}

impl DragReflowEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> &DragState {
        &self.state
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Item being dragged, if any.
    #[must_use]
    pub fn active_item(&self) -> Option<ItemId> {
        match &self.state {
            DragState::Dragging(session) => Some(session.item),
            DragState::Idle => None,
        }
    }

    fn transition(&mut self, from: DragPhase, effect: ReflowEffect) -> ReflowTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        ReflowTransition {
            transition_id: self.transition_counter,
            from,
            to: self.state.phase(),
            effect,
        }
    }

    fn noop(&mut self, reason: ReflowNoopReason) -> ReflowTransition {
        if reason.is_misuse() {
            warn!(?reason, "drag event ignored");
        } else {
            trace!(?reason, "drag event ignored");
        }
        let phase = self.state.phase();
        self.transition(phase, ReflowEffect::Noop { reason })
    }

    /// Start dragging `item`, recording everything a cancel must restore.
    pub fn begin(&mut self, ctx: &mut ReflowContext<'_>, item: ItemId) -> ReflowTransition {
        if self.is_active() {
            return self.noop(ReflowNoopReason::DragAlreadyInProgress);
        }
        if ctx.config.locked {
            return self.noop(ReflowNoopReason::TrayLocked);
        }
        let Some(target) = ctx.store.get(item) else {
            return self.noop(ReflowNoopReason::UnknownItem);
        };
        if target.is_locked() {
            return self.noop(ReflowNoopReason::ItemLocked);
        }

        ctx.ensure_bands();
        let snapshot = ctx
            .store
            .iter()
            .map(|it| ItemSnapshot {
                id: it.id(),
                band: it.band(),
                band_index: it.band_index(),
                explicit_length: it.explicit_length(),
            })
            .collect();
        let original_length = ctx.store.get(item).and_then(|it| it.explicit_length());

        self.state = DragState::Dragging(DragSession {
            item,
            original_length,
            snapshot,
            deltas: 0,
        });
        debug!(item = %item, "drag started");
        self.transition(
            DragPhase::Idle,
            ReflowEffect::Started {
                item,
                original_length,
            },
        )
    }

    /// Apply one primary-axis delta with the pointer at `pointer` (tray
    /// coordinates).
    ///
    /// `transform` maps tray coordinates into item space; `None` derives it
    /// from the live model via [`BandGeometry`].
    pub fn delta(
        &mut self,
        ctx: &mut ReflowContext<'_>,
        item: ItemId,
        delta: f64,
        pointer: Point,
        transform: Option<&dyn ItemTransform>,
    ) -> ReflowTransition {
        let DragState::Dragging(session) = &mut self.state else {
            return self.noop(ReflowNoopReason::IdleWithoutActiveDrag);
        };
        if session.item != item {
            return self.noop(ReflowNoopReason::ItemMismatch);
        }
        if !delta.is_finite() || !pointer.x.is_finite() || !pointer.y.is_finite() {
            return self.noop(ReflowNoopReason::NonFiniteInput);
        }
        if !ctx.store.contains(item) {
            return self.noop(ReflowNoopReason::UnknownItem);
        }
        session.deltas = session.deltas.saturating_add(1);

        ctx.ensure_bands();
        let live;
        let transform: &dyn ItemTransform = match transform {
            Some(transform) => transform,
            None => {
                live = BandGeometry::capture(ctx.table, ctx.store, ctx.orientation());
                &live
            }
        };

        let effect = match reflow(ctx, transform, item, delta, pointer) {
            Ok(effect) => effect,
            Err(reason) => return self.noop(reason),
        };
        trace!(item = %item, delta, ?effect, "drag delta");
        self.transition(DragPhase::Dragging, effect)
    }

    /// Finish the gesture. A cancel restores the state recorded by `begin`.
    pub fn end(
        &mut self,
        ctx: &mut ReflowContext<'_>,
        item: ItemId,
        canceled: bool,
    ) -> ReflowTransition {
        let session = match std::mem::take(&mut self.state) {
            DragState::Dragging(session) if session.item == item => session,
            DragState::Dragging(session) => {
                self.state = DragState::Dragging(session);
                return self.noop(ReflowNoopReason::ItemMismatch);
            }
            DragState::Idle => return self.noop(ReflowNoopReason::IdleWithoutActiveDrag),
        };

        let effect = if canceled {
            restore(ctx, &session.snapshot);
            ReflowEffect::Canceled {
                item,
                restored_length: session.original_length,
            }
        } else {
            ctx.ensure_bands();
            ReflowEffect::Completed { item }
        };
        debug!(item = %item, canceled, deltas = session.deltas, "drag ended");
        self.transition(DragPhase::Dragging, effect)
    }

    /// Drop an active gesture without touching the model.
    ///
    /// For hosts tearing down mid-gesture; returns `None` when idle.
    pub fn abandon(&mut self) -> Option<ItemId> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging(session) => Some(session.item),
            DragState::Idle => None,
        }
    }
}

fn restore(ctx: &mut ReflowContext<'_>, snapshot: &[ItemSnapshot]) {
    for saved in snapshot {
        if let Some(item) = ctx.store.get_mut(saved.id) {
            item.band = saved.band;
            item.band_index = saved.band_index;
            item.explicit_length = saved.explicit_length;
        }
    }
    ctx.table.mark_dirty();
    ctx.ensure_bands();
    for band in 0..ctx.table.band_count() {
        ctx.table.invalidate_thickness(band);
    }
}

fn reflow(
    ctx: &mut ReflowContext<'_>,
    transform: &dyn ItemTransform,
    item: ItemId,
    delta: f64,
    pointer: Point,
) -> Result<ReflowEffect, ReflowNoopReason> {
    let orientation = ctx.orientation();
    let (band, index) = ctx
        .table
        .locate(item)
        .ok_or(ReflowNoopReason::UnknownItem)?;
    let local = transform
        .to_item(item, pointer)
        .ok_or(ReflowNoopReason::NoTransform)?;

    // Leading edge of the dragged item in tray space, and where the delta
    // wants it to go.
    let leading = orientation.primary_of(pointer) - orientation.primary_of(local);
    let position = leading + delta;
    let hit = ctx.table.band_at(orientation.cross_of(pointer));

    if hit == band as i32 {
        if close(delta, 0.0) {
            return Err(ReflowNoopReason::ZeroDelta);
        }
        Ok(reflow_within_band(
            ctx, transform, item, band, index, delta, leading, position, pointer,
        ))
    } else {
        Ok(move_to_band(ctx, item, band, hit, position))
    }
}

#[allow(clippy::too_many_arguments)]
fn reflow_within_band(
    ctx: &mut ReflowContext<'_>,
    transform: &dyn ItemTransform,
    item: ItemId,
    band: usize,
    index: usize,
    delta: f64,
    leading: f64,
    position: f64,
    pointer: Point,
) -> ReflowEffect {
    let orientation = ctx.orientation();
    let dead_zone = ctx.config.swap_dead_zone;
    let members: Vec<ItemId> = ctx
        .table
        .band(band)
        .map(|b| b.items().to_vec())
        .unwrap_or_default();
    let preceding = &members[..index];
    let neighbor_offset = |neighbor: ItemId| {
        transform
            .to_item(neighbor, pointer)
            .map(|p| orientation.primary_of(p))
    };

    let applied = if less_than(delta, 0.0) {
        let total_min: f64 = preceding
            .iter()
            .filter_map(|&id| ctx.store.get(id))
            .map(|it| it.min_length())
            .sum();
        if !greater_than(total_min, position) {
            -shrink_preceding(ctx, band, preceding, -delta)
        } else if index > 0 {
            let previous = members[index - 1];
            match neighbor_offset(previous) {
                Some(offset) if less_than(offset, -dead_zone) => {
                    return swap(ctx, band, index - 1, index, item);
                }
                _ if less_than(total_min, leading) => {
                    -shrink_preceding(ctx, band, preceding, leading - total_min)
                }
                _ => 0.0,
            }
        } else {
            0.0
        }
    } else {
        let total_max: f64 = preceding
            .iter()
            .filter_map(|&id| ctx.store.get(id))
            .map(|it| it.max_length())
            .sum();
        if greater_than(total_max, position) {
            expand_preceding(ctx, band, preceding, delta)
        } else if index + 1 < members.len() {
            let next = members[index + 1];
            match neighbor_offset(next) {
                Some(offset) if !less_than(offset, dead_zone) => {
                    return swap(ctx, band, index, index + 1, item);
                }
                _ => expand_preceding(ctx, band, preceding, delta),
            }
        } else {
            expand_preceding(ctx, band, preceding, delta)
        }
    };

    ReflowEffect::Resized {
        item,
        requested: delta,
        applied,
    }
}

/// Shrink `ids` from last to first by up to `amount`, each down to its
/// minimum. Returns the amount actually removed.
fn shrink_preceding(ctx: &mut ReflowContext<'_>, band: usize, ids: &[ItemId], amount: f64) -> f64 {
    let orientation = ctx.orientation();
    let mut remaining = amount;
    for &id in ids.iter().rev() {
        if !greater_than(remaining, 0.0) {
            break;
        }
        let Some(item) = ctx.store.get_mut(id) else {
            continue;
        };
        let length = item.effective_length(orientation);
        let slack = (length - item.min_length()).max(0.0);
        if !less_than(slack, remaining) {
            item.explicit_length = Some((length - remaining).max(item.min_length()));
            remaining = 0.0;
        } else if slack > 0.0 {
            item.explicit_length = Some(item.min_length());
            remaining -= slack;
        }
    }
    let applied = amount - remaining.max(0.0);
    if applied > 0.0 {
        ctx.table.invalidate_thickness(band);
    }
    applied
}

/// Grow `ids` from last to first by up to `amount`, each up to its maximum.
/// Returns the amount actually added.
fn expand_preceding(ctx: &mut ReflowContext<'_>, band: usize, ids: &[ItemId], amount: f64) -> f64 {
    let orientation = ctx.orientation();
    let mut remaining = amount;
    for &id in ids.iter().rev() {
        if !greater_than(remaining, 0.0) {
            break;
        }
        let Some(item) = ctx.store.get_mut(id) else {
            continue;
        };
        let length = item.effective_length(orientation);
        let room = (item.max_length() - length).max(0.0);
        if !less_than(room, remaining) {
            item.explicit_length = Some((length + remaining).min(item.max_length()));
            remaining = 0.0;
        } else if room > 0.0 {
            item.explicit_length = Some(item.max_length());
            remaining -= room;
        }
    }
    let applied = amount - remaining.max(0.0);
    if applied > 0.0 {
        ctx.table.invalidate_thickness(band);
    }
    applied
}

/// Exchange band positions `a < b`; both items revert to auto length.
fn swap(
    ctx: &mut ReflowContext<'_>,
    band: usize,
    a: usize,
    b: usize,
    dragged: ItemId,
) -> ReflowEffect {
    let Some(members) = ctx.table.band_mut(band) else {
        return ReflowEffect::Noop {
            reason: ReflowNoopReason::UnknownItem,
        };
    };
    members.swap(a, b);
    let first = members.items()[a];
    let second = members.items()[b];
    for (id, index) in [(first, a), (second, b)] {
        if let Some(item) = ctx.store.get_mut(id) {
            item.band_index = index as i32;
            item.explicit_length = None;
        }
    }
    ctx.table.invalidate_thickness(band);

    let (with, band_index) = if first == dragged {
        (second, a)
    } else {
        (first, b)
    };
    ReflowEffect::Swapped {
        item: dragged,
        with,
        band_index,
    }
}

/// Re-band `item` from `from` to the hit band `target`.
fn move_to_band(
    ctx: &mut ReflowContext<'_>,
    item: ItemId,
    from: usize,
    target: i32,
    position: f64,
) -> ReflowEffect {
    let orientation = ctx.orientation();
    ctx.table.mark_dirty();

    let band_count = ctx.table.band_count() as i32;
    let inside = (0..band_count).contains(&target);
    let band_index = if inside {
        let target = target as usize;
        let index = insert_into_band(ctx, target, position, orientation);
        ctx.table.invalidate_thickness(target);
        index
    } else {
        0
    };

    if let Some(moved) = ctx.store.get_mut(item) {
        moved.band = target;
        moved.band_index = band_index;
        moved.explicit_length = None;
    }

    let left_behind: Vec<ItemId> = ctx
        .table
        .band(from)
        .map(|b| b.items().to_vec())
        .unwrap_or_default();
    for id in left_behind {
        if let Some(other) = ctx.store.get_mut(id) {
            other.explicit_length = None;
        }
    }
    ctx.table.invalidate_thickness(from);

    if inside {
        ReflowEffect::Rebanded {
            item,
            band: target,
            band_index,
        }
    } else {
        ReflowEffect::Detached { item, band: target }
    }
}

/// Make room in `band` at primary offset `position`; returns the slot.
///
/// The member whose extent contains `position` is shrunk (down to its
/// minimum) to end at `position`, and the slot is right after it; later
/// members shift up by one. A position at or before the band start yields
/// `-1`: placed first by the next generation.
fn insert_into_band(
    ctx: &mut ReflowContext<'_>,
    band: usize,
    position: f64,
    orientation: Orientation,
) -> i32 {
    if !greater_than(position, 0.0) {
        return -1;
    }
    let members: Vec<ItemId> = ctx
        .table
        .band(band)
        .map(|b| b.items().to_vec())
        .unwrap_or_default();

    let mut offset = 0.0;
    let mut slot = members.len();
    for (index, &id) in members.iter().enumerate() {
        let Some(member) = ctx.store.get_mut(id) else {
            continue;
        };
        if slot == members.len() {
            let length = member.effective_length(orientation);
            offset += length;
            if greater_than(offset, position) {
                slot = index + 1;
                let trimmed = length - (offset - position);
                member.explicit_length = Some(trimmed.max(member.min_length()));
            }
        } else {
            member.band_index = index as i32 + 1;
        }
    }
    slot as i32
}
