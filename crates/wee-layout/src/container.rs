//! The container: ordered child slots plus the flags that steer resolution.
//!
//! Every slot carries its own [`Alignment`], so there is no separate
//! alignment table to keep in sync with the child list. Removing a child
//! drops its alignment with it.
//!
//! Mutations do not lay anything out. They record a [`LayoutEvent`] that the
//! [`LayoutDriver`](crate::driver::LayoutDriver) picks up on its next
//! [`process`](crate::driver::LayoutDriver::process) call.
//!
//! # Example
//!
//! ```
//! use wee_layout::prelude::*;
//!
//! let mut container = Container::new(Direction::Row);
//! container.set_width("300px");
//! container.add_child(Cell::new(ChildId(1))).unwrap();
//! container
//!     .add_child_aligned(Cell::new(ChildId(2)), Alignment::BOTTOM_RIGHT)
//!     .unwrap();
//!
//! assert_eq!(container.alignment_of(ChildId(1)), Alignment::TOP_LEFT);
//! assert_eq!(container.index_of(ChildId(2)), Some(1));
//!
//! container.remove_child(ChildId(2));
//! assert_eq!(
//!     container.set_alignment(ChildId(2), Alignment::TOP_CENTER),
//!     Err(LayoutError::InvalidAlignmentTarget(ChildId(2)))
//! );
//! ```

use crate::cell::{Cell, ChildId};
use crate::config::{EVENT_QUEUE_DEPTH, MAX_CHILDREN};
use crate::driver::LayoutEvent;
use crate::error::LayoutError;
use crate::style::{Alignment, Axis, Direction, SizeMode};
use embedded_graphics::prelude::Size;
use heapless::Vec;

/// A child together with its alignment.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Slot {
    cell: Cell,
    alignment: Alignment,
}

impl Slot {
    /// The child box.
    pub fn cell(&self) -> &Cell {
        &self.cell
    }

    /// Placement of the child in its slot.
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }
}

/// A single-axis layout container.
#[derive(Debug, Clone)]
pub struct Container {
    direction: Direction,
    declared_width: SizeMode,
    declared_height: SizeMode,
    /// Last measured inner size, `None` until the first measured pass.
    resolved: Option<Size>,
    clip: bool,
    smart_relative: bool,
    slots: Vec<Slot, MAX_CHILDREN>,
    pending: Vec<LayoutEvent, EVENT_QUEUE_DEPTH>,
}

impl Container {
    /// Create an empty container. The direction cannot be changed later.
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            declared_width: SizeMode::Undefined,
            declared_height: SizeMode::Undefined,
            resolved: None,
            clip: false,
            smart_relative: false,
            slots: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Direction children flow in.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    // ── Container size ──────────────────────────────────────────────────────

    /// Declare the container width, e.g. `"300px"`, `"50%"` or `""` for undefined.
    ///
    /// Malformed strings leave the width undefined.
    pub fn set_width(&mut self, width: &str) {
        self.declared_width = SizeMode::parse_lossy(width);
        self.note(LayoutEvent::ContainerResized);
    }

    /// Declare the container height. See [`set_width`](Self::set_width).
    pub fn set_height(&mut self, height: &str) {
        self.declared_height = SizeMode::parse_lossy(height);
        self.note(LayoutEvent::ContainerResized);
    }

    /// Declared width.
    pub fn declared_width(&self) -> SizeMode {
        self.declared_width
    }

    /// Declared height.
    pub fn declared_height(&self) -> SizeMode {
        self.declared_height
    }

    fn declared(&self, axis: Axis) -> SizeMode {
        match axis {
            Axis::Horizontal => self.declared_width,
            Axis::Vertical => self.declared_height,
        }
    }

    /// The main-axis size is derived from the children.
    pub fn is_main_undefined(&self) -> bool {
        !self.declared(self.direction.main_axis()).is_defined()
    }

    /// The cross-axis size is derived from the children.
    pub fn is_cross_undefined(&self) -> bool {
        !self.declared(self.direction.cross_axis()).is_defined()
    }

    /// Whether percentages along the main axis resolve to anything.
    ///
    /// Against an undefined main size they are treated as zero unless smart
    /// relative sizing is on.
    pub fn percent_sizing_meaningful(&self) -> bool {
        !self.is_main_undefined() || self.smart_relative
    }

    /// Whether percentages along the cross axis resolve to anything.
    pub fn cross_percent_meaningful(&self) -> bool {
        !self.is_cross_undefined() || self.smart_relative
    }

    /// Inner size measured by the last pass that tracked it.
    pub fn resolved_size(&self) -> Option<Size> {
        self.resolved
    }

    /// Resolved main-axis size in pixels.
    pub fn main_size(&self) -> Option<u32> {
        self.resolved.map(|size| self.direction.main_axis().of(size))
    }

    /// Resolved cross-axis size in pixels.
    pub fn cross_size(&self) -> Option<u32> {
        self.resolved.map(|size| self.direction.cross_axis().of(size))
    }

    pub(crate) fn set_resolved_size(&mut self, size: Size) {
        self.resolved = Some(size);
    }

    // ── Flags ───────────────────────────────────────────────────────────────

    /// Whether overflowing children are clipped.
    pub fn clip(&self) -> bool {
        self.clip
    }

    /// Clip children that overflow the container.
    pub fn set_clipping(&mut self, clip: bool) {
        self.clip = clip;
        self.note(LayoutEvent::ChildrenChanged);
    }

    /// Whether percentages resolve inside an undefined-size container.
    pub fn smart_relative(&self) -> bool {
        self.smart_relative
    }

    /// Resolve percentages even when the container main size is undefined.
    ///
    /// The container then takes the size its children render at.
    pub fn set_smart_relative_sizes(&mut self, smart: bool) {
        self.smart_relative = smart;
        self.note(LayoutEvent::ChildrenChanged);
    }

    // ── Children ────────────────────────────────────────────────────────────

    /// Append a child with the default alignment.
    ///
    /// # Errors
    ///
    /// [`LayoutError::DuplicateChild`] if the child is already present,
    /// [`LayoutError::CapacityExceeded`] if the container is full.
    pub fn add_child(&mut self, cell: Cell) -> Result<(), LayoutError> {
        self.add_child_aligned(cell, Alignment::TOP_LEFT)
    }

    /// Append a child with an alignment.
    ///
    /// # Errors
    ///
    /// See [`add_child`](Self::add_child).
    pub fn add_child_aligned(&mut self, cell: Cell, alignment: Alignment) -> Result<(), LayoutError> {
        self.insert_child_aligned(self.slots.len(), cell, alignment)
    }

    /// Insert a child at `index`, shifting later children back.
    ///
    /// # Errors
    ///
    /// [`LayoutError::IndexOutOfBounds`] if `index > len()`, otherwise as
    /// [`add_child`](Self::add_child).
    pub fn insert_child(&mut self, index: usize, cell: Cell) -> Result<(), LayoutError> {
        self.insert_child_aligned(index, cell, Alignment::TOP_LEFT)
    }

    /// Insert a child with an alignment at `index`.
    ///
    /// # Errors
    ///
    /// See [`insert_child`](Self::insert_child).
    pub fn insert_child_aligned(
        &mut self,
        index: usize,
        cell: Cell,
        alignment: Alignment,
    ) -> Result<(), LayoutError> {
        if self.contains(cell.id()) {
            return Err(LayoutError::DuplicateChild(cell.id()));
        }
        let len = self.slots.len();
        if index > len {
            return Err(LayoutError::IndexOutOfBounds { index, len });
        }
        self.slots
            .insert(index, Slot { cell, alignment })
            .map_err(|_| LayoutError::CapacityExceeded)?;
        self.note(LayoutEvent::ChildrenChanged);
        Ok(())
    }

    /// Remove a child and its alignment. Removing an absent child is a no-op.
    pub fn remove_child(&mut self, id: ChildId) -> Option<Cell> {
        let index = self.index_of(id)?;
        let slot = self.slots.remove(index);
        self.note(LayoutEvent::ChildrenChanged);
        Some(slot.cell)
    }

    /// Put `new` where `old` is.
    ///
    /// - `old` absent: `new` is appended.
    /// - `new` absent: `old` is removed and `new` takes its index with the
    ///   default alignment.
    /// - both present: the two slots swap places, keeping their alignments.
    ///
    /// # Errors
    ///
    /// As [`add_child`](Self::add_child) when `new` has to be added.
    pub fn replace_child(&mut self, old: ChildId, new: Cell) -> Result<(), LayoutError> {
        match (self.index_of(old), self.index_of(new.id())) {
            (None, _) => self.add_child(new),
            (Some(old_index), None) => {
                self.slots.remove(old_index);
                self.insert_child(old_index, new)
            }
            (Some(old_index), Some(new_index)) => {
                self.slots.swap(old_index, new_index);
                self.note(LayoutEvent::ChildrenChanged);
                Ok(())
            }
        }
    }

    /// Set the alignment of a child already in the container.
    ///
    /// # Errors
    ///
    /// [`LayoutError::InvalidAlignmentTarget`] if the child is absent. Nothing
    /// is changed in that case.
    pub fn set_alignment(&mut self, id: ChildId, alignment: Alignment) -> Result<(), LayoutError> {
        let slot = self
            .slots
            .iter_mut()
            .find(|slot| slot.cell.id() == id)
            .ok_or(LayoutError::InvalidAlignmentTarget(id))?;
        slot.alignment = alignment;
        self.note(LayoutEvent::ChildrenChanged);
        Ok(())
    }

    /// Alignment of a child; top-left when none was set or the child is absent.
    pub fn alignment_of(&self, id: ChildId) -> Alignment {
        self.slot(id).map_or(Alignment::TOP_LEFT, Slot::alignment)
    }

    /// Refresh a child's declared sizes from the host.
    ///
    /// Returns `false` if the child is absent.
    pub fn update_child_size(&mut self, id: ChildId, width: SizeMode, height: SizeMode) -> bool {
        let Some(cell) = self.cell_mut(id) else {
            return false;
        };
        if cell.resync(width, height) {
            self.note(LayoutEvent::ChildSizeChanged(id));
        }
        true
    }

    /// Refresh a child's declared sizes from length strings.
    ///
    /// Malformed strings become `Undefined`. Returns `false` if the child is absent.
    pub fn update_child_size_str(&mut self, id: ChildId, width: &str, height: &str) -> bool {
        self.update_child_size(id, SizeMode::parse_lossy(width), SizeMode::parse_lossy(height))
    }

    /// Show or hide a child's caption. Returns `false` if the child is absent.
    pub fn set_child_caption(&mut self, id: ChildId, has_caption: bool) -> bool {
        let Some(cell) = self.cell_mut(id) else {
            return false;
        };
        if cell.set_caption(has_caption) {
            self.note(LayoutEvent::ChildSizeChanged(id));
        }
        true
    }

    /// Position of a child in layout order.
    pub fn index_of(&self, id: ChildId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.cell.id() == id)
    }

    /// Child at a layout position.
    pub fn child_at(&self, index: usize) -> Option<&Cell> {
        self.slots.get(index).map(Slot::cell)
    }

    /// Look up a child's cell.
    pub fn cell(&self, id: ChildId) -> Option<&Cell> {
        self.slot(id).map(Slot::cell)
    }

    fn slot(&self, id: ChildId) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.cell.id() == id)
    }

    pub(crate) fn cell_mut(&mut self, id: ChildId) -> Option<&mut Cell> {
        self.slots
            .iter_mut()
            .map(|slot| &mut slot.cell)
            .find(|cell| cell.id() == id)
    }

    pub(crate) fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.slots.iter_mut().map(|slot| &mut slot.cell)
    }

    /// Whether the child is in the container.
    pub fn contains(&self, id: ChildId) -> bool {
        self.index_of(id).is_some()
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether there are no children.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Children in layout order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.slots.iter().map(Slot::cell)
    }

    /// Children with their alignments, in layout order.
    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    // ── Change tracking ─────────────────────────────────────────────────────

    /// Whether mutations happened since the driver last looked.
    pub fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    pub(crate) fn take_events(&mut self) -> Vec<LayoutEvent, EVENT_QUEUE_DEPTH> {
        core::mem::take(&mut self.pending)
    }

    fn note(&mut self, event: LayoutEvent) {
        if self.pending.contains(&event) {
            return;
        }
        if self.pending.push(event).is_err() {
            // A full re-resolution covers everything that was queued.
            self.pending.clear();
            self.pending.push(LayoutEvent::ChildrenChanged).ok();
        }
    }
}
