//! A single child slot.
//!
//! A [`Cell`] is pure data: declared size modes, caption flag and the
//! bookkeeping the driver needs between passes. Geometry always comes from
//! the [`Measure`] implementation.

use core::fmt;

use crate::host::Measure;
use crate::style::{Axis, Direction, Percent, SizeMode};

/// Identity of a child, assigned by the host.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChildId(pub u32);

impl fmt::Display for ChildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "child #{}", self.0)
    }
}

/// One child box and its declared sizing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Cell {
    id: ChildId,
    width: SizeMode,
    height: SizeMode,
    has_caption: bool,
    /// Cross extent was imposed by a smart pass and must be reset before the next one.
    forced_cross: bool,
}

impl Cell {
    /// Create a cell with undefined size on both axes.
    pub fn new(id: ChildId) -> Self {
        Self::with_size(id, SizeMode::Undefined, SizeMode::Undefined)
    }

    /// Create a cell with declared width and height.
    pub fn with_size(id: ChildId, width: SizeMode, height: SizeMode) -> Self {
        Self {
            id,
            width,
            height,
            has_caption: false,
            forced_cross: false,
        }
    }

    /// Builder-style caption flag.
    #[must_use]
    pub fn caption(mut self, has_caption: bool) -> Self {
        self.has_caption = has_caption;
        self
    }

    /// The child this cell holds.
    pub fn id(&self) -> ChildId {
        self.id
    }

    /// Declared width.
    pub fn width(&self) -> SizeMode {
        self.width
    }

    /// Declared height.
    pub fn height(&self) -> SizeMode {
        self.height
    }

    /// Whether a caption precedes the content.
    pub fn has_caption(&self) -> bool {
        self.has_caption
    }

    /// Declared size on a physical axis.
    pub fn size_mode(&self, axis: Axis) -> SizeMode {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Declared size along the container's main axis.
    pub fn main_mode(&self, direction: Direction) -> SizeMode {
        self.size_mode(direction.main_axis())
    }

    /// Declared size along the container's cross axis.
    pub fn cross_mode(&self, direction: Direction) -> SizeMode {
        self.size_mode(direction.cross_axis())
    }

    /// Percentage on the main axis, if the cell is relatively sized there.
    pub fn relative_main(&self, direction: Direction) -> Option<Percent> {
        self.main_mode(direction).percent()
    }

    /// Whether the cell is relatively sized on the cross axis.
    pub fn has_relative_cross(&self, direction: Direction) -> bool {
        self.cross_mode(direction).is_percent()
    }

    /// Main-axis space this cell takes away from relatively sized siblings.
    ///
    /// A relatively sized cell only claims its caption, and only in a column:
    /// in a row the caption sits above the content and belongs to the cross
    /// axis. This holds even when the container cannot resolve percentages.
    /// Every other cell claims its whole rendered extent.
    pub fn required_main_extent<M: Measure + ?Sized>(&self, direction: Direction, measure: &M) -> u32 {
        if self.main_mode(direction).is_percent() {
            return match direction {
                Direction::Column if self.has_caption => {
                    measure.caption_extent(self.id, Axis::Vertical)
                }
                _ => 0,
            };
        }
        self.main_extent(direction, measure)
    }

    /// Rendered size of the whole slot along the main axis.
    pub fn main_extent<M: Measure + ?Sized>(&self, direction: Direction, measure: &M) -> u32 {
        measure.extent(self.id, direction.main_axis())
    }

    /// Caption height to subtract from the cross space offered to the child.
    ///
    /// Only rows stack a caption on the cross axis.
    pub fn caption_cross_extent<M: Measure + ?Sized>(&self, direction: Direction, measure: &M) -> u32 {
        if self.has_caption && direction.is_row() {
            measure.caption_extent(self.id, Axis::Vertical)
        } else {
            0
        }
    }

    pub(crate) fn resync(&mut self, width: SizeMode, height: SizeMode) -> bool {
        let changed = self.width != width || self.height != height;
        self.width = width;
        self.height = height;
        changed
    }

    pub(crate) fn set_caption(&mut self, has_caption: bool) -> bool {
        let changed = self.has_caption != has_caption;
        self.has_caption = has_caption;
        changed
    }

    pub(crate) fn forced_cross(&self) -> bool {
        self.forced_cross
    }

    pub(crate) fn set_forced_cross(&mut self, forced: bool) {
        self.forced_cross = forced;
    }
}
