//! Seam between the layout engine and whatever renders the boxes.
//!
//! The engine never measures anything itself. [`Measure`] is the read-only
//! half that the [`AxisResolver`](crate::resolver::AxisResolver) consumes,
//! [`LayoutHost`] adds the commands the
//! [`LayoutDriver`](crate::driver::LayoutDriver) issues.
//!
//! # Example
//!
//! ```
//! use wee_layout::prelude::*;
//! use embedded_graphics::prelude::Size;
//!
//! /// Every child renders as a 10x10 square.
//! struct Squares;
//!
//! impl Measure for Squares {
//!     fn extent(&self, _child: ChildId, _axis: Axis) -> u32 {
//!         10
//!     }
//!
//!     fn caption_extent(&self, _child: ChildId, _axis: Axis) -> u32 {
//!         0
//!     }
//!
//!     fn declared_extent(&self, _child: ChildId, _axis: Axis) -> Option<u32> {
//!         None
//!     }
//!
//!     fn container_extent(&self) -> Size {
//!         Size::new(100, 10)
//!     }
//! }
//!
//! let mut container = Container::new(Direction::Row);
//! container.set_width("100px");
//! container.add_child(Cell::new(ChildId(1))).unwrap();
//!
//! let resolution = AxisResolver::new(&container).resolve(&Squares, None);
//! assert_eq!(resolution.used_space, 10);
//! ```

use crate::cell::ChildId;
use crate::driver::LayoutEvent;
use crate::style::Axis;
use embedded_graphics::prelude::Size;

/// Read-only view of rendered geometry.
///
/// Implementations must report the state at call time; the engine re-queries
/// after every change it makes.
pub trait Measure {
    /// Rendered extent of the child's whole slot on `axis`, caption included.
    fn extent(&self, child: ChildId, axis: Axis) -> u32;

    /// Rendered extent of the child's caption on `axis`, or 0 without one.
    fn caption_extent(&self, child: ChildId, axis: Axis) -> u32;

    /// Pixel size currently imposed on the child's content on `axis`, if any.
    ///
    /// The rounding correction adds its delta on top of this value.
    fn declared_extent(&self, child: ChildId, axis: Axis) -> Option<u32>;

    /// Rendered inner size of the container.
    fn container_extent(&self) -> Size;
}

/// Commands the driver issues to apply a layout.
pub trait LayoutHost: Measure {
    /// Impose a pixel size on the child's content.
    ///
    /// If the resize makes the host notice a change it would normally report
    /// back (a descendant with relative size changing), return it here. The
    /// driver posts it like any other event, so it is suppressed while a pass
    /// is running.
    fn set_child_extent(&mut self, child: ChildId, axis: Axis, px: u32) -> Option<LayoutEvent>;

    /// Drop an imposed size so the child takes its natural size again.
    fn clear_child_extent(&mut self, child: ChildId, axis: Axis);

    /// Position the child on the cross axis, relative to the container's start.
    fn set_cross_offset(&mut self, child: ChildId, px: u32);

    /// Toggle clipping of overflowing children.
    fn set_overflow_clipped(&mut self, clipped: bool);

    /// Ask the surrounding framework to lay out the container's ancestors again.
    fn request_ancestor_relayout(&mut self);
}
