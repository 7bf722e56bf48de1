//! Mock host for testing
//!
//! [`MockHost`] renders children from fixed natural sizes, records every
//! command the driver issues and can simulate rounding loss and re-entrant
//! feedback.

#![cfg(any(test, feature = "std"))]

use crate::cell::ChildId;
use crate::config::MAX_CHILDREN;
use crate::driver::LayoutEvent;
use crate::host::{LayoutHost, Measure};
use crate::style::{Axis, Direction};
use embedded_graphics::prelude::Size;
use heapless::Vec;

/// A command received by [`MockHost`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HostCommand {
    /// `set_child_extent`
    SetExtent {
        /// Target child.
        child: ChildId,
        /// Axis the size applies to.
        axis: Axis,
        /// Requested pixels.
        px: u32,
    },
    /// `clear_child_extent`
    ClearExtent {
        /// Target child.
        child: ChildId,
        /// Axis that was reset.
        axis: Axis,
    },
    /// `set_cross_offset`
    CrossOffset {
        /// Target child.
        child: ChildId,
        /// Offset from the cross-axis start.
        px: u32,
    },
    /// `set_overflow_clipped`
    Clip(bool),
    /// `request_ancestor_relayout`
    AncestorRelayout,
}

#[derive(Debug, Clone)]
struct MockChild {
    id: ChildId,
    natural: Size,
    caption: Size,
    imposed_width: Option<u32>,
    imposed_height: Option<u32>,
    cross_offset: Option<u32>,
}

impl MockChild {
    fn imposed(&self, axis: Axis) -> Option<u32> {
        match axis {
            Axis::Horizontal => self.imposed_width,
            Axis::Vertical => self.imposed_height,
        }
    }

    fn imposed_mut(&mut self, axis: Axis) -> &mut Option<u32> {
        match axis {
            Axis::Horizontal => &mut self.imposed_width,
            Axis::Vertical => &mut self.imposed_height,
        }
    }
}

/// Mock layout host
pub struct MockHost {
    container: Size,
    follow: Option<Direction>,
    children: Vec<MockChild, MAX_CHILDREN>,
    shrink_on_set: u32,
    feedback: Option<LayoutEvent>,
    commands: Vec<HostCommand, 256>,
    clipped: bool,
    relayout_requests: usize,
}

impl MockHost {
    /// Create a host whose container renders at `container`.
    pub fn new(container: Size) -> Self {
        Self {
            container,
            follow: None,
            children: Vec::new(),
            shrink_on_set: 0,
            feedback: None,
            commands: Vec::new(),
            clipped: false,
            relayout_requests: 0,
        }
    }

    /// Add a child that renders at `natural` until a size is imposed.
    #[must_use]
    pub fn with_child(mut self, id: ChildId, natural: Size) -> Self {
        let _ = self.children.push(MockChild {
            id,
            natural,
            caption: Size::zero(),
            imposed_width: None,
            imposed_height: None,
            cross_offset: None,
        });
        self
    }

    /// Give a child a caption. The caption sits above the content.
    #[must_use]
    pub fn with_caption(mut self, id: ChildId, caption: Size) -> Self {
        if let Some(child) = self.child_mut(id) {
            child.caption = caption;
        }
        self
    }

    /// Render imposed sizes `px` pixels smaller, like a box whose borders
    /// eat into the requested size.
    #[must_use]
    pub fn with_shrink_on_set(mut self, px: u32) -> Self {
        self.shrink_on_set = px;
        self
    }

    /// Report `event` back from every `set_child_extent`.
    #[must_use]
    pub fn with_feedback(mut self, event: LayoutEvent) -> Self {
        self.feedback = Some(event);
        self
    }

    /// Derive the container size from the children laid out in `direction`,
    /// like a container without a declared size.
    #[must_use]
    pub fn following_children(mut self, direction: Direction) -> Self {
        self.follow = Some(direction);
        self
    }

    /// Resize the rendered container.
    pub fn set_container(&mut self, size: Size) {
        self.container = size;
    }

    /// Change a child's natural size.
    pub fn set_natural(&mut self, id: ChildId, natural: Size) {
        if let Some(child) = self.child_mut(id) {
            child.natural = natural;
        }
    }

    /// Commands received so far, oldest first.
    pub fn commands(&self) -> &[HostCommand] {
        &self.commands
    }

    /// Forget recorded commands.
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Pixels most recently requested for `child` on `axis`.
    pub fn last_set_extent(&self, id: ChildId, axis: Axis) -> Option<u32> {
        self.commands.iter().rev().find_map(|command| match *command {
            HostCommand::SetExtent { child, axis: a, px } if child == id && a == axis => Some(px),
            _ => None,
        })
    }

    /// Whether overflow is currently clipped.
    pub fn is_clipped(&self) -> bool {
        self.clipped
    }

    /// Number of ancestor relayout requests.
    pub fn relayout_requests(&self) -> usize {
        self.relayout_requests
    }

    /// Cross offset last applied to a child.
    pub fn cross_offset(&self, id: ChildId) -> Option<u32> {
        self.child(id).and_then(|child| child.cross_offset)
    }

    fn child(&self, id: ChildId) -> Option<&MockChild> {
        self.children.iter().find(|child| child.id == id)
    }

    fn child_mut(&mut self, id: ChildId) -> Option<&mut MockChild> {
        self.children.iter_mut().find(|child| child.id == id)
    }

    fn record(&mut self, command: HostCommand) {
        let _ = self.commands.push(command);
    }

    fn content(&self, child: &MockChild, axis: Axis) -> u32 {
        child
            .imposed(axis)
            .map_or(axis.of(child.natural), |px| px.saturating_sub(self.shrink_on_set))
    }
}

impl Measure for MockHost {
    fn extent(&self, id: ChildId, axis: Axis) -> u32 {
        let Some(child) = self.child(id) else {
            return 0;
        };
        let content = self.content(child, axis);
        match axis {
            Axis::Horizontal => content.max(child.caption.width),
            Axis::Vertical => content.saturating_add(child.caption.height),
        }
    }

    fn caption_extent(&self, id: ChildId, axis: Axis) -> u32 {
        self.child(id).map_or(0, |child| axis.of(child.caption))
    }

    fn declared_extent(&self, id: ChildId, axis: Axis) -> Option<u32> {
        self.child(id).and_then(|child| child.imposed(axis))
    }

    fn container_extent(&self) -> Size {
        let Some(direction) = self.follow else {
            return self.container;
        };
        let main_axis = direction.main_axis();
        let cross_axis = direction.cross_axis();
        let main = self
            .children
            .iter()
            .fold(0u32, |sum, child| sum.saturating_add(self.extent(child.id, main_axis)));
        let cross = self
            .children
            .iter()
            .map(|child| self.extent(child.id, cross_axis))
            .max()
            .unwrap_or(0);
        match direction {
            Direction::Row => Size::new(main, cross),
            Direction::Column => Size::new(cross, main),
        }
    }
}

impl LayoutHost for MockHost {
    fn set_child_extent(&mut self, id: ChildId, axis: Axis, px: u32) -> Option<LayoutEvent> {
        self.record(HostCommand::SetExtent { child: id, axis, px });
        if let Some(child) = self.child_mut(id) {
            *child.imposed_mut(axis) = Some(px);
        }
        self.feedback
    }

    fn clear_child_extent(&mut self, id: ChildId, axis: Axis) {
        self.record(HostCommand::ClearExtent { child: id, axis });
        if let Some(child) = self.child_mut(id) {
            *child.imposed_mut(axis) = None;
        }
    }

    fn set_cross_offset(&mut self, id: ChildId, px: u32) {
        self.record(HostCommand::CrossOffset { child: id, px });
        if let Some(child) = self.child_mut(id) {
            child.cross_offset = Some(px);
        }
    }

    fn set_overflow_clipped(&mut self, clipped: bool) {
        self.record(HostCommand::Clip(clipped));
        self.clipped = clipped;
    }

    fn request_ancestor_relayout(&mut self) {
        self.record(HostCommand::AncestorRelayout);
        self.relayout_requests = self.relayout_requests.saturating_add(1);
    }
}
