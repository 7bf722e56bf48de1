//! Event-driven layout passes.
//!
//! The [`LayoutDriver`] owns the pass lifecycle:
//!
//! ```text
//!            post/process                 needs correction
//!   Idle ───────────────────▶ Resolving ─────────────────────▶ PendingCorrection
//!    ▲                           │                                │      │
//!    └───────────────────────────┘ done                           │      │ new event
//!    ▲                                                 settle     │      ▼
//!    └────────────────────────────────────────────────────────────┘   (discarded)
//! ```
//!
//! Triggers that arrive while a pass runs, typically feedback returned by
//! [`LayoutHost::set_child_extent`], are suppressed instead of starting a
//! nested pass. A new trigger while a correction is pending makes that
//! correction stale; it is dropped and the next pass decides again.

use crate::cell::ChildId;
use crate::config::EVENT_QUEUE_DEPTH;
use crate::container::Container;
use crate::host::{LayoutHost, Measure};
use crate::resolver::{AxisResolver, Resolution};
use embedded_graphics::prelude::Size;
use heapless::Deque;

/// Something that requires a new pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayoutEvent {
    /// Children were added, removed, reordered, realigned or flags changed.
    ChildrenChanged,
    /// A child's declared size or caption changed.
    ChildSizeChanged(ChildId),
    /// The container's own declared or rendered size changed.
    ContainerResized,
    /// A relatively sized descendant of a child changed size.
    DescendantRelativeSizeChanged(ChildId),
}

/// Driver lifecycle state.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverState {
    /// Nothing to do.
    #[default]
    Idle,
    /// A pass is running.
    Resolving,
    /// A pass finished and the rounding correction waits for [`LayoutDriver::settle`].
    PendingCorrection {
        /// Pass that scheduled the correction.
        generation: u32,
    },
}

/// Result of [`LayoutDriver::process`] or [`LayoutDriver::settle`].
#[must_use]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// The layout is final.
    Stabilized,
    /// The layout is final here, but ancestors were asked to lay out again.
    AncestorRelayout,
    /// Call [`LayoutDriver::settle`] once the host has rendered the new sizes.
    CorrectionPending,
}

/// Runs layout passes for one container.
#[derive(Debug)]
pub struct LayoutDriver {
    state: DriverState,
    queue: Deque<LayoutEvent, EVENT_QUEUE_DEPTH>,
    last: Option<Resolution>,
    pass_count: u32,
    suppressed: u32,
    generation: u32,
}

impl Default for LayoutDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutDriver {
    /// Create an idle driver.
    pub fn new() -> Self {
        Self {
            state: DriverState::Idle,
            queue: Deque::new(),
            last: None,
            pass_count: 0,
            suppressed: 0,
            generation: 0,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Number of passes run so far.
    pub fn pass_count(&self) -> u32 {
        self.pass_count
    }

    /// Number of triggers dropped because a pass was already running.
    pub fn suppressed_count(&self) -> u32 {
        self.suppressed
    }

    /// Result of the most recent pass.
    pub fn last_resolution(&self) -> Option<&Resolution> {
        self.last.as_ref()
    }

    /// Events waiting for [`process`](Self::process).
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Space the last pass offered to `child`.
    pub fn allocated_space<M: Measure + ?Sized>(
        &self,
        container: &Container,
        measure: &M,
        child: ChildId,
    ) -> Option<Size> {
        let used = self.last.as_ref().map_or(0, |last| last.used_space);
        AxisResolver::new(container).allocated_space(used, child, measure)
    }

    /// Queue a trigger.
    pub fn post(&mut self, event: LayoutEvent) {
        match self.state {
            DriverState::Resolving => {
                self.suppressed = self.suppressed.saturating_add(1);
                tracing::debug!(?event, "re-entrant layout trigger suppressed");
                return;
            }
            DriverState::PendingCorrection { generation } => {
                tracing::debug!(generation, ?event, "pending correction is stale");
                self.state = DriverState::Idle;
            }
            DriverState::Idle => {}
        }

        if self.queue.iter().any(|queued| *queued == event) {
            return;
        }
        if self.queue.push_back(event).is_err() {
            tracing::warn!("layout queue full, collapsing into a full relayout");
            self.queue.clear();
            // Empty after clear, cannot fail.
            self.queue.push_back(LayoutEvent::ChildrenChanged).ok();
        }
    }

    /// Run one pass per queued event, including the container's own changes.
    pub fn process<H: LayoutHost + ?Sized>(&mut self, container: &mut Container, host: &mut H) -> Outcome {
        for event in container.take_events() {
            self.post(event);
        }

        let mut relayout = false;
        while let Some(event) = self.queue.pop_front() {
            relayout |= self.pass(event, container, host);
        }

        if matches!(self.state, DriverState::PendingCorrection { .. }) {
            Outcome::CorrectionPending
        } else if relayout {
            Outcome::AncestorRelayout
        } else {
            Outcome::Stabilized
        }
    }

    /// Apply the deferred rounding correction.
    ///
    /// Does nothing unless a correction is pending. If the container changed
    /// since the pass, the correction is dropped; the next
    /// [`process`](Self::process) decides again.
    pub fn settle<H: LayoutHost + ?Sized>(&mut self, container: &Container, host: &mut H) -> Outcome {
        let DriverState::PendingCorrection { generation } = self.state else {
            return Outcome::Stabilized;
        };
        if container.has_pending_changes() {
            tracing::debug!(generation, "container changed, dropping correction");
            self.finish(container, host);
            return Outcome::Stabilized;
        }
        self.state = DriverState::Resolving;

        let direction = container.direction();
        if let Some(correction) = AxisResolver::new(container).correction(&*host) {
            let axis = direction.main_axis();
            let base = host.declared_extent(correction.child, axis).unwrap_or_else(|| {
                container.cell(correction.child).map_or(0, |cell| {
                    cell.main_extent(direction, &*host)
                        .saturating_sub(cell.required_main_extent(direction, &*host))
                })
            });
            let px = base.saturating_add(correction.delta);
            tracing::debug!(generation, child = correction.child.0, px, "applying rounding correction");
            if let Some(feedback) = host.set_child_extent(correction.child, axis, px) {
                self.post(feedback);
            }
        }

        self.finish(container, host);
        Outcome::Stabilized
    }

    /// One pass. Returns whether ancestors were asked to lay out again.
    fn pass<H: LayoutHost + ?Sized>(
        &mut self,
        event: LayoutEvent,
        container: &mut Container,
        host: &mut H,
    ) -> bool {
        self.state = DriverState::Resolving;
        self.generation = self.generation.wrapping_add(1);
        self.pass_count = self.pass_count.saturating_add(1);
        tracing::debug!(generation = self.generation, ?event, "layout pass");

        host.set_overflow_clipped(true);

        let direction = container.direction();
        let main_axis = direction.main_axis();
        let cross_axis = direction.cross_axis();
        let smart = container.smart_relative();

        if smart {
            for cell in container.cells_mut() {
                if cell.forced_cross() {
                    host.clear_child_extent(cell.id(), cross_axis);
                    cell.set_forced_cross(false);
                }
            }
        }

        let mut resolution = AxisResolver::new(container).resolve(&*host, self.last.as_ref());

        for &(child, px) in &resolution.relative_extents {
            if let Some(feedback) = host.set_child_extent(child, main_axis, px) {
                self.post(feedback);
            }
        }

        if container.cross_percent_meaningful() {
            let cross = cross_axis.of(host.container_extent());
            for cell in container.cells_mut() {
                let Some(percent) = cell.cross_mode(direction).percent() else {
                    continue;
                };
                let available = cross.saturating_sub(cell.caption_cross_extent(direction, &*host));
                if let Some(feedback) = host.set_child_extent(cell.id(), cross_axis, percent.of(available)) {
                    self.post(feedback);
                }
                if smart {
                    cell.set_forced_cross(true);
                }
            }
        }

        let cross = cross_axis.of(host.container_extent());
        for slot in container.slots() {
            let id = slot.cell().id();
            let offset = slot
                .alignment()
                .cross(direction)
                .offset(cross, host.extent(id, cross_axis));
            host.set_cross_offset(id, offset);
        }

        let measured = host.container_extent();
        let mut relayout = container.resolved_size().is_some_and(|old| old != measured);
        container.set_resolved_size(measured);
        if container.is_main_undefined()
            && !smart
            && matches!(event, LayoutEvent::DescendantRelativeSizeChanged(_))
        {
            relayout = true;
        }
        if relayout {
            tracing::debug!("container size changed, requesting ancestor relayout");
            host.request_ancestor_relayout();
        }

        let pending = resolution.needs_correction();
        // Sizes were applied since it was measured.
        resolution.correction = None;
        self.last = Some(resolution);
        if pending {
            self.state = DriverState::PendingCorrection {
                generation: self.generation,
            };
        } else {
            self.finish(container, host);
        }
        relayout
    }

    fn finish<H: LayoutHost + ?Sized>(&mut self, container: &Container, host: &mut H) {
        if !container.clip() {
            host.set_overflow_clipped(false);
        }
        self.state = DriverState::Idle;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use crate::mocks::{HostCommand, MockHost};
    use crate::style::{Alignment, Axis, Direction, Percent, SizeMode};

    fn wide(id: u32, percent: u32) -> Cell {
        Cell::with_size(ChildId(id), SizeMode::Percent(Percent::new(percent)), SizeMode::Undefined)
    }

    #[test]
    fn test_post_deduplicates() {
        let mut driver = LayoutDriver::new();
        driver.post(LayoutEvent::ChildrenChanged);
        driver.post(LayoutEvent::ChildrenChanged);
        driver.post(LayoutEvent::ContainerResized);
        assert_eq!(driver.pending_events(), 2);
    }

    #[test]
    fn test_full_queue_collapses() {
        let mut driver = LayoutDriver::new();
        for id in 0..(EVENT_QUEUE_DEPTH as u32 + 1) {
            driver.post(LayoutEvent::ChildSizeChanged(ChildId(id)));
        }
        assert_eq!(driver.pending_events(), 1);
    }

    #[test]
    fn test_empty_process_is_stable() {
        let mut driver = LayoutDriver::new();
        let mut container = Container::new(Direction::Row);
        let mut host = MockHost::new(Size::new(100, 20));
        assert_eq!(driver.process(&mut container, &mut host), Outcome::Stabilized);
        assert_eq!(driver.pass_count(), 0);
    }

    #[test]
    fn test_pass_forces_then_restores_clipping() {
        let mut driver = LayoutDriver::new();
        let mut container = Container::new(Direction::Row);
        container.set_width("100px");
        container.add_child(Cell::new(ChildId(1))).unwrap();
        let mut host = MockHost::new(Size::new(100, 20)).with_child(ChildId(1), Size::new(30, 10));

        assert_eq!(driver.process(&mut container, &mut host), Outcome::Stabilized);
        assert_eq!(driver.state(), DriverState::Idle);
        assert_eq!(host.commands().first(), Some(&HostCommand::Clip(true)));
        assert_eq!(host.commands().last(), Some(&HostCommand::Clip(false)));
        assert!(!host.is_clipped());
    }

    #[test]
    fn test_clip_flag_keeps_clipping() {
        let mut driver = LayoutDriver::new();
        let mut container = Container::new(Direction::Row);
        container.set_clipping(true);
        let mut host = MockHost::new(Size::new(100, 20));

        let _ = driver.process(&mut container, &mut host);
        assert!(host.is_clipped());
    }

    #[test]
    fn test_new_event_discards_pending_correction() {
        let mut driver = LayoutDriver::new();
        let mut container = Container::new(Direction::Row);
        container.set_width("100px");
        container.add_child(wide(1, 50)).unwrap();
        container.add_child(wide(2, 50)).unwrap();
        let mut host = MockHost::new(Size::new(100, 20))
            .with_child(ChildId(1), Size::new(10, 10))
            .with_child(ChildId(2), Size::new(10, 10));

        assert_eq!(driver.process(&mut container, &mut host), Outcome::CorrectionPending);
        driver.post(LayoutEvent::ContainerResized);
        assert_eq!(driver.state(), DriverState::Idle);
        assert_eq!(driver.settle(&container, &mut host), Outcome::Stabilized);
        assert_eq!(driver.pending_events(), 1);
    }

    #[test]
    fn test_cross_alignment_offsets() {
        let mut driver = LayoutDriver::new();
        let mut container = Container::new(Direction::Row);
        container.set_width("100px");
        container.add_child(Cell::new(ChildId(1))).unwrap();
        container
            .add_child_aligned(Cell::new(ChildId(2)), Alignment::MIDDLE_CENTER)
            .unwrap();
        container
            .add_child_aligned(Cell::new(ChildId(3)), Alignment::BOTTOM_LEFT)
            .unwrap();
        let mut host = MockHost::new(Size::new(100, 40))
            .with_child(ChildId(1), Size::new(10, 10))
            .with_child(ChildId(2), Size::new(10, 10))
            .with_child(ChildId(3), Size::new(10, 10));

        let _ = driver.process(&mut container, &mut host);
        assert_eq!(host.cross_offset(ChildId(1)), Some(0));
        assert_eq!(host.cross_offset(ChildId(2)), Some(15));
        assert_eq!(host.cross_offset(ChildId(3)), Some(30));
    }

    #[test]
    fn test_cross_percent_applied_and_reset_in_smart_mode() {
        let mut driver = LayoutDriver::new();
        let mut container = Container::new(Direction::Row);
        container.set_smart_relative_sizes(true);
        let tall = Cell::with_size(ChildId(1), SizeMode::Undefined, SizeMode::Percent(Percent::new(50)));
        container.add_child(tall).unwrap();
        let mut host = MockHost::new(Size::new(100, 40)).with_child(ChildId(1), Size::new(10, 10));

        let _ = driver.process(&mut container, &mut host);
        assert_eq!(host.declared_extent(ChildId(1), Axis::Vertical), Some(20));

        container.set_clipping(false);
        let _ = driver.process(&mut container, &mut host);
        assert!(host
            .commands()
            .contains(&HostCommand::ClearExtent { child: ChildId(1), axis: Axis::Vertical }));
        assert_eq!(host.declared_extent(ChildId(1), Axis::Vertical), Some(20));
    }
}
