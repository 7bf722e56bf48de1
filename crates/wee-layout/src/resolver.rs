//! Pure main-axis resolution.
//!
//! [`AxisResolver`] reads a [`Container`] and a [`Measure`] and produces a
//! [`Resolution`]. It never mutates either; the driver applies the result.
//!
//! # Algorithm
//!
//! 1. Sum what every child claims on the main axis (`used_space`). Relatively
//!    sized children only claim their caption, and only in a column.
//! 2. Collect the relatively sized children in layout order (`relative_set`).
//!    Percentages only count when the container main size is defined or smart
//!    relative sizing is on.
//! 3. Resolve each member to `floor((main - used) * percent)`.
//! 4. When two or more members sum to exactly 100%, the flooring leaves a
//!    remainder. The remainder goes to the last member.

use crate::cell::ChildId;
use crate::config::{FULL_PERCENT, MAX_CHILDREN};
use crate::container::Container;
use crate::host::Measure;
use crate::style::{Axis, Direction, SizeMode};
use embedded_graphics::prelude::Size;
use heapless::Vec;

/// Pixels to add to the last relatively sized child.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Correction {
    /// Last member of the relative set.
    pub child: ChildId,
    /// Missing pixels, always positive.
    pub delta: u32,
}

/// Output of one resolution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Main-axis pixels claimed by children, excluding relative content.
    pub used_space: u32,
    /// Relatively sized children, in layout order.
    pub relative_set: Vec<ChildId, MAX_CHILDREN>,
    /// Resolved main extent of each member whose size could be computed.
    pub relative_extents: Vec<(ChildId, u32), MAX_CHILDREN>,
    /// Sum of the members' percentages, in hundredths.
    pub relative_total: u32,
    /// Main size the percentages resolve against.
    pub container_main_size: Option<u32>,
    /// Container size measured for this pass, when percentages are meaningful.
    pub container_extent: Option<Size>,
    /// Used space or relative membership changed since the previous pass.
    pub remeasure: bool,
    /// Remainder owed to the last member, measured before the pass applied
    /// the resolved extents.
    ///
    /// The copy kept by [`LayoutDriver`](crate::driver::LayoutDriver) has this
    /// cleared; [`AxisResolver::correction`] gives the current value.
    pub correction: Option<Correction>,
}

impl Resolution {
    /// Whether a deferred correction step has to follow this pass.
    ///
    /// Only true for two or more members summing to exactly 100% against a
    /// known main size. Whether any pixels are actually missing is decided
    /// after the resolved sizes rendered.
    pub fn needs_correction(&self) -> bool {
        self.relative_set.len() > 1
            && self.relative_total == FULL_PERCENT
            && self.container_main_size.is_some()
    }

    /// Resolved main extent assigned to a child.
    pub fn extent_of(&self, child: ChildId) -> Option<u32> {
        self.relative_extents
            .iter()
            .find(|(id, _)| *id == child)
            .map(|&(_, px)| px)
    }

    /// Whether the child is in the relative set.
    pub fn is_relative(&self, child: ChildId) -> bool {
        self.relative_set.contains(&child)
    }
}

/// Main-axis resolver over a borrowed container.
pub struct AxisResolver<'a> {
    container: &'a Container,
}

impl<'a> AxisResolver<'a> {
    /// Resolve against `container`.
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    fn direction(&self) -> Direction {
        self.container.direction()
    }

    /// Run one resolution.
    ///
    /// `previous` is the last pass's result; it only affects
    /// [`Resolution::remeasure`].
    pub fn resolve<M: Measure + ?Sized>(&self, measure: &M, previous: Option<&Resolution>) -> Resolution {
        let meaningful = self.container.percent_sizing_meaningful();
        let used_space = self.used_space(measure);

        let mut relative_set = Vec::new();
        let mut relative_total: u32 = 0;
        if meaningful {
            for cell in self.container.cells() {
                if let Some(percent) = cell.relative_main(self.direction()) {
                    // Capacity matches the container's, so this cannot fail.
                    relative_set.push(cell.id()).ok();
                    relative_total = relative_total.saturating_add(percent.hundredths());
                }
            }
        }

        let container_extent = meaningful.then(|| measure.container_extent());
        let container_main_size = container_extent.map(|size| self.main_size(size));

        let mut relative_extents = Vec::new();
        if let Some(main) = container_main_size {
            let free = main.saturating_sub(used_space);
            for cell in self.container.cells() {
                if let Some(percent) = cell.relative_main(self.direction()) {
                    let px = percent.of(free);
                    tracing::trace!(child = cell.id().0, px, "resolved relative extent");
                    relative_extents.push((cell.id(), px)).ok();
                }
            }
        }

        let remeasure = previous.map_or(true, |last| {
            last.used_space != used_space || last.relative_set != relative_set
        });

        let mut resolution = Resolution {
            used_space,
            relative_set,
            relative_extents,
            relative_total,
            container_main_size,
            container_extent,
            remeasure,
            correction: None,
        };
        resolution.correction = self.correction_for(&resolution, measure);

        tracing::debug!(
            used_space,
            relative = resolution.relative_set.len(),
            remeasure,
            "main axis resolved"
        );
        resolution
    }

    /// Recompute the correction from fresh measurements.
    ///
    /// Used by the deferred step once the resolved sizes have rendered.
    pub fn correction<M: Measure + ?Sized>(&self, measure: &M) -> Option<Correction> {
        self.resolve(measure, None).correction
    }

    /// Space offered to `child`, or `None` if it is not in the container.
    ///
    /// A row offers `(width - used, height)`, a column `(width, height - used)`.
    /// In a row the caption of a captioned child is taken off the height.
    pub fn allocated_space<M: Measure + ?Sized>(
        &self,
        used_space: u32,
        child: ChildId,
        measure: &M,
    ) -> Option<Size> {
        let cell = self.container.cell(child)?;
        let outer = measure.container_extent();
        let size = match self.direction() {
            Direction::Row => Size::new(
                outer.width.saturating_sub(used_space),
                outer
                    .height
                    .saturating_sub(cell.caption_cross_extent(Direction::Row, measure)),
            ),
            Direction::Column => Size::new(outer.width, outer.height.saturating_sub(used_space)),
        };
        Some(size)
    }

    fn used_space<M: Measure + ?Sized>(&self, measure: &M) -> u32 {
        self.container.cells().fold(0u32, |used, cell| {
            let claimed = cell.required_main_extent(self.direction(), measure);
            tracing::trace!(child = cell.id().0, claimed, "main axis claim");
            used.saturating_add(claimed)
        })
    }

    /// Declared pixel size wins over the measured one.
    fn main_size(&self, measured: Size) -> u32 {
        let axis = self.direction().main_axis();
        let declared = match axis {
            Axis::Horizontal => self.container.declared_width(),
            Axis::Vertical => self.container.declared_height(),
        };
        match declared {
            SizeMode::Absolute(px) => px,
            _ => axis.of(measured),
        }
    }

    fn correction_for<M: Measure + ?Sized>(
        &self,
        resolution: &Resolution,
        measure: &M,
    ) -> Option<Correction> {
        if !resolution.needs_correction() {
            return None;
        }
        let main = resolution.container_main_size?;
        let last = *resolution.relative_set.last()?;

        let rendered = resolution.relative_set.iter().fold(0u32, |sum, &id| {
            let content = self.container.cell(id).map_or(0, |cell| {
                let slot = cell.main_extent(self.direction(), measure);
                // The caption part is already in used_space.
                slot.saturating_sub(cell.required_main_extent(self.direction(), measure))
            });
            sum.saturating_add(content)
        });

        let delta = main
            .checked_sub(resolution.used_space)?
            .checked_sub(rendered)
            .filter(|&delta| delta > 0)?;
        tracing::debug!(child = last.0, delta, "rounding correction");
        Some(Correction { child: last, delta })
    }
}
