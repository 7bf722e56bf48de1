//! Property-based tests for main-axis resolution.
//! Verifies invariants hold for ALL child sets, not just fixed examples.

#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects, clippy::indexing_slicing)]

use embedded_graphics::prelude::Size;
use proptest::prelude::*;
use wee_layout::prelude::*;

/// Rendered widths by child index; every child is 10px tall.
struct Widths {
    container: Size,
    widths: Vec<u32>,
}

impl Measure for Widths {
    fn extent(&self, child: ChildId, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.widths.get(child.0 as usize).copied().unwrap_or(0),
            Axis::Vertical => 10,
        }
    }

    fn caption_extent(&self, _child: ChildId, _axis: Axis) -> u32 {
        0
    }

    fn declared_extent(&self, _child: ChildId, _axis: Axis) -> Option<u32> {
        None
    }

    fn container_extent(&self) -> Size {
        self.container
    }
}

/// `(percent in hundredths or None for fixed, rendered width)`
fn children() -> impl Strategy<Value = Vec<(Option<u32>, u32)>> {
    proptest::collection::vec(
        (proptest::option::of(0u32..=10_000), 0u32..=500),
        0..=12,
    )
}

/// Two or more percentages summing to exactly 100%.
fn full_split() -> impl Strategy<Value = Vec<u32>> {
    proptest::collection::vec(0u32..=10_000, 1..=5).prop_map(|mut cuts| {
        cuts.sort_unstable();
        let mut last = 0;
        let mut split = Vec::with_capacity(cuts.len() + 1);
        for cut in cuts {
            split.push(cut - last);
            last = cut;
        }
        split.push(10_000 - last);
        split
    })
}

fn row(width: u32, children: &[(Option<u32>, u32)]) -> (Container, Widths) {
    let mut container = Container::new(Direction::Row);
    container.set_width(&format!("{width}px"));
    let mut widths = Vec::new();
    for (index, &(percent, rendered)) in children.iter().enumerate() {
        let mode = percent.map_or(SizeMode::Undefined, |h| SizeMode::Percent(Percent::from_hundredths(h)));
        container
            .add_child(Cell::with_size(ChildId(index as u32), mode, SizeMode::Undefined))
            .unwrap();
        widths.push(rendered);
    }
    let measure = Widths {
        container: Size::new(width, 40),
        widths,
    };
    (container, measure)
}

proptest! {
    /// Resolving an unchanged snapshot twice gives the same answer.
    #[test]
    fn resolve_is_idempotent(width in 0u32..=2000, kids in children()) {
        let (container, measure) = row(width, &kids);
        let resolver = AxisResolver::new(&container);
        let first = resolver.resolve(&measure, None);
        let second = resolver.resolve(&measure, Some(&first));

        prop_assert_eq!(first.used_space, second.used_space);
        prop_assert_eq!(&first.relative_set, &second.relative_set);
        prop_assert_eq!(&first.relative_extents, &second.relative_extents);
        prop_assert_eq!(first.correction, second.correction);
        prop_assert!(!second.remeasure);
    }

    /// The relative set lists exactly the percentage children, in child order.
    #[test]
    fn relative_set_preserves_order(width in 0u32..=2000, kids in children()) {
        let (container, measure) = row(width, &kids);
        let resolution = AxisResolver::new(&container).resolve(&measure, None);

        let expected: Vec<ChildId> = kids
            .iter()
            .enumerate()
            .filter(|(_, (percent, _))| percent.is_some())
            .map(|(index, _)| ChildId(index as u32))
            .collect();
        prop_assert_eq!(resolution.relative_set.as_slice(), expected.as_slice());
    }

    /// Only fixed children take space away from relative ones.
    #[test]
    fn used_space_sums_fixed_children(width in 0u32..=2000, kids in children()) {
        let (container, measure) = row(width, &kids);
        let resolution = AxisResolver::new(&container).resolve(&measure, None);

        let fixed: u32 = kids
            .iter()
            .filter(|(percent, _)| percent.is_none())
            .map(|(_, rendered)| rendered)
            .sum();
        prop_assert_eq!(resolution.used_space, fixed);

        let free = width.saturating_sub(fixed);
        for &(child, px) in &resolution.relative_extents {
            let percent = kids[child.0 as usize].0.unwrap();
            prop_assert_eq!(px, (u64::from(free) * u64::from(percent) / 10_000) as u32);
        }
    }

    /// Percentages summing to exactly 100% give the remainder to the last child.
    #[test]
    fn full_split_corrects_last(
        width in 0u32..=2000,
        split in full_split(),
        rendered in proptest::collection::vec(0u32..=400, 6),
    ) {
        let kids: Vec<(Option<u32>, u32)> = split
            .iter()
            .zip(&rendered)
            .map(|(&percent, &px)| (Some(percent), px))
            .collect();
        let (container, measure) = row(width, &kids);
        let resolution = AxisResolver::new(&container).resolve(&measure, None);

        let sum: u32 = kids.iter().map(|(_, px)| px).sum();
        let expected = width.checked_sub(sum).filter(|&delta| delta > 0);
        prop_assert!(resolution.needs_correction());
        prop_assert_eq!(resolution.correction.map(|c| c.delta), expected);
        if let Some(correction) = resolution.correction {
            prop_assert_eq!(correction.child, ChildId(kids.len() as u32 - 1));
        }
    }

    /// Anything but exactly 100% never corrects.
    #[test]
    fn partial_split_never_corrects(
        width in 0u32..=2000,
        percents in proptest::collection::vec(0u32..=4_999, 0..=2),
    ) {
        let kids: Vec<(Option<u32>, u32)> = percents.iter().map(|&p| (Some(p), 0)).collect();
        let (container, measure) = row(width, &kids);
        let resolution = AxisResolver::new(&container).resolve(&measure, None);
        prop_assert!(!resolution.needs_correction());
        prop_assert_eq!(resolution.correction, None);
    }
}
