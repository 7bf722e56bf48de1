//! Declarative sizing and alignment primitives.
//!
//! # Core Types
//!
//! - [`Direction`] - Which way children flow (row or column)
//! - [`Axis`] - A physical axis, used to address one extent of a box
//! - [`Percent`] - A percentage stored in hundredths so sums compare exactly
//! - [`SizeMode`] - Declared size of a box on one axis
//! - [`Alignment`] - Horizontal and vertical placement of a child in its slot
//! - [`CrossAlign`] - The cross-axis part of an alignment for a given direction
//!
//! # Example
//!
//! ```
//! use wee_layout::style::{Direction, Percent, SizeMode};
//!
//! let width = SizeMode::parse_lossy("40%");
//! assert_eq!(width, SizeMode::Percent(Percent::new(40)));
//! assert_eq!(SizeMode::parse_lossy("120px"), SizeMode::Absolute(120));
//! assert_eq!(SizeMode::parse_lossy("3em"), SizeMode::Undefined);
//!
//! assert!(Direction::Row.is_row());
//! ```

use crate::config::{FULL_PERCENT, HUNDREDTHS_PER_PERCENT};
use crate::error::LayoutError;
use embedded_graphics::prelude::Size;

/// Direction in which children are laid out.
///
/// Fixed when a container is created.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Children flow left to right; the main axis is horizontal.
    Row,

    /// Children flow top to bottom; the main axis is vertical.
    #[default]
    Column,
}

impl Direction {
    /// Returns `true` for [`Direction::Row`].
    pub fn is_row(self) -> bool {
        matches!(self, Direction::Row)
    }

    /// The axis children are laid out along.
    pub fn main_axis(self) -> Axis {
        match self {
            Direction::Row => Axis::Horizontal,
            Direction::Column => Axis::Vertical,
        }
    }

    /// The axis governed by per-child alignment only.
    pub fn cross_axis(self) -> Axis {
        self.main_axis().other()
    }
}

/// A physical axis.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// Width.
    Horizontal,
    /// Height.
    Vertical,
}

impl Axis {
    /// The perpendicular axis.
    pub fn other(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// Picks this axis' component out of a size.
    ///
    /// ```
    /// use wee_layout::style::Axis;
    /// use embedded_graphics::prelude::Size;
    ///
    /// assert_eq!(Axis::Horizontal.of(Size::new(300, 40)), 300);
    /// assert_eq!(Axis::Vertical.of(Size::new(300, 40)), 40);
    /// ```
    pub fn of(self, size: Size) -> u32 {
        match self {
            Axis::Horizontal => size.width,
            Axis::Vertical => size.height,
        }
    }
}

/// A percentage with two decimal places of precision.
///
/// Stored as hundredths of a percent: `Percent::new(40)` is `4000`.
/// Sums of percentages compare exactly, which the rounding correction
/// depends on.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct Percent(u32);

impl Percent {
    /// 100%.
    pub const FULL: Percent = Percent(FULL_PERCENT);

    /// Create a whole-number percentage.
    #[must_use]
    pub const fn new(whole: u32) -> Self {
        Self(whole.saturating_mul(HUNDREDTHS_PER_PERCENT))
    }

    /// Create a percentage from hundredths of a percent (`3333` is 33.33%).
    #[must_use]
    pub const fn from_hundredths(hundredths: u32) -> Self {
        Self(hundredths)
    }

    /// Hundredths of a percent.
    #[must_use]
    pub const fn hundredths(self) -> u32 {
        self.0
    }

    /// Resolve against a base length, rounding down.
    ///
    /// ```
    /// use wee_layout::style::Percent;
    ///
    /// assert_eq!(Percent::new(40).of(300), 120);
    /// assert_eq!(Percent::from_hundredths(3333).of(100), 33);
    /// ```
    #[must_use]
    pub fn of(self, base: u32) -> u32 {
        let scaled = u64::from(base).saturating_mul(u64::from(self.0)) / u64::from(FULL_PERCENT);
        u32::try_from(scaled).unwrap_or(u32::MAX)
    }
}

/// Declared size of a box along one axis.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SizeMode {
    /// No size declared; the box takes its rendered size.
    #[default]
    Undefined,

    /// Fixed pixel size.
    Absolute(u32),

    /// Percentage of the container's extent on the same axis.
    Percent(Percent),
}

impl SizeMode {
    /// Parse a length string such as `"120px"`, `"120"`, `"33.5%"` or `""`.
    ///
    /// An empty string is `Undefined`. A bare number is read as pixels.
    /// Fractional pixels are rounded down.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::MalformedLength`] for anything else, including
    /// units other than `px` and `%` and negative values.
    pub fn parse(input: &str) -> Result<Self, LayoutError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(SizeMode::Undefined);
        }

        if let Some(number) = trimmed.strip_suffix('%') {
            let hundredths = parse_hundredths(number.trim_end()).ok_or(LayoutError::MalformedLength)?;
            return Ok(SizeMode::Percent(Percent::from_hundredths(hundredths)));
        }

        let number = trimmed.strip_suffix("px").unwrap_or(trimmed);
        let hundredths = parse_hundredths(number.trim_end()).ok_or(LayoutError::MalformedLength)?;
        Ok(SizeMode::Absolute(hundredths / HUNDREDTHS_PER_PERCENT))
    }

    /// Parse a length string, treating malformed input as `Undefined`.
    pub fn parse_lossy(input: &str) -> Self {
        match Self::parse(input) {
            Ok(mode) => mode,
            Err(_) => {
                tracing::warn!(length = input, "malformed length, treating as undefined");
                SizeMode::Undefined
            }
        }
    }

    /// Returns the percentage if this is a relative size.
    pub fn percent(self) -> Option<Percent> {
        match self {
            SizeMode::Percent(pct) => Some(pct),
            _ => None,
        }
    }

    /// Returns `true` if this is a relative size.
    pub fn is_percent(self) -> bool {
        matches!(self, SizeMode::Percent(_))
    }

    /// Returns `true` unless this is `Undefined`.
    pub fn is_defined(self) -> bool {
        !matches!(self, SizeMode::Undefined)
    }
}

/// Parses `"12"`, `"12.5"`, `".25"` into hundredths. Extra decimals are truncated.
fn parse_hundredths(number: &str) -> Option<u32> {
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let whole: u32 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut digits = fraction.bytes().map(|b| u32::from(b.wrapping_sub(b'0')));
    let tenths = digits.next().unwrap_or(0);
    let hundredths = digits.next().unwrap_or(0);

    whole
        .checked_mul(HUNDREDTHS_PER_PERCENT)?
        .checked_add(tenths.saturating_mul(10).saturating_add(hundredths))
}

/// Horizontal placement of a child inside its slot.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HorizontalAlign {
    /// Flush left.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Flush right.
    Right,
}

/// Vertical placement of a child inside its slot.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VerticalAlign {
    /// Flush top.
    #[default]
    Top,
    /// Centered.
    Middle,
    /// Flush bottom.
    Bottom,
}

/// Placement of a child on both axes.
///
/// Only the cross-axis component has an effect: a row container honors the
/// vertical part, a column container the horizontal part.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Alignment {
    /// Horizontal component.
    pub horizontal: HorizontalAlign,
    /// Vertical component.
    pub vertical: VerticalAlign,
}

impl Alignment {
    /// Left/top bit in the classic alignment bit mask.
    pub const BIT_LEFT: u8 = 1;
    /// Right bit.
    pub const BIT_RIGHT: u8 = 2;
    /// Top bit.
    pub const BIT_TOP: u8 = 4;
    /// Bottom bit.
    pub const BIT_BOTTOM: u8 = 8;
    /// Horizontal center bit.
    pub const BIT_HORIZONTAL_CENTER: u8 = 16;
    /// Vertical center bit.
    pub const BIT_VERTICAL_CENTER: u8 = 32;

    /// Default alignment for children that never had one set.
    pub const TOP_LEFT: Alignment = Alignment::new(HorizontalAlign::Left, VerticalAlign::Top);
    #[allow(missing_docs)]
    pub const TOP_CENTER: Alignment = Alignment::new(HorizontalAlign::Center, VerticalAlign::Top);
    #[allow(missing_docs)]
    pub const TOP_RIGHT: Alignment = Alignment::new(HorizontalAlign::Right, VerticalAlign::Top);
    #[allow(missing_docs)]
    pub const MIDDLE_LEFT: Alignment = Alignment::new(HorizontalAlign::Left, VerticalAlign::Middle);
    #[allow(missing_docs)]
    pub const MIDDLE_CENTER: Alignment =
        Alignment::new(HorizontalAlign::Center, VerticalAlign::Middle);
    #[allow(missing_docs)]
    pub const MIDDLE_RIGHT: Alignment =
        Alignment::new(HorizontalAlign::Right, VerticalAlign::Middle);
    #[allow(missing_docs)]
    pub const BOTTOM_LEFT: Alignment = Alignment::new(HorizontalAlign::Left, VerticalAlign::Bottom);
    #[allow(missing_docs)]
    pub const BOTTOM_CENTER: Alignment =
        Alignment::new(HorizontalAlign::Center, VerticalAlign::Bottom);
    #[allow(missing_docs)]
    pub const BOTTOM_RIGHT: Alignment =
        Alignment::new(HorizontalAlign::Right, VerticalAlign::Bottom);

    /// Create an alignment from its two components.
    pub const fn new(horizontal: HorizontalAlign, vertical: VerticalAlign) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// Decode the left/right/top/bottom/center bit mask used by server-side
    /// layout descriptions. Missing components fall back to left and top.
    ///
    /// ```
    /// use wee_layout::style::Alignment;
    ///
    /// assert_eq!(Alignment::from_bits(8 | 2), Alignment::BOTTOM_RIGHT);
    /// assert_eq!(Alignment::from_bits(48), Alignment::MIDDLE_CENTER);
    /// assert_eq!(Alignment::from_bits(0), Alignment::TOP_LEFT);
    /// ```
    pub fn from_bits(bits: u8) -> Self {
        let horizontal = if bits & Self::BIT_RIGHT != 0 {
            HorizontalAlign::Right
        } else if bits & Self::BIT_HORIZONTAL_CENTER != 0 {
            HorizontalAlign::Center
        } else {
            HorizontalAlign::Left
        };
        let vertical = if bits & Self::BIT_BOTTOM != 0 {
            VerticalAlign::Bottom
        } else if bits & Self::BIT_VERTICAL_CENTER != 0 {
            VerticalAlign::Middle
        } else {
            VerticalAlign::Top
        };
        Self::new(horizontal, vertical)
    }

    /// Encode back into the bit mask accepted by [`from_bits`](Self::from_bits).
    pub fn to_bits(self) -> u8 {
        let horizontal = match self.horizontal {
            HorizontalAlign::Left => Self::BIT_LEFT,
            HorizontalAlign::Center => Self::BIT_HORIZONTAL_CENTER,
            HorizontalAlign::Right => Self::BIT_RIGHT,
        };
        let vertical = match self.vertical {
            VerticalAlign::Top => Self::BIT_TOP,
            VerticalAlign::Middle => Self::BIT_VERTICAL_CENTER,
            VerticalAlign::Bottom => Self::BIT_BOTTOM,
        };
        horizontal | vertical
    }

    /// The component that applies on the cross axis of `direction`.
    pub fn cross(self, direction: Direction) -> CrossAlign {
        match direction {
            Direction::Row => match self.vertical {
                VerticalAlign::Top => CrossAlign::Start,
                VerticalAlign::Middle => CrossAlign::Center,
                VerticalAlign::Bottom => CrossAlign::End,
            },
            Direction::Column => match self.horizontal {
                HorizontalAlign::Left => CrossAlign::Start,
                HorizontalAlign::Center => CrossAlign::Center,
                HorizontalAlign::Right => CrossAlign::End,
            },
        }
    }
}

/// Cross-axis position of a child, independent of direction.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CrossAlign {
    /// Flush with the start of the cross axis.
    #[default]
    Start,
    /// Centered, rounding down.
    Center,
    /// Flush with the end of the cross axis.
    End,
}

impl CrossAlign {
    /// Offset of a child of `child` pixels inside `available` pixels.
    ///
    /// Children larger than the available space sit at the start.
    pub fn offset(self, available: u32, child: u32) -> u32 {
        let free = available.saturating_sub(child);
        match self {
            CrossAlign::Start => 0,
            CrossAlign::Center => free / 2,
            CrossAlign::End => free,
        }
    }
}
