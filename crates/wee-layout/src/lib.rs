//! Wee Layout
//!
//! Single-axis box layout engine with percentage sizing, for containers whose
//! children are rendered and measured by someone else.
//!
//! # Architecture
//!
//! - Style: SizeMode, Percent, Direction, Alignment, length parsing
//! - Cell and Container: ordered child slots with per-slot alignment
//! - Axis resolver: pure used-space, relative-size and rounding computation
//! - Layout driver: event queue, pass state machine, deferred correction
//! - Host seam: `Measure` and `LayoutHost` traits the renderer implements
//!
//! # Example
//!
//! ```
//! use wee_layout::prelude::*;
//! use wee_layout::mocks::MockHost;
//! use embedded_graphics::prelude::Size;
//!
//! let mut container = Container::new(Direction::Row);
//! container.set_width("300px");
//! for id in 1..=2 {
//!     let cell = Cell::with_size(ChildId(id), SizeMode::parse_lossy("50%"), SizeMode::Undefined);
//!     container.add_child(cell).unwrap();
//! }
//!
//! let mut host = MockHost::new(Size::new(300, 40))
//!     .with_child(ChildId(1), Size::new(10, 10))
//!     .with_child(ChildId(2), Size::new(10, 10));
//!
//! let mut driver = LayoutDriver::new();
//! assert_eq!(driver.process(&mut container, &mut host), Outcome::CorrectionPending);
//! assert_eq!(driver.settle(&container, &mut host), Outcome::Stabilized);
//! assert_eq!(host.declared_extent(ChildId(2), Axis::Horizontal), Some(150));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod cell;
pub mod config;
pub mod container;
pub mod driver;
pub mod error;
pub mod host;
pub mod mocks;
pub mod resolver;
pub mod style;

pub mod prelude {
    //! Everything a host needs to build and drive a container.

    pub use crate::cell::{Cell, ChildId};
    pub use crate::container::{Container, Slot};
    pub use crate::driver::{DriverState, LayoutDriver, LayoutEvent, Outcome};
    pub use crate::error::LayoutError;
    pub use crate::host::{LayoutHost, Measure};
    pub use crate::resolver::{AxisResolver, Correction, Resolution};
    pub use crate::style::*;
}
