//! # fewocal-core
//!
//! Data model, timeline layout and HTML serialization for the fewocal
//! occupancy calendar.
//!
//! The crate is the pure half of the system: given a [`booking::CalendarBoard`]
//! (built by `fewocal-backend` from the raw overview files) and the per-run
//! [`booking::Annotations`] (computed by `fewocal-pipeline` from the
//! persistent stores), it lays the bookings out on a one-year timeline and
//! serializes the result into one self-contained HTML/SVG document.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`booking`] | `Booking`, `BlockedRange`, `BookingKey`, board aggregates |
//! | [`dates`] | `DD.MM.YYYY` / `DD.MM.YY` parsing and display formatting |
//! | [`properties`] | lane display order and display-name overrides |
//! | [`layout`] | window, pixel geometry, clipping, trim, turnover, labels |
//! | [`serializer`] | the HTML document serializer and escaping |
//! | [`error`] | `FewocalError` and the `Result` alias |
//!
//! ## Example
//!
//! ```
//! use fewocal_core::booking::{Annotations, Booking, CalendarBoard, PropertyLane};
//! use fewocal_core::serializer::CalendarHtmlSerializer;
//! use chrono::NaiveDate;
//!
//! let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
//! let board = CalendarBoard {
//!     lanes: vec![PropertyLane {
//!         property: "Fischers Huus".to_string(),
//!         bookings: vec![Booking {
//!             property: "Fischers Huus".to_string(),
//!             guest: "Familie Petersen".to_string(),
//!             start: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
//!             end: NaiveDate::from_ymd_opt(2025, 6, 17).unwrap(),
//!             guest_count: Some(4),
//!             animal_count: None,
//!         }],
//!         blocked: vec![],
//!     }],
//! };
//! let html = CalendarHtmlSerializer::new()
//!     .serialize(&board, &Annotations::default(), today, 0);
//! assert!(html.contains("Familie Petersen"));
//! ```

pub mod booking;
pub mod dates;
pub mod error;
pub mod layout;
pub mod properties;
pub mod serializer;

pub use booking::{Annotations, BlockedRange, Booking, BookingKey, CalendarBoard, PropertyLane};
pub use error::{FewocalError, Result};
pub use layout::{Geometry, Window, DEFAULT_SCALE};
pub use serializer::{CalendarHtmlSerializer, HtmlOptions};
