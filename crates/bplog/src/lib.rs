//! `bplog` - A personal blood-pressure log
//!
//! This library records blood-pressure readings, keeps them in a local
//! key-value store and renders them as a filtered history list or a
//! time-series chart.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod camera;
pub mod chart;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod history;
pub mod locale;
pub mod logging;
pub mod period;
pub mod photo;
pub mod reading;
pub mod storage;
pub mod store;
pub mod tracker;

pub use camera::{Camera, CameraDevice, CameraState, Facing, FileCamera};
pub use chart::{ChartOptions, ChartOutcome, SvgSurface};
pub use classify::{classify, Category};
pub use config::Config;
pub use error::{Error, Result};
pub use form::EntryForm;
pub use history::{HistoryRow, HistoryView};
pub use locale::Locale;
pub use logging::init_logging;
pub use period::Period;
pub use photo::Photo;
pub use reading::{NewReading, Reading, ReadingId};
pub use storage::{Backend, MemoryBackend, SqliteBackend};
pub use store::{ReadingStore, StoreStats};
pub use tracker::Tracker;
