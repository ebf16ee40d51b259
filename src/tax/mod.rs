//! Tax computation: GST regimes and TDS

pub mod gst;
pub mod tds;

pub use gst::*;
pub use tds::*;
