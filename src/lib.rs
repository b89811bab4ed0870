//! `chgtools` is a small modular toolkit for slicing and plotting volumetric
//! charge density grids
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use chgtools_utils as utils;

#[doc(inline)]
pub use chgtools_field as field;

#[cfg(feature = "slice")]
#[cfg_attr(docsrs, doc(cfg(feature = "slice")))]
#[doc(inline)]
pub use chgtools_slice as slice;

#[cfg(feature = "plot")]
#[cfg_attr(docsrs, doc(cfg(feature = "plot")))]
#[doc(inline)]
pub use chgtools_plot as plot;
