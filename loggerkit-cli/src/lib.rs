//! The conversion driver shared by the `tpconv` and `asconv`
//! binaries: format registries keyed by filename extension, the
//! read→filter→write pump, and the output-file cleanup contract.
pub mod driver;
pub mod registry;
