//! Build-time helpers behind the `favicon-gen` and `site-smoke` binaries.

pub mod favicon;
pub mod smoke;
