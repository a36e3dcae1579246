//! Data layer: core types, loading, filtering, and aggregation.
//!
//! Architecture:
//! ```text
//!  .csv / .json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  normalize headers, coerce fields → FilmDataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌─────────────┐
//!   │ FilmDataset  │  base table + exploded-by-genre view (immutable)
//!   └─────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  year range / genre set / rating floor → row indices
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ aggregate  │  one-pass group-and-summarize per chart
//!   └───────────┘
//! ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
