//! Filter-and-aggregate engine behind the sustainable fashion dashboard.
//!
//! The desktop app in `main.rs` is only a view over [`data::Dashboard`];
//! everything it shows is computed here from an immutable [`data::Table`].

pub mod data;
