//! Serves a directory of markdown files as styled HTML pages.
//!
//! A request path is screened by [`path::validate`], mapped to a file by
//! [`path::ContentRoot::resolve`], rendered by [`markdown::render`] and
//! wrapped in the [`page::Page`] shell. [`site::router`] ties these together
//! behind the optional [`headers`] middleware.

pub mod config;
pub mod error;
pub mod headers;
pub mod markdown;
pub mod page;
pub mod path;
pub mod seed;
pub mod site;

pub use config::Config;
pub use error::SiteError;
pub use site::{router, Site};
