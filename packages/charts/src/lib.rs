#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Figure builders and HTML writers for the map and chart documents.
//!
//! A [`Figure`] is a plotly figure specification (traces plus layout)
//! built as plain JSON and rendered client-side by plotly.js. The
//! [`html`] module wraps a figure either as a standalone document (the
//! MapDocument artifact written by the generator) or as an inline
//! fragment embedded in a dashboard page.

pub mod figures;
pub mod html;

use serde::Serialize;

/// A chart specification: plotly traces plus layout.
#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    /// Trace objects in plotly's JSON schema.
    pub data: Vec<serde_json::Value>,
    /// Layout object in plotly's JSON schema.
    pub layout: serde_json::Value,
}
