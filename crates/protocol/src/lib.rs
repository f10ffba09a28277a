//! The marker protocol: detection, decoding, and excision of
//! `[TOOL_CALL: name(params)]` directives embedded in model prose.
//!
//! Layering, leaves first: [`scan`] owns the marker grammar (one
//! bracket/quote-aware scanner shared by everything that needs to agree on
//! what a marker is), [`params`] decodes the text between the parentheses,
//! [`detect`] extracts complete calls from a full response, and [`gate`]
//! applies the same grammar incrementally to decide which streamed tokens
//! are safe to show a user.

pub mod detect;
pub mod gate;
pub mod params;
pub mod scan;

pub use detect::{detect, visible_text};
pub use gate::MarkerGate;
pub use params::{decode, DecodedParams, JSON_PAYLOAD_KEY};
pub use scan::MARKER_OPEN;
