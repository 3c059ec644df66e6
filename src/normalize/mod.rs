//! Response normalization.
//!
//! One mapping per subcommand from the upstream JSON tree to a [`Record`]
//! with a fixed field set. Missing fields never fail; only a payload whose
//! root is not an object does.

pub mod origins;
pub mod record;
pub mod reference;
pub mod urldebug;

pub use record::{Field, FieldValue, Layout, PLACEHOLDER, Record};

use serde_json::Value;

use crate::error::NormalizeError;

/// Signature shared by the three normalizers.
pub type Normalizer = fn(&Value) -> Result<Record, NormalizeError>;
