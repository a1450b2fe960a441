//! Panel source trait definition.

use crate::error::Result;
use crate::model::Panel;

/// Trait for sources that can load a country-year panel.
pub trait PanelSource: Send + Sync {
    /// Source name.
    fn name(&self) -> &str;

    /// Load the full panel.
    fn load(&self) -> Result<Panel>;
}
