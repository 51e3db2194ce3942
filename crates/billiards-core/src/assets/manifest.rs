use serde::{Deserialize, Serialize};

use crate::error::SetupError;

/// Number of ball images: 15 object balls plus the cue ball.
pub const BALL_IMAGES: usize = 16;

/// Image paths the host needs to draw the table. Loaded from JSON at start-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetManifest {
    /// Table background, drawn at the world origin.
    pub table: String,
    /// Ball images; entry `n - 1` belongs to presentation number `n`.
    pub balls: Vec<String>,
    /// Power-bar segment image. Hosts fall back to a filled rect when absent.
    #[serde(default)]
    pub power_bar: Option<String>,
}

impl AssetManifest {
    /// Parse and validate a manifest.
    pub fn from_json(json: &str) -> Result<Self, SetupError> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// The conventional `images/` layout.
    pub fn placeholder() -> Self {
        Self {
            table: "images/table.png".to_string(),
            balls: (1..=BALL_IMAGES).map(|n| format!("images/ball_{}.png", n)).collect(),
            power_bar: None,
        }
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        if self.table.trim().is_empty() {
            return Err(SetupError::missing_asset("table image"));
        }
        if self.balls.len() != BALL_IMAGES {
            return Err(SetupError::missing_asset(format!(
                "expected {} ball images, found {}",
                BALL_IMAGES,
                self.balls.len()
            )));
        }
        if let Some(i) = self.balls.iter().position(|p| p.trim().is_empty()) {
            return Err(SetupError::missing_asset(format!("ball image {}", i + 1)));
        }
        Ok(())
    }

    /// Image for presentation number `number` (1..=16).
    pub fn ball_image(&self, number: u8) -> Option<&str> {
        let index = (number as usize).checked_sub(1)?;
        self.balls.get(index).map(String::as_str)
    }
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self::placeholder()
    }
}
