//! Core types for Shutter
//!
//! These types describe what gets captured and what the capture backend
//! reports back. They are shared by the session, the backends and the
//! host IPC protocol.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, ShutterError};

/// Area of the screen to capture
///
/// Coordinates and size are in logical pixels; `scale` is the output scale
/// factor of the display the region lives on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_scale")]
    pub scale: f64,
}

fn default_scale() -> f64 {
    1.0
}

impl Region {
    /// Create a region at scale 1.0
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            scale: 1.0,
        }
    }

    /// Set the display scale factor
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Parse a geometry string like `"10,20 640x480"` or `"0,0 1920x1080@1.5"`
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || ShutterError::InvalidRegion(s.to_string());

        let (geometry, scale) = match s.trim().split_once('@') {
            Some((geometry, scale)) => {
                let scale: f64 = scale.trim().parse().map_err(|_| invalid())?;
                if !scale.is_finite() || scale <= 0.0 {
                    return Err(invalid());
                }
                (geometry, scale)
            }
            None => (s.trim(), 1.0),
        };

        let (position, size) = geometry.trim().split_once(' ').ok_or_else(invalid)?;
        let (x, y) = position.split_once(',').ok_or_else(invalid)?;
        let (width, height) = size.trim().split_once('x').ok_or_else(invalid)?;

        let region = Self {
            x: x.trim().parse().map_err(|_| invalid())?,
            y: y.trim().parse().map_err(|_| invalid())?,
            width: width.trim().parse().map_err(|_| invalid())?,
            height: height.trim().parse().map_err(|_| invalid())?,
            scale,
        };

        if region.width == 0 || region.height == 0 {
            return Err(invalid());
        }

        Ok(region)
    }

    /// Geometry in the `X,Y WxH` form understood by grim and slurp
    pub fn geometry(&self) -> String {
        format!("{},{} {}x{}", self.x, self.y, self.width, self.height)
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.geometry())?;
        if self.scale != 1.0 {
            write!(f, "@{}", self.scale)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Region {
    type Err = ShutterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// What the session asks a backend to do
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureRequest {
    /// Region to capture (`None` = whole output)
    pub region: Option<Region>,
    /// File name to write, including extension
    pub filename: String,
    /// Directory to write into
    pub directory: PathBuf,
}

impl CaptureRequest {
    /// Full destination path
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }
}

/// What a backend reports after a capture attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureResult {
    pub success: bool,
    /// Name the backend actually wrote, if it differs or is known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CaptureResult {
    /// A successful capture written under `filename`
    pub fn saved(filename: impl Into<String>) -> Self {
        Self {
            success: true,
            filename: Some(filename.into()),
            error: None,
        }
    }

    /// A failed capture
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            filename: None,
            error: Some(error.into()),
        }
    }
}

/// A capture that the backend confirmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedCapture {
    /// File name as written
    pub filename: String,
    /// Full path of the written file
    pub path: PathBuf,
    /// Capture counter value after this capture
    pub sequence: u64,
}

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_region() {
        let region = Region::parse("10,20 640x480").unwrap();
        assert_eq!(region, Region::new(10, 20, 640, 480));
        assert_eq!(region.geometry(), "10,20 640x480");
    }

    #[test]
    fn test_parse_region_with_scale() {
        let region: Region = "-5,0 100x50@2".parse().unwrap();
        assert_eq!(region.x, -5);
        assert_eq!(region.scale, 2.0);
        assert_eq!(region.to_string(), "-5,0 100x50@2");
    }

    #[test]
    fn test_parse_region_rejects_garbage() {
        assert!(Region::parse("").is_err());
        assert!(Region::parse("10,20").is_err());
        assert!(Region::parse("10,20 0x480").is_err());
        assert!(Region::parse("a,b cxd").is_err());
        assert!(Region::parse("0,0 10x10@-1").is_err());
    }

    #[test]
    fn test_capture_result_json_omits_empty_fields() {
        let json = serde_json::to_string(&CaptureResult::saved("a.png")).unwrap();
        assert_eq!(json, r#"{"success":true,"filename":"a.png"}"#);

        let parsed: CaptureResult = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert!(!parsed.success);
        assert!(parsed.error.is_none());
    }
}
