//! Device-specific framing thresholds.
//!
//! Mobile cameras tend to be lower resolution and further away from the user,
//! so they get a more lenient set of thresholds than desktop webcams. The
//! validator only ever sees a [`DeviceProfile`]; the user-agent sniff below is
//! just one way for a caller to pick one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse device class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// Phones and tablets
    Mobile,
    /// Laptops and desktops with a webcam
    Desktop,
}

const MOBILE_MARKERS: [&str; 9] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
    "mobile",
];

impl DeviceKind {
    /// Classify a browser user-agent string
    #[must_use]
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_lowercase();
        if MOBILE_MARKERS.iter().any(|marker| ua.contains(marker)) {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mobile => write!(f, "mobile"),
            Self::Desktop => write!(f, "desktop"),
        }
    }
}

impl FromStr for DeviceKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "mobile" | "phone" => Ok(Self::Mobile),
            "desktop" | "laptop" => Ok(Self::Desktop),
            _ => Err(crate::Error::InvalidInput(format!("Unknown device kind: {s}"))),
        }
    }
}

/// Thresholds used by the position validator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// Minimum visibility for each key landmark
    pub min_visibility: f64,
    /// Distance the body box must keep from every frame edge
    pub edge_margin: f64,
    /// Minimum ankle-to-shoulder vertical span
    pub min_body_height: f64,
    /// Minimum shoulder width and hip width
    pub min_body_width: f64,
    /// Maximum horizontal offset between shoulder and hip centers
    pub max_body_misalignment: f64,
    /// Consecutive valid frames needed before the position is accepted
    pub required_valid_frames: u32,
    /// Consecutive valid frames after which "position good" may be announced
    pub audio_trigger_frames: u32,
}

impl DeviceProfile {
    /// Lenient thresholds for phone cameras
    #[must_use]
    pub const fn mobile() -> Self {
        Self {
            min_visibility: 0.3,
            edge_margin: 0.02,
            min_body_height: 0.3,
            min_body_width: 0.05,
            max_body_misalignment: 0.2,
            required_valid_frames: 10,
            audio_trigger_frames: 5,
        }
    }

    /// Stricter thresholds for desktop webcams
    #[must_use]
    pub const fn desktop() -> Self {
        Self {
            min_visibility: 0.5,
            edge_margin: 0.05,
            min_body_height: 0.4,
            min_body_width: 0.08,
            max_body_misalignment: 0.15,
            required_valid_frames: 20,
            audio_trigger_frames: 10,
        }
    }

    /// Built-in profile for a device class
    #[must_use]
    pub const fn for_kind(kind: DeviceKind) -> Self {
        match kind {
            DeviceKind::Mobile => Self::mobile(),
            DeviceKind::Desktop => Self::desktop(),
        }
    }

    /// Check that every threshold is usable
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` naming the first out-of-range value
    pub fn validate(&self) -> crate::Result<()> {
        use crate::Error;

        if !(0.0..=1.0).contains(&self.min_visibility) {
            return Err(Error::ConfigError("min_visibility must be between 0.0 and 1.0".to_string()));
        }
        if !(0.0..0.5).contains(&self.edge_margin) {
            return Err(Error::ConfigError("edge_margin must be in [0.0, 0.5)".to_string()));
        }
        if !(0.0..=1.0).contains(&self.min_body_height) || !(0.0..=1.0).contains(&self.min_body_width) {
            return Err(Error::ConfigError("Body size thresholds must be between 0.0 and 1.0".to_string()));
        }
        if self.max_body_misalignment < 0.0 {
            return Err(Error::ConfigError("max_body_misalignment must be non-negative".to_string()));
        }
        if self.required_valid_frames == 0 {
            return Err(Error::ConfigError("required_valid_frames must be greater than 0".to_string()));
        }
        if self.audio_trigger_frames > self.required_valid_frames {
            return Err(Error::ConfigError(
                "audio_trigger_frames must not exceed required_valid_frames".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self::desktop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_classification() {
        let iphone = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15";
        let android = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 Chrome/120.0 Mobile Safari/537.36";
        let linux = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/120.0 Safari/537.36";

        assert_eq!(DeviceKind::from_user_agent(iphone), DeviceKind::Mobile);
        assert_eq!(DeviceKind::from_user_agent(android), DeviceKind::Mobile);
        assert_eq!(DeviceKind::from_user_agent(linux), DeviceKind::Desktop);
        assert_eq!(DeviceKind::from_user_agent(""), DeviceKind::Desktop);
    }

    #[test]
    fn test_mobile_is_more_lenient() {
        let mobile = DeviceProfile::mobile();
        let desktop = DeviceProfile::desktop();

        assert!(mobile.min_visibility < desktop.min_visibility);
        assert!(mobile.min_body_height < desktop.min_body_height);
        assert!(mobile.min_body_width < desktop.min_body_width);
        assert!(mobile.max_body_misalignment > desktop.max_body_misalignment);
        assert!(mobile.required_valid_frames < desktop.required_valid_frames);
    }

    #[test]
    fn test_builtin_profiles_validate() {
        assert!(DeviceProfile::mobile().validate().is_ok());
        assert!(DeviceProfile::desktop().validate().is_ok());

        let broken = DeviceProfile {
            required_valid_frames: 0,
            ..DeviceProfile::desktop()
        };
        assert!(broken.validate().is_err());
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("Mobile".parse::<DeviceKind>().unwrap(), DeviceKind::Mobile);
        assert_eq!("desktop".parse::<DeviceKind>().unwrap(), DeviceKind::Desktop);
        assert!("toaster".parse::<DeviceKind>().is_err());
    }
}
