//! Responsive viewport adaptation
//!
//! Turns raw screen signals (size, touch capability, user agent) into a
//! logical game resolution, a UI scale factor and a safe area. The adapter is
//! pure: identical inputs always produce identical geometry.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Screen orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Broad device class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

/// Edge-inset rectangle inside the logical viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafeArea {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
}

/// Geometry derived from one set of screen signals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceGeometry {
    pub screen_width: f32,
    pub screen_height: f32,
    pub orientation: Orientation,
    pub game_width: f32,
    pub game_height: f32,
    pub scale_factor: f32,
    pub device_class: DeviceClass,
    /// Touch-capable or phone user agent; drives aspect, scale baseline and padding
    pub mobile_layout: bool,
    pub pixel_ratio: f32,
    pub safe_area: SafeArea,
}

impl DeviceGeometry {
    pub fn is_portrait(&self) -> bool {
        self.orientation == Orientation::Portrait
    }

    /// Scale a base-resolution length for this device
    pub fn scale_value(&self, value: f32) -> f32 {
        value * self.scale_factor
    }

    /// Scaled font size, never below 12 and never above 1.5x the base size
    pub fn font_size(&self, base: f32) -> f32 {
        (base * self.scale_factor).min(base * 1.5).max(MIN_FONT_SIZE)
    }

    /// Position at a fraction of the logical viewport
    pub fn responsive_position(&self, fx: f32, fy: f32) -> Vec2 {
        Vec2::new(self.game_width * fx, self.game_height * fy)
    }
}

/// User-agent derived device hints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct UserAgentHints {
    phone: bool,
    tablet: bool,
}

impl UserAgentHints {
    fn parse(user_agent: &str) -> Self {
        let ua = user_agent.to_ascii_lowercase();
        let phone = ["android", "iphone", "ipod"].iter().any(|s| ua.contains(s));
        // Android without a later "Mobile" token is a tablet
        let android_tablet = ua
            .match_indices("android")
            .any(|(i, _)| !ua[i..].contains("mobile"));
        Self {
            phone,
            tablet: ua.contains("ipad") || android_tablet,
        }
    }
}

/// Computes `DeviceGeometry` from screen signals
///
/// Holds the signals that do not change between resizes (user agent and
/// pixel ratio). Owned by the game session and passed to whoever needs it.
#[derive(Debug, Clone)]
pub struct ViewportAdapter {
    hints: UserAgentHints,
    pixel_ratio: f32,
}

impl Default for ViewportAdapter {
    fn default() -> Self {
        Self::desktop()
    }
}

impl ViewportAdapter {
    pub fn new(user_agent: &str, pixel_ratio: f32) -> Self {
        let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        Self {
            hints: UserAgentHints::parse(user_agent),
            pixel_ratio,
        }
    }

    /// Adapter for a plain desktop browser at 1x
    pub fn desktop() -> Self {
        Self::new("", 1.0)
    }

    /// Derive the logical game geometry for a screen size
    pub fn compute_geometry(
        &self,
        screen_width: f32,
        screen_height: f32,
        touch_capable: bool,
    ) -> DeviceGeometry {
        let screen_width = sanitize_dimension(screen_width);
        let screen_height = sanitize_dimension(screen_height);

        let mobile = touch_capable || self.hints.phone;
        let tablet = self.hints.tablet;
        let device_class = if !mobile && !tablet {
            DeviceClass::Desktop
        } else if tablet {
            DeviceClass::Tablet
        } else {
            DeviceClass::Mobile
        };

        let portrait = screen_height > screen_width;
        let orientation = if portrait {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        };

        let (game_width, game_height) = if portrait || mobile {
            let aspect = BASE_WIDTH / BASE_HEIGHT;
            if screen_height / screen_width > BASE_HEIGHT / BASE_WIDTH {
                // Taller than the base ratio: width constrains
                (screen_width, screen_width / aspect)
            } else {
                (screen_height * aspect, screen_height)
            }
        } else if screen_width / screen_height > WIDE_ASPECT {
            // Wider than 16:9: height constrains
            (screen_height * WIDE_ASPECT, screen_height)
        } else {
            (screen_width, screen_width / WIDE_ASPECT)
        };

        let baseline = if mobile {
            MOBILE_SCALE_BASELINE
        } else {
            DESKTOP_SCALE_BASELINE
        };
        let scale_factor = game_width.min(game_height) / baseline;

        // Clamp after the fit; the scale factor keeps the unclamped value
        let game_width = game_width.clamp(MIN_GAME_WIDTH, MAX_GAME_WIDTH);
        let game_height = game_height.clamp(MIN_GAME_HEIGHT, MAX_GAME_HEIGHT);

        let safe_area = safe_area(game_width, game_height, mobile, portrait);

        DeviceGeometry {
            screen_width,
            screen_height,
            orientation,
            game_width,
            game_height,
            scale_factor,
            device_class,
            mobile_layout: mobile,
            pixel_ratio: self.pixel_ratio,
            safe_area,
        }
    }
}

fn sanitize_dimension(value: f32) -> f32 {
    if value.is_finite() { value.max(1.0) } else { 1.0 }
}

fn safe_area(game_width: f32, game_height: f32, mobile: bool, portrait: bool) -> SafeArea {
    let padding = if mobile { MOBILE_PADDING } else { DESKTOP_PADDING };
    let (extra_top, extra_bottom) = if mobile && portrait {
        (NOTCH_INSET_TOP, GESTURE_INSET_BOTTOM)
    } else {
        (0.0, 0.0)
    };

    let left = padding;
    let right = game_width - padding;
    let top = padding + extra_top;
    let bottom = game_height - padding - extra_bottom;

    SafeArea {
        left,
        top,
        right,
        bottom,
        width: right - left,
        height: bottom - top,
    }
}
