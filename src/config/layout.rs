use serde::{Deserialize, Serialize};
use anyhow::{Result, anyhow};
use super::Validate;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LayoutConfig {
    pub viewport: Viewport,
    pub road: Road,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Road {
    pub width: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport {
                width: 800.0,
                height: 600.0,
            },
            road: Road { width: 100.0 },
        }
    }
}

/// Intersection coordinates derived once from the viewport dimensions.
///
/// The vertical main road runs down the middle of the viewport; two
/// horizontal roads cross it at one third and two thirds of the height.
/// Traffic keeps to lanes offset a quarter road-width from the centerline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub road_width: f32,
    /// Lane centerline distance from the road centerline.
    pub lane_offset: f32,
    /// X of the left edge of the vertical road.
    pub road_edge: f32,
    /// X centerline of the vertical road.
    pub main_road_x: f32,
    /// Y centerline of the upper horizontal road (the signalized crossing).
    pub top_road_y: f32,
    /// Y centerline of the lower horizontal road.
    pub bottom_road_y: f32,
}

impl Layout {
    pub fn from_config(config: &LayoutConfig) -> Self {
        let width = config.viewport.width;
        let height = config.viewport.height;
        let road_width = config.road.width;

        Self {
            width,
            height,
            road_width,
            lane_offset: road_width / 4.0,
            road_edge: (width - road_width) / 2.0,
            main_road_x: width / 2.0,
            top_road_y: height / 3.0,
            bottom_road_y: 2.0 * height / 3.0,
        }
    }

    pub fn half_road_width(&self) -> f32 {
        self.road_width / 2.0
    }

    /// True when a point lies outside the visible viewport.
    pub fn is_off_screen(&self, x: f32, y: f32) -> bool {
        x < 0.0 || x > self.width || y < 0.0 || y > self.height
    }
}

impl Default for Layout {
    fn default() -> Self {
        Layout::from_config(&LayoutConfig::default())
    }
}

impl Validate for LayoutConfig {
    fn validate(&self) -> Result<()> {
        let viewport = &self.viewport;
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return Err(anyhow!("Viewport dimensions must be positive"));
        }

        if self.road.width <= 0.0 {
            return Err(anyhow!("Road width must be positive"));
        }

        if self.road.width >= viewport.width || self.road.width >= viewport.height {
            return Err(anyhow!(
                "Road width {} does not fit the {}x{} viewport",
                self.road.width,
                viewport.width,
                viewport.height
            ));
        }

        Ok(())
    }
}
