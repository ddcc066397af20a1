//! Tap regions of the viewport.

use crate::model::{Rect, Size};
use serde::Serialize;

/// Named tap region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HitZone {
    /// Left third, full height.
    Left,
    /// Right third, full height.
    Right,
    /// Middle third horizontally, between 2/5 and 3/5 vertically.
    Center,
}

/// The three tap regions for one viewport size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HitZones {
    left: Rect,
    right: Rect,
    center: Rect,
}

impl HitZones {
    /// Zones for a viewport of `size`, edges floored to whole pixels.
    pub fn compute(size: Size) -> Self {
        let zone = |l: f32, t: f32, r: f32, b: f32| {
            Rect::new(
                (size.width * l).floor(),
                (size.height * t).floor(),
                (size.width * r).floor(),
                (size.height * b).floor(),
            )
        };
        Self {
            left: zone(0.0, 0.0, 1.0 / 3.0, 1.0),
            right: zone(2.0 / 3.0, 0.0, 1.0, 1.0),
            center: zone(1.0 / 3.0, 2.0 / 5.0, 2.0 / 3.0, 3.0 / 5.0),
        }
    }

    /// Rect of one zone.
    pub fn rect(&self, zone: HitZone) -> Rect {
        match zone {
            HitZone::Left => self.left,
            HitZone::Right => self.right,
            HitZone::Center => self.center,
        }
    }

    /// Which zone contains the point, if any.
    pub fn classify(&self, x: f32, y: f32) -> Option<HitZone> {
        [HitZone::Left, HitZone::Right, HitZone::Center]
            .into_iter()
            .find(|zone| self.rect(*zone).contains(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zones_split_viewport() {
        let zones = HitZones::compute(Size::new(1080.0, 1920.0));
        assert_eq!(zones.rect(HitZone::Left), Rect::new(0.0, 0.0, 360.0, 1920.0));
        assert_eq!(
            zones.rect(HitZone::Right),
            Rect::new(720.0, 0.0, 1080.0, 1920.0)
        );
        assert_eq!(
            zones.rect(HitZone::Center),
            Rect::new(360.0, 768.0, 720.0, 1152.0)
        );
    }

    #[test]
    fn classify_points() {
        let zones = HitZones::compute(Size::new(900.0, 1000.0));
        assert_eq!(zones.classify(10.0, 10.0), Some(HitZone::Left));
        assert_eq!(zones.classify(899.0, 999.0), Some(HitZone::Right));
        assert_eq!(zones.classify(450.0, 500.0), Some(HitZone::Center));
        assert_eq!(zones.classify(450.0, 100.0), None);
    }

    #[test]
    fn empty_viewport_has_no_zones() {
        let zones = HitZones::default();
        assert_eq!(zones.classify(0.0, 0.0), None);
    }
}
