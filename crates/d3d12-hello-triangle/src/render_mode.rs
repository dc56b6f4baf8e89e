/// Virtual-key code of the space bar.
pub const SPACE_KEY: u8 = 0x20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    #[default]
    Raster,
    Raytrace,
}

impl RenderMode {
    pub fn toggled(self) -> Self {
        match self {
            RenderMode::Raster => RenderMode::Raytrace,
            RenderMode::Raytrace => RenderMode::Raster,
        }
    }

    pub fn clear_color(self) -> [f32; 4] {
        match self {
            RenderMode::Raster => [0.0, 0.2, 0.4, 1.0],
            RenderMode::Raytrace => [0.6, 0.8, 0.4, 1.0],
        }
    }

    pub fn is_raster(self) -> bool {
        self == RenderMode::Raster
    }

    /// Flips the mode on a space-bar release. Returns whether the mode changed.
    pub fn handle_key_up(&mut self, key: u8) -> bool {
        if key != SPACE_KEY {
            return false;
        }
        *self = self.toggled();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_raster_mode() {
        assert_eq!(RenderMode::default(), RenderMode::Raster);
        assert!(RenderMode::default().is_raster());
    }

    #[test]
    fn space_toggles_back_and_forth() {
        let mut mode = RenderMode::default();
        assert!(mode.handle_key_up(SPACE_KEY));
        assert_eq!(mode, RenderMode::Raytrace);
        assert!(mode.handle_key_up(SPACE_KEY));
        assert_eq!(mode, RenderMode::Raster);
    }

    #[test]
    fn other_keys_are_ignored() {
        let mut mode = RenderMode::default();
        for key in [b'A', 0x0D, 0x1B, 0x21] {
            assert!(!mode.handle_key_up(key));
        }
        assert_eq!(mode, RenderMode::Raster);
    }

    #[test]
    fn each_mode_clears_to_its_own_color() {
        assert_eq!(RenderMode::Raster.clear_color(), [0.0, 0.2, 0.4, 1.0]);
        assert_eq!(RenderMode::Raytrace.clear_color(), [0.6, 0.8, 0.4, 1.0]);
    }
}
