#[cfg(windows)]
use windows::Win32::Foundation::HWND;

#[cfg(windows)]
use crate::error::SampleResult;

/// Window dimensions, title and adapter choice shared by every sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBase {
    width: u32,
    height: u32,
    title: String,
    use_warp_device: bool,
}

impl SampleBase {
    pub fn new(width: u32, height: u32, title: impl Into<String>, use_warp_device: bool) -> Self {
        Self {
            width,
            height,
            title: title.into(),
            use_warp_device,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }

    /// Title shown in the caption bar.
    pub fn window_text(&self) -> String {
        if self.use_warp_device {
            format!("{} (WARP)", self.title)
        } else {
            self.title.clone()
        }
    }

    /// Client rectangle as `(right, bottom)` for `AdjustWindowRect`.
    pub fn client_size(&self) -> (i32, i32) {
        (
            i32::try_from(self.width).unwrap_or(i32::MAX),
            i32::try_from(self.height).unwrap_or(i32::MAX),
        )
    }
}

/// Lifecycle hooks the Win32 application shell drives.
#[cfg(windows)]
pub trait DxSample {
    fn base(&self) -> &SampleBase;

    /// Creates every device-dependent resource once the window exists.
    fn on_init(&mut self, hwnd: HWND) -> SampleResult<()>;

    fn on_update(&mut self) {}

    fn on_render(&mut self) -> SampleResult<()>;

    /// Called once after the message loop exits, before the sample is dropped.
    fn on_destroy(&mut self);

    fn on_key_down(&mut self, _key: u8) {}

    fn on_key_up(&mut self, _key: u8) {}

    /// Hook for dumping debug-layer output after a failure.
    fn report_debug_messages(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hd_window_is_sixteen_by_nine() {
        let base = SampleBase::new(1280, 720, "D3D12 Hello Triangle", false);
        assert!((base.aspect_ratio() - 16.0 / 9.0).abs() < f32::EPSILON);
        assert_eq!(base.client_size(), (1280, 720));
    }

    #[test]
    fn zero_height_does_not_divide_by_zero() {
        let base = SampleBase::new(1280, 0, "minimised", false);
        assert_eq!(base.aspect_ratio(), 1.0);
    }

    #[test]
    fn warp_is_called_out_in_the_caption() {
        let hardware = SampleBase::new(1280, 720, "D3D12 Hello Triangle", false);
        let warp = SampleBase::new(1280, 720, "D3D12 Hello Triangle", true);
        assert_eq!(hardware.window_text(), "D3D12 Hello Triangle");
        assert_eq!(warp.window_text(), "D3D12 Hello Triangle (WARP)");
        assert_eq!(warp.title(), "D3D12 Hello Triangle");
    }

    #[test]
    fn oversized_dimensions_saturate() {
        let base = SampleBase::new(u32::MAX, 720, "huge", false);
        assert_eq!(base.client_size(), (i32::MAX, 720));
    }
}
