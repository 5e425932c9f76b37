//! Window and scene configuration

/// Settings used when the scene window is created.
#[derive(Debug, Clone)]
pub struct SceneSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// Clear colour, RGBA in `[0, 1]`
    pub background: [f32; 4],
}

impl SceneSettings {
    pub const DEFAULT_BACKGROUND: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_owned();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn with_background(mut self, background: [f32; 4]) -> Self {
        self.background = background;
        self
    }

    pub fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            title: "tartan".to_string(),
            width: 900,
            height: 900,
            vsync: true,
            background: Self::DEFAULT_BACKGROUND,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = SceneSettings::default();
        assert_eq!(settings.title, "tartan");
        assert_eq!((settings.width, settings.height), (900, 900));
        assert_eq!(settings.background, [0.8, 0.8, 0.8, 1.0]);
        assert_eq!(settings.present_mode(), wgpu::PresentMode::AutoVsync);
    }

    #[test]
    fn test_builder_clamps_zero_size() {
        let settings = SceneSettings::default().with_size(0, 480).with_vsync(false);
        assert_eq!((settings.width, settings.height), (1, 480));
        assert_eq!(settings.present_mode(), wgpu::PresentMode::AutoNoVsync);
    }
}
