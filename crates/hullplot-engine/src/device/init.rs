/// How the GPU device and window surface are set up.
#[derive(Debug, Clone)]
pub struct GpuInit {
    pub power_preference: wgpu::PowerPreference,

    /// Wait for vertical blank. When off, mailbox or immediate presentation
    /// is used if the surface offers it.
    pub vsync: bool,

    /// Off by default so batch colors reach the surface unconverted.
    pub prefer_srgb: bool,

    pub required_limits: wgpu::Limits,

    /// Hint for the number of frames queued ahead of presentation.
    pub frame_latency: u32,
}

impl GpuInit {
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    pub fn low_power(mut self) -> Self {
        self.power_preference = wgpu::PowerPreference::LowPower;
        self
    }
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::HighPerformance,
            vsync: true,
            prefer_srgb: false,
            required_limits: wgpu::Limits::downlevel_defaults(),
            frame_latency: 2,
        }
    }
}
