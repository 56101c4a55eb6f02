//! Opaque graphics backend

use easy_core::Result;

/// A renderer the engine drives once per frame.
///
/// `render` runs in the render phase and `present` after every other task.
pub trait GraphicsDevice {
    fn render(&mut self, delta: f64) -> Result<()>;

    fn present(&mut self) -> Result<()>;

    /// The window's client area changed size
    fn resize(&mut self, _width: u32, _height: u32) {}
}

/// Draws nothing and counts frames
#[derive(Debug, Default)]
pub struct NullGraphics {
    rendered: u64,
    presented: u64,
    size: Option<(u32, u32)>,
}

impl NullGraphics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.rendered
    }

    pub fn frames_presented(&self) -> u64 {
        self.presented
    }

    /// Last size passed to [`GraphicsDevice::resize`]
    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }
}

impl GraphicsDevice for NullGraphics {
    fn render(&mut self, _delta: f64) -> Result<()> {
        self.rendered += 1;
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.presented += 1;
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = Some((width, height));
    }
}
