use winit::event::WindowEvent;
use winit::window::WindowId;

use crate::error::RenderError;
use crate::shader::{EmbeddedShaderLoader, ShaderLoader};
use crate::window::WindowRenderer;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by binaries.
#[allow(async_fn_in_trait)]
pub trait App {
    /// Loader handed to the renderer for every drawable's shaders.
    fn shader_loader(&self) -> Box<dyn ShaderLoader> {
        Box::new(EmbeddedShaderLoader::builtin())
    }

    /// Called once after the renderer has started; registers the scene.
    ///
    /// An error here is a startup failure: it is reported and the window closes.
    async fn setup(&mut self, renderer: &mut WindowRenderer<'_>) -> Result<(), RenderError>;

    /// Called for window events before the runtime handles them.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }
}
