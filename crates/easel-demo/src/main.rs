use easel_engine::core::App;
use easel_engine::device::{GpuInit, WgpuDevice};
use easel_engine::error::RenderError;
use easel_engine::logging::{init_logging, LoggingConfig};
use easel_engine::shader::{EmbeddedShaderLoader, FileShaderLoader, ShaderLoader};
use easel_engine::shapes::Standard2DVertexObject;
use easel_engine::window::{Runtime, RuntimeConfig, WindowRenderer};

/// Directory to read WGSL from instead of the built-in sources.
const SHADER_DIR_ENV: &str = "EASEL_SHADER_DIR";

/// Interleaved `x, y, r, g, b` per vertex.
#[rustfmt::skip]
const TRIANGLE: [f32; 15] = [
     0.0,  0.5,  0.85, 0.0, 0.0,
    -0.5,  0.0,  0.85, 0.0, 0.0,
     0.5,  0.0,  0.85, 0.0, 0.0,
];

#[rustfmt::skip]
const SQUARE: [f32; 30] = [
    -0.5, -0.1,  0.0, 0.85, 0.0,
    -0.5, -0.6,  0.0, 0.85, 0.0,
     0.0, -0.6,  0.0, 0.85, 0.0,
     0.0, -0.1,  0.0, 0.85, 0.0,
    -0.5, -0.1,  0.0, 0.85, 0.0,
     0.0, -0.6,  0.0, 0.85, 0.0,
];

#[rustfmt::skip]
const STAR: [f32; 30] = [
    0.3, -0.1,   0.0, 0.0, 0.85,
    0.1, -0.45,  0.0, 0.0, 0.85,
    0.5, -0.45,  0.0, 0.0, 0.85,
    0.1, -0.25,  0.0, 0.0, 0.85,
    0.5, -0.25,  0.0, 0.0, 0.85,
    0.3, -0.6,   0.0, 0.0, 0.85,
];

struct Demo;

impl App for Demo {
    fn shader_loader(&self) -> Box<dyn ShaderLoader> {
        match std::env::var_os(SHADER_DIR_ENV) {
            Some(dir) => {
                log::info!("loading shaders from {}", dir.to_string_lossy());
                Box::new(FileShaderLoader::new(dir))
            }
            None => Box::new(EmbeddedShaderLoader::builtin()),
        }
    }

    async fn setup(&mut self, renderer: &mut WindowRenderer<'_>) -> Result<(), RenderError> {
        for vertices in [&TRIANGLE[..], &SQUARE[..], &STAR[..]] {
            let label = renderer.next_label(Standard2DVertexObject::<WgpuDevice>::KIND);
            let shape = Standard2DVertexObject::from_interleaved(label, vertices)?;
            renderer.append_drawable(shape).await?;
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "easel demo".to_string(),
        ..RuntimeConfig::default()
    };

    Runtime::run(config, GpuInit::default(), Demo)
}
