use anyhow::{Context, Result};
use minirt_core::shapes::demo_scene;
use minirt_core::{IndexBuffer, SceneConfig, VertexBuffer};
use minirt_math::Camera;
use minirt_renderer::{ImageSink, RenderPipeline};
use std::time::Instant;

const MOVE_SPEED: f32 = 0.05;
const ROTATE_FACT: f32 = 0.02;

/// Camera motion applied once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Motion {
    strafe: f32,
    forward: f32,
    yaw: f32,
    pitch: f32,
}

impl Motion {
    fn is_still(&self) -> bool {
        *self == Motion::default()
    }
}

/// Frames-per-second over windows of at least one second of ticks.
#[derive(Debug, Default)]
struct FpsCounter {
    first: Option<u64>,
    count: u32,
    fps: f32,
}

impl FpsCounter {
    /// Count a frame at `tick` (milliseconds). Returns the new rate when a
    /// window closes.
    fn tick(&mut self, tick: u64) -> Option<f32> {
        let first = *self.first.get_or_insert(tick);
        self.count += 1;

        let elapsed = tick.saturating_sub(first);
        if elapsed <= 1000 {
            return None;
        }
        self.fps = self.count as f32 / elapsed as f32 * 1000.0;
        self.first = Some(tick);
        self.count = 0;
        Some(self.fps)
    }
}

/// Application state
struct App<'a> {
    pipeline: RenderPipeline<'a>,
    camera: Camera,
    sink: ImageSink,
    motion: Motion,
    fps: FpsCounter,
    triangles: usize,
}

impl<'a> App<'a> {
    fn new(
        config: &SceneConfig,
        vertices: &'a VertexBuffer,
        indices: &'a IndexBuffer,
    ) -> Result<Self> {
        let camera = config.camera();

        let mut pipeline = RenderPipeline::new(config.width, config.height, config.max_triangles)
            .context("Failed to create render pipeline")?;
        pipeline.set_camera(camera)?;
        pipeline.set_vertex_buffer(vertices)?;
        pipeline.set_index_buffer(indices)?;
        for light in config.lights() {
            pipeline.add_light(light)?;
        }

        Ok(Self {
            pipeline,
            camera,
            sink: ImageSink::new(),
            motion: Motion::default(),
            fps: FpsCounter::default(),
            triangles: indices.triangle_count(),
        })
    }

    fn set_motion(&mut self, motion: Motion) {
        self.motion = motion;
    }

    /// Render one frame, then move the camera for the next one.
    fn update(&mut self, tick: u64) -> Result<()> {
        self.pipeline.begin()?;
        self.pipeline.clear_buffer()?;
        self.pipeline.draw_indexed_triangles(0, self.triangles - 1)?;
        self.pipeline.present(&mut self.sink)?;
        self.pipeline.end()?;

        if let Some(fps) = self.fps.tick(tick) {
            log::info!("miniRT : FPS {:.2}", fps);
        }

        if !self.motion.is_still() {
            let m = self.motion;
            self.camera
                .rotate(m.yaw, m.pitch)
                .translate(m.strafe, m.forward);
            self.pipeline.set_camera(self.camera)?;
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting miniRT");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            SceneConfig::load(&path).with_context(|| format!("Failed to load scene {}", path))?
        }
        None => SceneConfig::default(),
    };
    let output = args.next().unwrap_or_else(|| "minirt.png".to_string());

    let (vertices, indices) = demo_scene()
        .into_buffers()
        .context("Failed to build demo scene")?;

    let mut app = App::new(&config, &vertices, &indices)?;
    app.set_motion(Motion {
        yaw: ROTATE_FACT,
        forward: MOVE_SPEED * 0.1,
        ..Motion::default()
    });

    log::info!("Rendering {} frames", config.frames);
    let start = Instant::now();
    for _ in 0..config.frames {
        app.update(start.elapsed().as_millis() as u64)?;
    }
    log::info!(
        "{} frames in {:.2}s",
        app.sink.frames_shown(),
        start.elapsed().as_secs_f32()
    );

    app.sink
        .save(&output)
        .with_context(|| format!("Failed to write {}", output))?;

    Ok(())
}
