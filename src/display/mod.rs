//! SDL2 window, streaming texture, and input polling.
//!
//! The rasterizer never sees SDL: each frame `RenderTarget::draw_frame`
//! locks the texture and hands the caller a borrowed `PixelBuffer` wrapped
//! around the texture's own pixel memory.

mod pixel_buffer;

pub use pixel_buffer::{alpha, components, composite, rgba, Pixel, PixelBuffer};

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;

pub struct Display {
    canvas: Canvas<Window>,
    event_pump: EventPump,
    width: u32,
    height: u32,
}

/// Streaming texture the software-rendered frame is uploaded through.
pub struct RenderTarget<'a> {
    texture: Texture<'a>,
    width: u32,
    height: u32,
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Quit,
    KeyDown(Keycode),
}

impl Display {
    /// Create display with custom resolution and VSync settings.
    /// vsync=true: presentation locked to monitor refresh.
    /// vsync=false: uncapped framerate for performance testing.
    pub fn with_options(
        title: &str,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<(Self, TextureCreator<WindowContext>), String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let mut canvas_builder = window.into_canvas().accelerated();
        if vsync {
            canvas_builder = canvas_builder.present_vsync();
        }
        let canvas = canvas_builder.build().map_err(|e| e.to_string())?;

        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump()?;

        Ok((
            Self {
                canvas,
                event_pump,
                width,
                height,
            },
            texture_creator,
        ))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Copy the target's texture to the window and present it.
    pub fn present(&mut self, target: &RenderTarget) -> Result<(), String> {
        self.canvas.copy(&target.texture, None, None)?;
        self.canvas.present();
        Ok(())
    }

    pub fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();

        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => events.push(InputEvent::Quit),
                Event::KeyDown {
                    keycode: Some(k), ..
                } => events.push(InputEvent::KeyDown(k)),
                _ => {},
            }
        }

        events
    }
}

impl<'a> RenderTarget<'a> {
    /// Create a streaming RGBA8888 render target. The packed format is
    /// defined on the 32-bit pixel value, so the buffer's native-endian
    /// words upload unmodified.
    pub fn with_size(
        texture_creator: &'a TextureCreator<WindowContext>,
        width: u32,
        height: u32,
    ) -> Result<Self, String> {
        let texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::RGBA8888, width, height)
            .map_err(|e| e.to_string())?;
        Ok(Self {
            texture,
            width,
            height,
        })
    }

    /// Lock the texture and run `f` against a borrowed PixelBuffer wrapping
    /// its pixel memory. The texture's row pitch becomes the buffer stride,
    /// which may exceed the logical width; the buffer exists only for the
    /// duration of the lock.
    pub fn draw_frame<F>(&mut self, f: F) -> Result<(), String>
    where
        F: FnOnce(&mut PixelBuffer) -> Result<(), String>,
    {
        let (width, height) = (self.width, self.height);
        self.texture
            .with_lock(None, |bytes: &mut [u8], pitch: usize| -> Result<(), String> {
                debug_assert!(pitch % 4 == 0, "RGBA8888 pitch must be word-sized");
                // Safety: an RGBA8888 texture's pixel memory is a whole
                // number of 32-bit words and SDL maps it word-aligned; the
                // empty prefix/suffix below is checked before use.
                let (prefix, pixels, suffix) = unsafe { bytes.align_to_mut::<Pixel>() };
                if !prefix.is_empty() || !suffix.is_empty() {
                    return Err("texture pixel memory is not 32-bit aligned".to_string());
                }
                let stride = (pitch / 4) as u32;
                let mut buffer = PixelBuffer::borrowed(pixels, width, height, stride)?;
                f(&mut buffer)
            })
            .map_err(|e| e.to_string())?
    }
}
