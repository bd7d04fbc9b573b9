use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::translate_window_event;
use crate::input::{InputFrame, InputState};
use crate::time::FrameClock;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Wait for vertical blank when presenting.
    pub vsync: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "sprig".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            vsync: true,
        }
    }
}

/// Requests an app makes during a frame. Applied once `on_frame` returns.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    close_requested: bool,
}

impl RuntimeCtx {
    pub fn close(&mut self) {
        self.close_requested = true;
    }

    #[inline]
    pub fn is_close_requested(&self) -> bool {
        self.close_requested
    }
}

pub struct Runtime;

impl Runtime {
    /// Opens a window, brings up the GPU and drives `app` until it exits or
    /// the window is closed. Startup and device failures are returned.
    pub fn run<A: App + 'static>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let gpu_init = gpu_init.with_vsync(config.vsync);
        let mut driver = Driver {
            config,
            gpu_init,
            app,
            window: None,
            started: false,
            exiting: false,
            fatal: None,
        };

        event_loop
            .run_app(&mut driver)
            .context("winit event loop terminated with error")?;

        driver.fatal.map_or(Ok(()), Err)
    }
}

/// Window plus everything that lives exactly as long as it. The GPU surface
/// borrows the window, hence the self-reference.
#[self_referencing]
struct WindowEntry {
    input: InputState,
    input_frame: InputFrame,
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct Driver<A> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    started: bool,
    exiting: bool,
    fatal: Option<anyhow::Error>,
}

impl<A: App + 'static> Driver<A> {
    fn open_window(&self, event_loop: &ActiveEventLoop) -> Result<WindowEntry> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);
        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        WindowEntryTryBuilder {
            input: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.fatal = Some(err);
        self.exit(event_loop);
    }

    fn exit(&mut self, event_loop: &ActiveEventLoop) {
        if !self.exiting {
            self.exiting = true;
            if self.started {
                self.app.on_exit();
            }
            // GPU objects go before the window they borrow.
            self.window = None;
        }
        event_loop.exit();
    }

    fn frame(&mut self) -> AppControl {
        let Some(entry) = self.window.as_mut() else {
            return AppControl::Continue;
        };

        let app = &mut self.app;
        let mut runtime = RuntimeCtx::default();
        let control = entry.with_mut(|f| {
            let mut ctx = FrameCtx {
                window: WindowCtx { window: f.window },
                gpu: f.gpu,
                input: f.input,
                input_frame: f.input_frame,
                time: f.clock.tick(),
                runtime: &mut runtime,
            };
            let control = app.on_frame(&mut ctx);
            f.input_frame.clear();
            control
        });

        if runtime.is_close_requested() {
            AppControl::Exit
        } else {
            control
        }
    }
}

impl<A: App + 'static> ApplicationHandler for Driver<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.exiting {
            return;
        }

        let entry = match self.open_window(event_loop) {
            Ok(entry) => entry,
            Err(e) => return self.fail(event_loop, e),
        };

        if !self.started {
            if let Err(e) = entry.with_gpu(|gpu| self.app.on_start(gpu)) {
                return self.fail(event_loop, e.context("application start failed"));
            }
            self.started = true;
        }

        entry.with_window(|w| w.request_redraw());
        self.window = Some(entry);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exiting {
            return event_loop.exit();
        }
        event_loop.set_control_flow(ControlFlow::Poll);
        if let Some(entry) = &self.window {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if self.exiting {
            return event_loop.exit();
        }

        let (app, window) = (&mut self.app, &mut self.window);
        let Some(entry) = window.as_mut() else {
            return;
        };

        let control = entry.with_mut(|f| {
            if let Some(ev) = translate_window_event(f.window, &event) {
                f.input.apply_event(f.input_frame, ev);
            }
            app.on_window_event(&event)
        });
        if control == AppControl::Exit {
            return self.exit(event_loop);
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("window close requested");
                self.exit(event_loop);
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                entry.with_mut(|f| {
                    f.gpu.resize(f.window.inner_size());
                    f.window.request_redraw();
                });
            }
            WindowEvent::RedrawRequested => {
                if self.frame() == AppControl::Exit {
                    self.exit(event_loop);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_request_sticks_for_the_frame() {
        let mut ctx = RuntimeCtx::default();
        assert!(!ctx.is_close_requested());
        ctx.close();
        ctx.close();
        assert!(ctx.is_close_requested());
    }

    #[test]
    fn default_config_enables_vsync() {
        let config = RuntimeConfig::default();
        assert!(config.vsync);
        assert_eq!(config.initial_size, LogicalSize::new(1280.0, 720.0));
    }
}
