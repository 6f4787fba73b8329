//! Generic lab window: diagram, side panel and the event loop

use std::time::Instant;

use common::{Camera2D, DiagramRenderer, GraphicsContext, GraphicsError};
use lab_core::{Lab, LabConfig, LabSession};
use winit::{
    event::{ElementState, Event, KeyEvent, WindowEvent},
    event_loop::ControlFlow,
    keyboard::{KeyCode, PhysicalKey},
};

use crate::lab_panel::{draw_lab_panel, Notice, PanelAction, PanelModel};

const MAX_VERTICES: usize = 8192;

struct EguiState {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

struct LabApp<L: Lab> {
    ctx: GraphicsContext,
    renderer: DiagramRenderer,
    camera: Camera2D,
    session: LabSession<L>,
    panel: PanelModel,
    egui: EguiState,
}

impl<L: Lab> LabApp<L> {
    fn new(ctx: GraphicsContext, lab: L, config: &LabConfig) -> Self {
        let renderer = DiagramRenderer::new(&ctx, MAX_VERTICES);
        let camera = Camera2D::new(ctx.aspect_ratio());

        let mut session = LabSession::new(lab, config);
        session.start_clock();
        let panel = PanelModel::new(&session);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &ctx.window,
            Some(ctx.window.scale_factor() as f32),
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&ctx.device, ctx.config.format, None, 1);

        Self {
            ctx,
            renderer,
            camera,
            session,
            panel,
            egui: EguiState {
                ctx: egui_ctx,
                state: egui_state,
                renderer: egui_renderer,
            },
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.ctx.resize(new_size);
        self.camera.update_aspect_ratio(self.ctx.aspect_ratio());
    }

    fn update(&mut self, now: Instant) {
        self.session.tick_due(now);
    }

    fn apply(&mut self, action: PanelAction) {
        let names: Vec<&'static str> = self
            .session
            .lab()
            .parameters()
            .iter()
            .map(|p| p.name)
            .collect();
        for (name, text) in names.into_iter().zip(&self.panel.fields) {
            if let Err(err) = self.session.set_input(name, text.as_str()) {
                self.panel.notice = Some(Notice::from_error(&err));
                return;
            }
        }

        if action.applies_inputs() {
            if let Err(err) = self.session.apply_inputs() {
                self.panel.notice = Some(Notice::from_error(&err));
                return;
            }
        }

        let outcome = match action {
            PanelAction::Apply => Ok(None),
            PanelAction::Check => self
                .session
                .submit_answer(&self.panel.answer)
                .map(|verdict| Some(Notice::from_verdict(&verdict))),
            PanelAction::Randomize => self
                .session
                .randomize_experiment()
                .map(|_| Some(Notice::info("New experiment generated"))),
            PanelAction::Reveal => self
                .session
                .reveal_answer()
                .map(|params| {
                    Some(Notice::info(format!("True parameters: {}", params.summary())))
                }),
            PanelAction::Reset => self.session.reset().map(|_| {
                self.panel.answer.clear();
                None
            }),
            PanelAction::ToggleClock => {
                self.toggle_clock();
                Ok(self.panel.notice.take())
            }
            PanelAction::Lab(name) => self.session.perform_action(name).map(|_| None),
        };

        match outcome {
            Ok(notice) => self.panel.notice = notice,
            Err(err) => self.panel.notice = Some(Notice::from_error(&err)),
        }
        self.panel.sync_fields(&self.session);
    }

    fn toggle_clock(&mut self) {
        if self.session.visualization().clock().is_running() {
            self.session.stop_clock();
        } else {
            self.session.start_clock();
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let diagram = self.session.render();
        self.camera.fit(diagram.bounds);
        self.renderer.update_camera(&self.ctx.queue, &self.camera);
        let vertex_count = self.renderer.update_diagram(&self.ctx.queue, &diagram);

        // Build egui UI
        let raw_input = self.egui.state.take_egui_input(&self.ctx.window);
        let mut actions = Vec::new();
        let full_output = self.egui.ctx.run(raw_input, |ctx| {
            actions = draw_lab_panel(ctx, &self.session, &mut self.panel);
        });

        self.egui
            .state
            .handle_platform_output(&self.ctx.window, full_output.platform_output);
        let tris = self
            .egui
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui
                .renderer
                .update_texture(&self.ctx.device, &self.ctx.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.ctx.size.width, self.ctx.size.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer.render(&mut encoder, &view, vertex_count);

        self.egui.renderer.update_buffers(
            &self.ctx.device,
            &self.ctx.queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.egui
                .renderer
                .render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui.renderer.free_texture(id);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        // User actions run after the frame, never in the middle of a tick
        for action in actions {
            self.apply(action);
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, state: ElementState) -> bool {
        if state != ElementState::Pressed {
            return false;
        }

        match key {
            KeyCode::Space => self.apply(PanelAction::ToggleClock),
            KeyCode::KeyR => self.apply(PanelAction::Randomize),
            KeyCode::Escape => return true,
            _ => {}
        }
        false
    }

    fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        self.egui.state.on_window_event(&self.ctx.window, event).consumed
    }

    fn close(&mut self) {
        self.session.close();
    }
}

/// Open a window titled `title` and run the lab built by `make_lab` until
/// closed. The lab is built from the environment's [`LabConfig`] after
/// logging is up, so bad `LAB_*` values are reported.
pub fn run<L, F>(title: &str, make_lab: F) -> Result<(), GraphicsError>
where
    L: Lab,
    F: FnOnce(&LabConfig) -> L,
{
    let (ctx, event_loop) = pollster::block_on(GraphicsContext::new(title, 1280, 720))?;
    let config = LabConfig::from_env();
    log::info!(
        "starting {title} ({:?} tick, damping {})",
        config.tick_interval,
        config.damping
    );

    let lab = make_lab(&config);
    let mut app = LabApp::new(ctx, lab, &config);

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { ref event, .. } => {
                let consumed = app.handle_window_event(event);

                match event {
                    WindowEvent::CloseRequested => {
                        app.close();
                        elwt.exit();
                    }
                    WindowEvent::Resized(size) => app.resize(*size),
                    WindowEvent::KeyboardInput {
                        event:
                            KeyEvent {
                                physical_key: PhysicalKey::Code(key),
                                state,
                                ..
                            },
                        ..
                    } if !consumed => {
                        if app.handle_key(*key, *state) {
                            app.close();
                            elwt.exit();
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        app.update(Instant::now());
                        match app.render() {
                            Ok(_) => {}
                            Err(wgpu::SurfaceError::Lost) => app.resize(app.ctx.size),
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                log::error!("GPU out of memory");
                                app.close();
                                elwt.exit();
                            }
                            Err(e) => log::warn!("render error: {e:?}"),
                        }
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                app.ctx.window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}
