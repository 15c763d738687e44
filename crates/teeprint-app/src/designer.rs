//! T-shirt design page: template preview, logo overlay, export.

use crate::config::AppConfig;
use crate::theme;
use egui::{
    Align2, Color32, ColorImage, Context, CursorIcon, FontId, Frame, Margin, Pos2, Response,
    RichText, Sense, Stroke, StrokeKind, TextureHandle, TextureOptions, Ui,
};
use std::path::Path;
use std::sync::{Arc, mpsc};
use teeprint_core::geometry::to_local;
use teeprint_core::input::{MouseButton, PointerEvent};
use teeprint_core::interaction::{
    HANDLE_SIZE, InteractionController, InteractionMode, preview_printable_rect,
};
use teeprint_core::overlay::DragKind;
use teeprint_render::{ExportResult, Exporter, FileSource, LogoUpload, UploadFile, handle_file};

/// Preview used until the design area has been laid out once.
const FALLBACK_PREVIEW: kurbo::Rect = kurbo::Rect::new(0.0, 0.0, 600.0, 800.0);

/// Width of the controls side panel.
const CONTROLS_WIDTH: f32 = 280.0;

const FULL_UV: egui::Rect = egui::Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(1.0, 1.0));

pub fn to_kurbo_rect(rect: egui::Rect) -> kurbo::Rect {
    kurbo::Rect::new(
        rect.min.x as f64,
        rect.min.y as f64,
        rect.max.x as f64,
        rect.max.y as f64,
    )
}

pub fn to_kurbo_point(pos: Pos2) -> kurbo::Point {
    kurbo::Point::new(pos.x as f64, pos.y as f64)
}

/// Convert a rectangle local to a surface at `origin` into screen space.
pub fn local_to_screen(rect: kurbo::Rect, origin: Pos2) -> egui::Rect {
    egui::Rect::from_min_max(
        origin + egui::vec2(rect.x0 as f32, rect.y0 as f32),
        origin + egui::vec2(rect.x1 as f32, rect.y1 as f32),
    )
}

/// Largest rectangle of aspect `aspect` (width / height) centred in `available`.
pub fn design_area(available: egui::Rect, aspect: f32) -> egui::Rect {
    let width = available.width().min(available.height() * aspect).max(0.0);
    egui::Rect::from_center_size(available.center(), egui::vec2(width, width / aspect))
}

/// Scale `content` to fit inside `bounds` keeping its aspect ratio ("contain").
pub fn contain(content: egui::Vec2, bounds: egui::Rect) -> egui::Rect {
    if content.x <= 0.0 || content.y <= 0.0 {
        return bounds;
    }
    let scale = (bounds.width() / content.x).min(bounds.height() / content.y);
    egui::Rect::from_center_size(bounds.center(), content * scale)
}

/// Turn a dropped file into an upload. Returns `None` when it has no readable contents.
pub fn upload_from_drop(file: &egui::DroppedFile) -> Option<UploadFile> {
    let name = if file.name.is_empty() {
        file.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    } else {
        file.name.clone()
    };

    let bytes = match (&file.bytes, &file.path) {
        (Some(bytes), _) => bytes.to_vec(),
        (None, Some(path)) => match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::error!("Failed to read dropped file {:?}: {}", path, e);
                return None;
            }
        },
        (None, None) => return None,
    };

    let mime = (!file.mime.is_empty()).then(|| file.mime.clone());
    Some(UploadFile::new(name, mime, bytes))
}

fn color_image(image: &image::DynamicImage) -> ColorImage {
    let rgba = image.to_rgba8();
    ColorImage::from_rgba_unmultiplied(
        [rgba.width() as usize, rgba.height() as usize],
        rgba.as_raw(),
    )
}

struct TemplateTexture {
    texture: TextureHandle,
    size: egui::Vec2,
}

enum Status {
    Info(String),
    Error(String),
}

/// State of the design page.
pub struct DesignerPage {
    controller: InteractionController,
    logo: Option<LogoUpload>,
    logo_texture: Option<TextureHandle>,
    template: Option<TemplateTexture>,
    template_loaded: bool,
    template_source: FileSource,
    exporter: Arc<Exporter>,
    export_rx: Option<mpsc::Receiver<ExportResult<Option<Vec<u8>>>>>,
    /// Screen rectangle of the design area from the last frame.
    preview: kurbo::Rect,
    design_aspect: f32,
    export_file_name: String,
    status: Option<Status>,
}

impl DesignerPage {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            controller: InteractionController::new(),
            logo: None,
            logo_texture: None,
            template: None,
            template_loaded: false,
            template_source: FileSource::new(&config.template_path),
            exporter: Arc::new(Exporter::default()),
            export_rx: None,
            preview: FALLBACK_PREVIEW,
            design_aspect: config.design_aspect,
            export_file_name: config.export_file_name.clone(),
            status: None,
        }
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn has_logo(&self) -> bool {
        self.logo.is_some()
    }

    pub fn is_exporting(&self) -> bool {
        self.export_rx.is_some() || self.exporter.is_busy()
    }

    pub fn can_export(&self) -> bool {
        self.has_logo() && !self.is_exporting()
    }

    pub fn show(&mut self, ctx: &Context) {
        self.ensure_template(ctx);
        self.poll_export();
        self.handle_dropped_files(ctx);

        egui::SidePanel::right("design_controls")
            .resizable(false)
            .exact_width(CONTROLS_WIDTH)
            .show(ctx, |ui| self.controls_ui(ctx, ui));

        egui::CentralPanel::default()
            .frame(Frame::new().fill(Color32::WHITE).inner_margin(Margin::same(16)))
            .show(ctx, |ui| self.design_ui(ui));
    }

    fn ensure_template(&mut self, ctx: &Context) {
        if self.template_loaded {
            return;
        }
        self.template_loaded = true;
        let path = self.template_source.path();
        match image::open(path) {
            Ok(image) => {
                let size = egui::vec2(image.width() as f32, image.height() as f32);
                let texture = ctx.load_texture("tshirt-template", color_image(&image), TextureOptions::LINEAR);
                self.template = Some(TemplateTexture { texture, size });
                log::info!("Loaded template {:?}", path);
            }
            Err(e) => log::warn!("Failed to load template {:?}: {}", path, e),
        }
    }

    fn handle_dropped_files(&mut self, ctx: &Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        // Single-logo model: only the first dropped file is considered.
        if let Some(file) = dropped.first().and_then(upload_from_drop) {
            self.accept_upload(ctx, file);
        }
    }

    /// Install an uploaded logo. Non-image files are ignored.
    pub fn accept_upload(&mut self, ctx: &Context, file: UploadFile) {
        match handle_file(file) {
            Ok(Some(upload)) => {
                self.logo_texture = Some(ctx.load_texture("logo", color_image(&upload.image), TextureOptions::LINEAR));
                self.controller.set_overlay(upload.overlay(), self.preview);
                self.logo = Some(upload);
                self.status = None;
            }
            Ok(None) => {}
            Err(e) => {
                log::error!("{}", e);
                self.status = Some(Status::Error(e.to_string()));
            }
        }
    }

    /// End any drag in progress, e.g. when navigating away.
    pub fn cancel_interaction(&mut self) {
        self.controller
            .handle_pointer_event(PointerEvent::Leave, self.preview);
    }

    fn remove_logo(&mut self) {
        self.controller.clear();
        self.logo = None;
        self.logo_texture = None;
    }

    fn start_export(&mut self, ctx: &Context) {
        let (Some(logo), Some(overlay)) = (self.logo.as_ref(), self.controller.overlay().copied()) else {
            return;
        };
        let exporter = Arc::clone(&self.exporter);
        let template = self.template_source.clone();
        let logo = logo.source();
        let preview = self.preview.size();

        let (tx, rx) = mpsc::channel();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let result = pollster::block_on(exporter.export(Some(&overlay), preview, &template, &logo));
            let _ = tx.send(result);
            ctx.request_repaint();
        });
        self.export_rx = Some(rx);
        self.status = Some(Status::Info("Exporting...".to_string()));
    }

    fn poll_export(&mut self) {
        let Some(rx) = &self.export_rx else {
            return;
        };
        match rx.try_recv() {
            Ok(result) => {
                self.export_rx = None;
                self.finish_export(result);
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                self.export_rx = None;
                self.status = Some(Status::Error("Export worker stopped".to_string()));
            }
        }
    }

    fn finish_export(&mut self, result: ExportResult<Option<Vec<u8>>>) {
        match result {
            Ok(Some(png)) => {
                #[cfg(feature = "native")]
                crate::file_ops::export_png(&png, &self.export_file_name);
                self.status = Some(Status::Info(format!(
                    "Exported {} ({} KB)",
                    self.export_file_name,
                    png.len() / 1024
                )));
            }
            Ok(None) => self.status = None,
            Err(e) => {
                log::error!("Export failed: {}", e);
                self.status = Some(Status::Error(format!("Export failed: {}", e)));
            }
        }
    }

    fn controls_ui(&mut self, ctx: &Context, ui: &mut Ui) {
        ui.add_space(12.0);
        ui.heading("Logo");
        ui.add_space(8.0);

        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());
        let (fill, stroke) = if hovering {
            (theme::SELECTED_BG, theme::ACCENT)
        } else {
            (theme::PANEL_BG, theme::BORDER)
        };
        Frame::new()
            .fill(fill)
            .stroke(Stroke::new(1.5, stroke))
            .corner_radius(theme::PANEL_RADIUS)
            .inner_margin(Margin::same(16))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("Drop an image here").color(theme::TEXT));
                    #[cfg(feature = "native")]
                    if ui.button("Browse...").clicked() {
                        if let Some(path) = crate::file_ops::pick_logo() {
                            match UploadFile::from_path(&path) {
                                Ok(file) => self.accept_upload(ctx, file),
                                Err(e) => {
                                    log::error!("{}", e);
                                    self.status = Some(Status::Error(e.to_string()));
                                }
                            }
                        }
                    }
                });
            });

        if let Some(logo) = &self.logo {
            ui.add_space(8.0);
            ui.label(
                RichText::new(format!(
                    "{} ({}×{})",
                    logo.name, logo.natural_size.width, logo.natural_size.height
                ))
                .color(theme::TEXT_MUTED),
            );
            if ui.button("Remove logo").clicked() {
                self.remove_logo();
            }
        }

        ui.add_space(16.0);
        let export_button = egui::Button::new(RichText::new("Export Design").strong())
            .min_size(egui::vec2(ui.available_width(), 32.0));
        if ui.add_enabled(self.can_export(), export_button).clicked() {
            self.start_export(ctx);
        }
        if self.export_rx.is_some() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Rendering 2000×2000 PNG");
            });
        }

        match &self.status {
            Some(Status::Info(text)) => {
                ui.label(RichText::new(text).color(theme::TEXT_MUTED));
            }
            Some(Status::Error(text)) => {
                ui.label(RichText::new(text).color(theme::ERROR));
            }
            None => {}
        }
    }

    fn design_ui(&mut self, ui: &mut Ui) {
        let screen = design_area(ui.available_rect_before_wrap(), self.design_aspect);
        let response = ui.allocate_rect(screen, Sense::drag());
        let preview = to_kurbo_rect(screen);
        self.preview = preview;
        self.controller.settle(preview);
        self.handle_pointer(ui.ctx(), &response, screen);

        let painter = ui.painter_at(screen);
        painter.rect_filled(screen, 8.0, theme::SURFACE_BG);
        match &self.template {
            Some(template) => {
                painter.image(template.texture.id(), contain(template.size, screen), FULL_UV, Color32::WHITE);
            }
            None => {
                painter.text(
                    screen.center(),
                    Align2::CENTER_CENTER,
                    "Template not found",
                    FontId::proportional(14.0),
                    theme::TEXT_MUTED,
                );
            }
        }

        let printable = local_to_screen(preview_printable_rect(preview), screen.min);
        painter.rect_stroke(printable, 0.0, Stroke::new(1.0, theme::BORDER), StrokeKind::Inside);

        if let (Some(overlay), Some(texture)) = (self.controller.overlay(), &self.logo_texture) {
            let bounds = local_to_screen(overlay.bounds(), screen.min);
            painter.image(texture.id(), bounds, FULL_UV, Color32::WHITE);
            if !self.controller.is_idle() {
                painter.rect_stroke(bounds, 0.0, Stroke::new(1.0, theme::ACCENT), StrokeKind::Outside);
            }
            if let Some(handle) = self.controller.resize_handle() {
                let center = screen.min + egui::vec2(handle.x as f32, handle.y as f32);
                painter.circle(center, HANDLE_SIZE as f32 / 2.0, theme::ACCENT, Stroke::new(2.0, Color32::WHITE));
            }
        }
    }

    /// Feed the design surface's pointer activity to the controller.
    fn handle_pointer(&mut self, ctx: &Context, response: &Response, screen: egui::Rect) {
        let preview = to_kurbo_rect(screen);
        let primary = egui::PointerButton::Primary;

        if response.drag_started_by(primary) {
            let origin = ctx
                .input(|i| i.pointer.press_origin())
                .or(response.interact_pointer_pos());
            if let Some(pos) = origin {
                self.controller.handle_pointer_event(
                    PointerEvent::Down {
                        position: to_kurbo_point(pos),
                        button: MouseButton::Primary,
                    },
                    preview,
                );
            }
        }

        if response.dragged_by(primary) && !self.controller.is_idle() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.controller.handle_pointer_event(
                    PointerEvent::Move {
                        position: to_kurbo_point(pos),
                    },
                    preview,
                );
            }
        }

        if response.drag_stopped_by(primary) {
            let position = response
                .interact_pointer_pos()
                .map(to_kurbo_point)
                .unwrap_or_default();
            self.controller.handle_pointer_event(
                PointerEvent::Up {
                    position,
                    button: MouseButton::Primary,
                },
                preview,
            );
        }

        if !self.controller.is_idle() {
            let inside = ctx
                .input(|i| i.pointer.latest_pos())
                .is_some_and(|pos| screen.contains(pos));
            if !inside {
                self.controller.handle_pointer_event(PointerEvent::Leave, preview);
            }
        }

        if let Some(hover) = response.hover_pos() {
            let icon = match self.controller.mode() {
                InteractionMode::Resizing => Some(CursorIcon::ResizeNwSe),
                InteractionMode::Dragging => Some(CursorIcon::Grabbing),
                InteractionMode::Idle => {
                    match self.controller.hit_test(to_local(to_kurbo_point(hover), preview)) {
                        Some(DragKind::Resize) => Some(CursorIcon::ResizeNwSe),
                        Some(DragKind::Move) => Some(CursorIcon::Grab),
                        None => None,
                    }
                }
            };
            if let Some(icon) = icon {
                ctx.set_cursor_icon(icon);
            }
        }
    }
}
