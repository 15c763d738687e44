//! Application shell: navigation bar and page switching.

use crate::config::AppConfig;
use crate::designer::DesignerPage;
use crate::theme;
use crate::users_page::UsersPage;
use egui::{Context, RichText};

/// Top-level pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Users,
    Design,
}

impl Page {
    pub const ALL: [Page; 2] = [Page::Users, Page::Design];

    pub fn label(self) -> &'static str {
        match self {
            Page::Users => "Users",
            Page::Design => "T-Shirt Design",
        }
    }
}

/// Actions triggered from the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Navigate(Page),
}

/// The Teeprint desktop application.
pub struct TeeprintApp {
    page: Page,
    users: UsersPage,
    designer: DesignerPage,
}

impl TeeprintApp {
    pub fn new(ctx: &Context, config: &AppConfig) -> Self {
        ctx.set_visuals(egui::Visuals::light());
        Self {
            page: Page::default(),
            users: UsersPage::new(&config.api_url),
            designer: DesignerPage::new(config),
        }
    }

    /// Open the window and run until it is closed.
    pub fn run(config: AppConfig) -> eframe::Result {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_title(config.title.clone())
                .with_inner_size([config.width as f32, config.height as f32])
                .with_drag_and_drop(true),
            renderer: eframe::Renderer::Wgpu,
            ..Default::default()
        };
        let title = config.title.clone();
        eframe::run_native(
            &title,
            options,
            Box::new(move |cc| Ok(Box::new(TeeprintApp::new(&cc.egui_ctx, &config)))),
        )
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::Navigate(page) => {
                if self.page != page {
                    log::debug!("Switching to {:?}", page);
                    if self.page == Page::Design {
                        self.designer.cancel_interaction();
                    }
                    self.page = page;
                }
            }
        }
    }

    fn navbar(&self, ctx: &Context) -> Option<UiAction> {
        let mut action = None;
        egui::TopBottomPanel::top("navbar")
            .frame(theme::navbar_frame())
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Teeprint").strong().size(18.0).color(theme::TEXT));
                    ui.add_space(24.0);
                    for page in Page::ALL {
                        let text = RichText::new(page.label()).size(15.0);
                        if ui.selectable_label(self.page == page, text).clicked() {
                            action = Some(UiAction::Navigate(page));
                        }
                    }
                });
            });
        action
    }
}

impl eframe::App for TeeprintApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        if let Some(action) = self.navbar(ctx) {
            self.apply(action);
        }
        match self.page {
            Page::Users => self.users.show(ctx),
            Page::Design => self.designer.show(ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation() {
        let ctx = Context::default();
        let mut app = TeeprintApp::new(&ctx, &AppConfig::default());
        assert_eq!(app.page(), Page::Users);

        app.apply(UiAction::Navigate(Page::Design));
        assert_eq!(app.page(), Page::Design);
        assert_eq!(Page::Design.label(), "T-Shirt Design");
    }
}
