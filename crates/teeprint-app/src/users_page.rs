//! Users page: searchable, sortable, paginated listing.

use crate::theme;
use egui::{Button, Checkbox, Context, RichText, TextEdit, Ui};
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};
use teeprint_core::users::{PAGE_SIZES, SEARCH_DEBOUNCE, SortField, UserPage, UserQuery, UserTable};
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Listing fetch errors.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Server returned status {0}")]
    Status(u16),
    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// Blocking client for the users listing endpoint.
#[derive(Debug)]
pub struct UserClient {
    http: reqwest::blocking::Client,
    url: String,
}

impl UserClient {
    pub fn new(url: impl Into<String>) -> Result<Self, FetchError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch one page. Blocks; call from a worker thread.
    pub fn fetch(&self, query: &UserQuery) -> Result<UserPage, FetchError> {
        let response = self
            .http
            .get(&self.url)
            .query(&query.query_pairs())
            .send()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .json::<UserPage>()
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

type FetchResult = Result<UserPage, FetchError>;

/// State of the users page.
pub struct UsersPage {
    table: UserTable,
    client: Option<Arc<UserClient>>,
    /// In-flight fetch. Replaced (and its result dropped) when a newer one starts.
    pending: Option<mpsc::Receiver<FetchResult>>,
    loaded: bool,
    error: Option<String>,
}

impl UsersPage {
    pub fn new(api_url: &str) -> Self {
        let (client, error) = match UserClient::new(api_url) {
            Ok(client) => (Some(Arc::new(client)), None),
            Err(e) => {
                log::error!("{}", e);
                (None, Some(e.to_string()))
            }
        };
        Self {
            table: UserTable::new(),
            client,
            pending: None,
            loaded: false,
            error,
        }
    }

    pub fn table(&self) -> &UserTable {
        &self.table
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    fn start_fetch(&mut self, ctx: &Context) {
        let Some(client) = self.client.clone() else {
            return;
        };
        let query = self.table.query();
        log::debug!("Fetching users {:?}", query);

        let (tx, rx) = mpsc::channel();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let result = client.fetch(&query);
            // The receiver is gone when a newer fetch superseded this one.
            let _ = tx.send(result);
            ctx.request_repaint();
        });
        self.pending = Some(rx);
    }

    fn poll_fetch(&mut self) {
        let Some(rx) = &self.pending else {
            return;
        };
        match rx.try_recv() {
            Ok(result) => {
                self.pending = None;
                self.apply_result(result);
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                self.pending = None;
                self.apply_result(Err(FetchError::Request("worker stopped".to_string())));
            }
        }
    }

    fn apply_result(&mut self, result: FetchResult) {
        match result {
            Ok(page) => {
                self.error = None;
                self.table.apply_page(page);
            }
            Err(e) => {
                log::error!("Error fetching data: {}", e);
                self.error = Some(e.to_string());
                self.table.apply_failure();
            }
        }
    }

    pub fn show(&mut self, ctx: &Context) {
        self.poll_fetch();

        let now = Instant::now();
        if !self.loaded {
            self.loaded = true;
            self.start_fetch(ctx);
        } else if self.table.take_due_fetch(now) {
            self.start_fetch(ctx);
        } else if self.table.is_dirty() {
            ctx.request_repaint_after(SEARCH_DEBOUNCE);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Users");
            ui.add_space(8.0);
            theme::panel_frame().show(ui, |ui| {
                self.toolbar_ui(ui, now);
                ui.separator();
                self.table_ui(ui);
                ui.separator();
                self.footer_ui(ui, now);
            });
        });
    }

    fn toolbar_ui(&mut self, ui: &mut Ui, now: Instant) {
        ui.horizontal(|ui| {
            let mut search = self.table.search.clone();
            let edit = TextEdit::singleline(&mut search)
                .hint_text("Search...")
                .desired_width(280.0);
            if ui.add(edit).changed() {
                self.table.set_search(search, now);
            }
            if self.is_loading() {
                ui.spinner();
            }
            let selected = self.table.selected_count();
            if selected > 0 {
                ui.label(RichText::new(format!("{} selected", selected)).color(theme::TEXT_MUTED));
            }
        });
        if let Some(error) = &self.error {
            ui.label(RichText::new(error).color(theme::ERROR));
        }
    }

    fn table_ui(&mut self, ui: &mut Ui) {
        egui::ScrollArea::vertical()
            .max_height((ui.available_height() - 48.0).max(120.0))
            .show(ui, |ui| {
                egui::Grid::new("users_table")
                    .num_columns(4)
                    .striped(true)
                    .spacing([24.0, 8.0])
                    .min_col_width(40.0)
                    .show(ui, |ui| {
                        let mut all = self.table.all_selected();
                        if ui.add(Checkbox::without_text(&mut all)).changed() {
                            self.table.select_all(all);
                        }
                        for field in [SortField::Name, SortField::Email, SortField::CreatedAt] {
                            let label = format!("{} {}", field.label(), self.table.sort_indicator(field));
                            if ui.add(Button::new(RichText::new(label).strong()).frame(false)).clicked() {
                                self.table.toggle_sort(field);
                            }
                        }
                        ui.end_row();

                        let rows: Vec<(u64, String, String, String)> = self
                            .table
                            .rows()
                            .iter()
                            .map(|u| (u.id, u.name.clone(), u.email.clone(), u.created_date().to_string()))
                            .collect();
                        for (id, name, email, created) in rows {
                            let mut selected = self.table.is_selected(id);
                            if ui.add(Checkbox::without_text(&mut selected)).changed() {
                                self.table.set_selected(id, selected);
                            }
                            ui.label(RichText::new(name).color(theme::TEXT));
                            ui.label(RichText::new(email).color(theme::TEXT));
                            ui.label(RichText::new(created).color(theme::TEXT_MUTED));
                            ui.end_row();
                        }
                    });
            });
    }

    fn footer_ui(&mut self, ui: &mut Ui, now: Instant) {
        ui.horizontal(|ui| {
            ui.label("Rows per page:");
            let mut per_page = self.table.per_page;
            egui::ComboBox::from_id_salt("rows_per_page")
                .selected_text(per_page.to_string())
                .width(60.0)
                .show_ui(ui, |ui| {
                    for size in PAGE_SIZES {
                        ui.selectable_value(&mut per_page, size, size.to_string());
                    }
                });
            self.table.set_per_page(per_page, now);

            ui.label(self.table.range_label());

            if ui.add_enabled(self.table.can_go_prev(), Button::new("<")).clicked() {
                self.table.prev_page(now);
            }
            if ui.add_enabled(self.table.can_go_next(), Button::new(">")).clicked() {
                self.table.next_page(now);
            }
        });
    }
}
