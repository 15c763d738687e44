//! Teeprint Application
//!
//! The desktop shell: a users admin page backed by the listing proxy and the
//! t-shirt designer built on `teeprint-core` and `teeprint-render`.

mod app;
mod config;
mod designer;
#[cfg(feature = "native")]
mod file_ops;
mod theme;
mod users_page;

pub use app::{Page, TeeprintApp, UiAction};
pub use config::AppConfig;
pub use designer::DesignerPage;
pub use users_page::{FetchError, UserClient, UsersPage};
