//! `shoplist-app`
//!
//! **Responsibility:** the single product-list screen, minus the pixels.
//!
//! - [`screen`]: headless screen model owning the draft input and the open
//!   dialog, driving the product list store.
//! - [`render`]: plain-text rendering of a screen snapshot.
//! - [`command`]: terminal input parsing.
//! - [`shell`]: line-in, text-out loop used by the `shoplist` binary.
//! - [`config`]: environment-driven start-up settings.

pub mod command;
pub mod config;
pub mod render;
pub mod screen;
pub mod shell;

pub use command::Input;
pub use config::AppConfig;
pub use screen::{DialogState, ProductListScreen, ProductRow, ScreenAction, ScreenState};
pub use shell::{Reply, Shell};
