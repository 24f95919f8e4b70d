//! Headless model of the product list screen.
//!
//! The store only knows about products. Everything transient (the text typed
//! into the add field, which product a dialog is about, the text typed into the
//! edit dialog) lives here, so the store stays a plain domain object.

use std::collections::BTreeSet;

use serde::Serialize;

use shoplist_core::{AggregateRoot, Event};
use shoplist_products::{ProductId, ProductList, ProductListEvent};

pub const SCREEN_TITLE: &str = "Product list";

/// User intent coming from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenAction {
    // Add field
    SetNewProductName { name: String },
    AddProduct,

    // Delete dialog
    RequestDelete { product_id: ProductId },
    ConfirmDelete,
    CancelDelete,

    // Edit dialog
    RequestEdit { product_id: ProductId },
    SetEditedName { name: String },
    SaveEdit,
    CancelEdit,

    // List gestures
    SwipeDelete { indices: BTreeSet<usize> },
}

impl ScreenAction {
    /// Log-safe action tag (never includes typed text).
    pub fn tag(&self) -> &'static str {
        match self {
            ScreenAction::SetNewProductName { .. } => "SetNewProductName",
            ScreenAction::AddProduct => "AddProduct",
            ScreenAction::RequestDelete { .. } => "RequestDelete",
            ScreenAction::ConfirmDelete => "ConfirmDelete",
            ScreenAction::CancelDelete => "CancelDelete",
            ScreenAction::RequestEdit { .. } => "RequestEdit",
            ScreenAction::SetEditedName { .. } => "SetEditedName",
            ScreenAction::SaveEdit => "SaveEdit",
            ScreenAction::CancelEdit => "CancelEdit",
            ScreenAction::SwipeDelete { .. } => "SwipeDelete",
        }
    }

    /// Actions on the list itself; a modal dialog blocks them.
    fn is_list_action(&self) -> bool {
        matches!(
            self,
            ScreenAction::SetNewProductName { .. }
                | ScreenAction::AddProduct
                | ScreenAction::RequestDelete { .. }
                | ScreenAction::RequestEdit { .. }
                | ScreenAction::SwipeDelete { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Dialog {
    ConfirmDelete { product_id: ProductId, name: String },
    EditName { product_id: ProductId, edited_name: String },
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRow {
    /// Zero-based position, as used by swipe deletion.
    pub index: usize,
    pub product_id: ProductId,
    pub name: String,
}

/// The dialog currently on top of the list, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DialogState {
    ConfirmDelete {
        product_id: ProductId,
        name: String,
        message: String,
    },
    EditName {
        product_id: ProductId,
        edited_name: String,
    },
}

/// Snapshot of everything the presentation layer needs to draw the screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenState {
    pub rev: u64,
    pub title: String,
    pub new_product_name: String,
    pub rows: Vec<ProductRow>,
    pub dialog: Option<DialogState>,
}

pub fn delete_message(name: &str) -> String {
    format!("Are you sure you want to delete \"{name}\"?")
}

/// The product list screen.
///
/// `rev` increases by one for every dispatched action that changed something
/// observable, so a renderer can skip redraws when it did not move.
#[derive(Debug, Clone, Default)]
pub struct ProductListScreen {
    store: ProductList,
    new_product_name: String,
    dialog: Option<Dialog>,
    rev: u64,
}

impl ProductListScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &ProductList {
        &self.store
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    pub fn new_product_name(&self) -> &str {
        &self.new_product_name
    }

    pub fn has_dialog(&self) -> bool {
        self.dialog.is_some()
    }

    /// Apply one user action. Returns whether anything observable changed.
    pub fn dispatch(&mut self, action: ScreenAction) -> bool {
        let tag = action.tag();
        tracing::debug!(action = tag, rev = self.rev, "dispatch");

        if action.is_list_action() && self.dialog.is_some() {
            tracing::debug!(action = tag, "ignored: dialog is open");
            return false;
        }

        let changed = match action {
            ScreenAction::SetNewProductName { name } => {
                if self.new_product_name == name {
                    false
                } else {
                    self.new_product_name = name;
                    true
                }
            }
            ScreenAction::AddProduct => {
                let events = self.store.add(&self.new_product_name);
                self.log_events(&events);
                if events.is_empty() {
                    false
                } else {
                    self.new_product_name.clear();
                    true
                }
            }
            ScreenAction::RequestDelete { product_id } => match self.store.get(product_id) {
                Some(product) => {
                    self.dialog = Some(Dialog::ConfirmDelete {
                        product_id,
                        name: product.name().to_string(),
                    });
                    true
                }
                None => {
                    tracing::debug!(action = tag, %product_id, "ignored: unknown product");
                    false
                }
            },
            ScreenAction::ConfirmDelete => match self.dialog.take() {
                Some(Dialog::ConfirmDelete { product_id, .. }) => {
                    let events = self.store.remove_by_identity(product_id);
                    self.log_events(&events);
                    // Closing the dialog is the change; the product may already be gone.
                    true
                }
                other => self.keep_dialog(other, tag),
            },
            ScreenAction::CancelDelete => match self.dialog.take() {
                Some(Dialog::ConfirmDelete { .. }) => true,
                other => self.keep_dialog(other, tag),
            },
            ScreenAction::RequestEdit { product_id } => match self.store.get(product_id) {
                Some(product) => {
                    self.dialog = Some(Dialog::EditName {
                        product_id,
                        edited_name: product.name().to_string(),
                    });
                    true
                }
                None => {
                    tracing::debug!(action = tag, %product_id, "ignored: unknown product");
                    false
                }
            },
            ScreenAction::SetEditedName { name } => match &mut self.dialog {
                Some(Dialog::EditName { edited_name, .. }) => {
                    if *edited_name == name {
                        false
                    } else {
                        *edited_name = name;
                        true
                    }
                }
                _ => {
                    tracing::debug!(action = tag, "ignored: no edit dialog");
                    false
                }
            },
            ScreenAction::SaveEdit => match self.dialog.take() {
                // The dialog closes either way; a blank name simply keeps the old one.
                Some(Dialog::EditName {
                    product_id,
                    edited_name,
                }) => {
                    let events = self.store.update(product_id, &edited_name);
                    self.log_events(&events);
                    true
                }
                other => self.keep_dialog(other, tag),
            },
            ScreenAction::CancelEdit => match self.dialog.take() {
                Some(Dialog::EditName { .. }) => true,
                other => self.keep_dialog(other, tag),
            },
            ScreenAction::SwipeDelete { indices } => {
                let len = self.store.len();
                let (valid, stale): (BTreeSet<usize>, BTreeSet<usize>) =
                    indices.into_iter().partition(|&index| index < len);
                if !stale.is_empty() {
                    tracing::warn!(?stale, len, "swipe referenced rows that are not on screen");
                }
                let events = self.store.remove_by_indices(&valid);
                self.log_events(&events);
                !events.is_empty()
            }
        };

        if changed {
            self.rev += 1;
        }
        changed
    }

    /// Snapshot for rendering.
    pub fn state(&self) -> ScreenState {
        let rows = self
            .store
            .list()
            .iter()
            .enumerate()
            .map(|(index, product)| ProductRow {
                index,
                product_id: product.id_typed(),
                name: product.name().to_string(),
            })
            .collect();

        let dialog = self.dialog.as_ref().map(|dialog| match dialog {
            Dialog::ConfirmDelete { product_id, name } => DialogState::ConfirmDelete {
                product_id: *product_id,
                name: name.clone(),
                message: delete_message(name),
            },
            Dialog::EditName {
                product_id,
                edited_name,
            } => DialogState::EditName {
                product_id: *product_id,
                edited_name: edited_name.clone(),
            },
        });

        ScreenState {
            rev: self.rev,
            title: SCREEN_TITLE.to_string(),
            new_product_name: self.new_product_name.clone(),
            rows,
            dialog,
        }
    }

    fn log_events(&self, events: &[ProductListEvent]) {
        for event in events {
            tracing::debug!(
                event_type = event.event_type(),
                store_version = self.store.version(),
                "store event"
            );
        }
    }

    fn keep_dialog(&mut self, dialog: Option<Dialog>, tag: &'static str) -> bool {
        tracing::debug!(action = tag, "ignored: no matching dialog");
        self.dialog = dialog;
        false
    }
}
