//! Plain-text rendering of a [`ScreenState`].

use crate::screen::{DialogState, ScreenState};

/// Render the whole screen: title, add field, numbered rows, open dialog.
///
/// Row numbers are 1-based; the terminal commands address rows by them.
pub fn render(state: &ScreenState) -> String {
    let mut lines = vec![format!("== {} ==", state.title)];

    lines.push(format!("new product: [{}]", state.new_product_name));

    if state.rows.is_empty() {
        lines.push("  (no products)".to_string());
    } else {
        lines.extend(
            state
                .rows
                .iter()
                .map(|row| format!("  {:>2}. {}", row.index + 1, row.name)),
        );
    }

    if let Some(dialog) = &state.dialog {
        lines.push(String::new());
        lines.extend(render_dialog(dialog));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn render_dialog(dialog: &DialogState) -> Vec<String> {
    match dialog {
        DialogState::ConfirmDelete { message, .. } => vec![
            "-- Confirm deletion --".to_string(),
            message.clone(),
            "(yes = delete, cancel = keep)".to_string(),
        ],
        DialogState::EditName { edited_name, .. } => vec![
            "-- Edit product --".to_string(),
            format!("new name: [{edited_name}]"),
            "(name <text> = change, save, cancel)".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::{ProductListScreen, ScreenAction};

    #[test]
    fn renders_empty_screen() {
        let out = render(&ProductListScreen::new().state());
        assert_eq!(out, "== Product list ==\nnew product: []\n  (no products)\n");
    }

    #[test]
    fn renders_rows_and_delete_dialog() {
        let mut screen = ProductListScreen::new();
        screen.dispatch(ScreenAction::SetNewProductName {
            name: "Milk".to_string(),
        });
        screen.dispatch(ScreenAction::AddProduct);
        let product_id = screen.store().list()[0].id_typed();
        screen.dispatch(ScreenAction::RequestDelete { product_id });

        let out = render(&screen.state());

        assert!(out.contains("   1. Milk\n"));
        assert!(out.contains("Are you sure you want to delete \"Milk\"?"));
    }
}
