//! Terminal input parsing.
//!
//! Rows are addressed by the 1-based numbers shown by [`crate::render`].

use std::collections::BTreeSet;

use shoplist_core::{DomainError, DomainResult};
use shoplist_products::ProductId;

use crate::screen::{DialogState, ScreenAction, ScreenState};

pub const HELP: &str = "\
commands:
  add <name>        add a product
  edit <row>        open the edit dialog for a row
  delete <row>      ask to delete a row
  swipe <row>...    delete rows right away
  name <text>       type into the edit dialog
  save              save the edit dialog
  yes               confirm deletion
  cancel            close the open dialog
  list              show the screen
  json              show the screen as JSON
  help              show this text
  quit              exit
";

/// One parsed line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Add(String),
    Edit(usize),
    Delete(usize),
    Swipe(BTreeSet<usize>),
    Name(String),
    Save,
    Yes,
    Cancel,
    List,
    Json,
    Help,
    Quit,
}

/// Parse one line. Text arguments are passed through untrimmed; the store
/// does its own trimming.
pub fn parse(line: &str) -> DomainResult<Input> {
    let line = line.trim_start();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest),
        None => (line.trim_end(), ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "add" => Ok(Input::Add(rest.to_string())),
        "name" => Ok(Input::Name(rest.to_string())),
        "edit" => Ok(Input::Edit(single_row(word, rest)?)),
        "delete" => Ok(Input::Delete(single_row(word, rest)?)),
        "swipe" => {
            let rows = rest
                .split_whitespace()
                .map(parse_row)
                .collect::<DomainResult<BTreeSet<usize>>>()?;
            if rows.is_empty() {
                return Err(DomainError::invalid_command("swipe needs at least one row"));
            }
            Ok(Input::Swipe(rows))
        }
        "save" => no_args(word, rest, Input::Save),
        "yes" => no_args(word, rest, Input::Yes),
        "cancel" => no_args(word, rest, Input::Cancel),
        "list" => no_args(word, rest, Input::List),
        "json" => no_args(word, rest, Input::Json),
        "help" => no_args(word, rest, Input::Help),
        "quit" | "exit" => no_args(word, rest, Input::Quit),
        "" => Err(DomainError::invalid_command("empty input")),
        other => Err(DomainError::invalid_command(format!(
            "unknown command `{other}` (try `help`)"
        ))),
    }
}

fn no_args(word: &str, rest: &str, input: Input) -> DomainResult<Input> {
    if rest.trim().is_empty() {
        Ok(input)
    } else {
        Err(DomainError::invalid_command(format!("`{word}` takes no arguments")))
    }
}

fn single_row(word: &str, rest: &str) -> DomainResult<usize> {
    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(row), None) => parse_row(row),
        _ => Err(DomainError::invalid_command(format!("`{word}` takes one row number"))),
    }
}

fn parse_row(text: &str) -> DomainResult<usize> {
    match text.parse::<usize>() {
        Ok(row) if row > 0 => Ok(row),
        _ => Err(DomainError::invalid_command(format!("`{text}` is not a row number"))),
    }
}

impl Input {
    /// Translate into screen actions against what is currently on screen.
    ///
    /// Frontend-only inputs (`list`, `json`, `help`, `quit`) yield no actions.
    pub fn into_actions(self, state: &ScreenState) -> DomainResult<Vec<ScreenAction>> {
        let actions = match self {
            Input::Add(name) => vec![
                ScreenAction::SetNewProductName { name },
                ScreenAction::AddProduct,
            ],
            Input::Edit(row) => vec![ScreenAction::RequestEdit {
                product_id: row_product(state, row)?,
            }],
            Input::Delete(row) => vec![ScreenAction::RequestDelete {
                product_id: row_product(state, row)?,
            }],
            Input::Swipe(rows) => {
                for &row in &rows {
                    row_product(state, row)?;
                }
                vec![ScreenAction::SwipeDelete {
                    indices: rows.into_iter().map(|row| row - 1).collect(),
                }]
            }
            Input::Name(name) => {
                require_edit_dialog(state)?;
                vec![ScreenAction::SetEditedName { name }]
            }
            Input::Save => {
                require_edit_dialog(state)?;
                vec![ScreenAction::SaveEdit]
            }
            Input::Yes => match state.dialog {
                Some(DialogState::ConfirmDelete { .. }) => vec![ScreenAction::ConfirmDelete],
                _ => return Err(DomainError::invalid_command("nothing to confirm")),
            },
            Input::Cancel => match state.dialog {
                Some(DialogState::ConfirmDelete { .. }) => vec![ScreenAction::CancelDelete],
                Some(DialogState::EditName { .. }) => vec![ScreenAction::CancelEdit],
                None => return Err(DomainError::invalid_command("nothing to cancel")),
            },
            Input::List | Input::Json | Input::Help | Input::Quit => Vec::new(),
        };
        Ok(actions)
    }
}

fn row_product(state: &ScreenState, row: usize) -> DomainResult<ProductId> {
    row.checked_sub(1)
        .and_then(|index| state.rows.get(index))
        .map(|r| r.product_id)
        .ok_or_else(|| DomainError::invalid_command(format!("no row {row}")))
}

fn require_edit_dialog(state: &ScreenState) -> DomainResult<()> {
    match state.dialog {
        Some(DialogState::EditName { .. }) => Ok(()),
        _ => Err(DomainError::invalid_command("no edit dialog is open")),
    }
}
