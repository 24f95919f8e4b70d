//! Line-in, text-out driver around [`ProductListScreen`].

use crate::command::{self, HELP, Input};
use crate::render::render;
use crate::screen::ProductListScreen;

/// What to print after one input line, and whether to stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub output: String,
    pub quit: bool,
}

impl Reply {
    fn show(output: String) -> Self {
        Self {
            output,
            quit: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct Shell {
    screen: ProductListScreen,
}

impl Shell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> &ProductListScreen {
        &self.screen
    }

    /// Initial screen, printed before the first prompt.
    pub fn banner(&self) -> String {
        format!("{}(type `help` for commands)\n", render(&self.screen.state()))
    }

    pub fn handle_line(&mut self, line: &str) -> anyhow::Result<Reply> {
        if line.trim().is_empty() {
            return Ok(Reply::show(String::new()));
        }

        let input = match command::parse(line) {
            Ok(input) => input,
            Err(e) => return Ok(Reply::show(format!("error: {e}\n"))),
        };

        match input {
            Input::Quit => {
                return Ok(Reply {
                    output: String::new(),
                    quit: true,
                });
            }
            Input::Help => return Ok(Reply::show(HELP.to_string())),
            Input::Json => {
                let mut json = serde_json::to_string_pretty(&self.screen.state())?;
                json.push('\n');
                return Ok(Reply::show(json));
            }
            _ => {}
        }

        let actions = match input.into_actions(&self.screen.state()) {
            Ok(actions) => actions,
            Err(e) => return Ok(Reply::show(format!("error: {e}\n"))),
        };
        for action in actions {
            self.screen.dispatch(action);
        }

        Ok(Reply::show(render(&self.screen.state())))
    }
}
