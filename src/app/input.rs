#[cfg(test)]
#[path = "input_test.rs"]
mod tests;

/// A line typed by the user. Chat numbers are typed starting at 1 and
/// converted to list indices here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Empty,
    Submit(String),
    NewChat,
    List,
    Load(usize),
    Delete(usize),
    Help,
    Quit,
    Invalid(String),
}

pub const HELP: &str = r#"Type a message and press Enter to send it.
Commands:
    /new          start a new chat
    /list         show saved chats
    /load <n>     open saved chat n
    /delete <n>   delete saved chat n
    /help         show this help
    /quit         save and exit"#;

impl Input {
    pub fn parse(line: &str) -> Input {
        let line = line.trim();
        if line.is_empty() {
            return Input::Empty;
        }

        let Some(command) = line.strip_prefix('/') else {
            return Input::Submit(line.to_string());
        };

        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();

        match (name, arg) {
            ("new", None) => Input::NewChat,
            ("list", None) => Input::List,
            ("help", None) => Input::Help,
            ("quit" | "exit", None) => Input::Quit,
            ("load", Some(arg)) => parse_chat_number(arg).map_or_else(Input::Invalid, Input::Load),
            ("delete", Some(arg)) => {
                parse_chat_number(arg).map_or_else(Input::Invalid, Input::Delete)
            }
            ("load" | "delete", None) => Input::Invalid(format!("/{} needs a chat number", name)),
            _ => Input::Invalid(format!("unknown command: {}", line)),
        }
    }
}

fn parse_chat_number(arg: &str) -> Result<usize, String> {
    arg.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .ok_or_else(|| format!("invalid chat number: {}", arg))
}
