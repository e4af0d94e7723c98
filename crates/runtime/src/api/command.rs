use puzzle_core::InputType;

/// Token accepted by [`Runtime::send_input`](crate::Runtime::send_input).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum InputCommand {
    Up,
    Down,
    Left,
    Right,
    Action,
    Undo,
    Restart,
}

impl InputCommand {
    /// The turn input this token stands for; `None` for undo and restart.
    pub fn input(self) -> Option<InputType> {
        match self {
            InputCommand::Up => Some(InputType::Up),
            InputCommand::Down => Some(InputType::Down),
            InputCommand::Left => Some(InputType::Left),
            InputCommand::Right => Some(InputType::Right),
            InputCommand::Action => Some(InputType::Action),
            InputCommand::Undo | InputCommand::Restart => None,
        }
    }
}

impl From<InputType> for InputCommand {
    fn from(input: InputType) -> Self {
        match input {
            InputType::Up => InputCommand::Up,
            InputType::Down => InputCommand::Down,
            InputType::Left => InputCommand::Left,
            InputType::Right => InputCommand::Right,
            InputType::Action => InputCommand::Action,
        }
    }
}
