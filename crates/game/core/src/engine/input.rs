use crate::state::Movement;

/// Player input that drives a turn.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum InputType {
    Up,
    Down,
    Left,
    Right,
    Action,
}

impl InputType {
    pub const ALL: [InputType; 5] = [
        InputType::Up,
        InputType::Down,
        InputType::Left,
        InputType::Right,
        InputType::Action,
    ];

    /// Intent given to every player object.
    pub fn movement(self) -> Movement {
        match self {
            InputType::Up => Movement::Up,
            InputType::Down => Movement::Down,
            InputType::Left => Movement::Left,
            InputType::Right => Movement::Right,
            InputType::Action => Movement::Action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("LEFT".parse::<InputType>().unwrap(), InputType::Left);
        assert_eq!(InputType::Action.to_string(), "action");
        assert!("jump".parse::<InputType>().is_err());
    }
}
