use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid item type '{0}'")]
    InvalidItemType(String),
    #[error("Invalid coordinates ({x}, {y})")]
    InvalidCoords { x: i32, y: i32 },
    #[error("Too many bombs: {bombs} do not fit a {width}x{height} board")]
    TooManyBombs { width: u32, height: u32, bombs: u32 },
}

pub type Result<T> = core::result::Result<T, GameError>;
