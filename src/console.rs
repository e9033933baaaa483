//! Line commands for the headless client. Stands in for the input
//! collaborator: every world edit it issues is a local edit.

use crate::world::block_id::BlockId;
use crate::world::visibility::Face;
use glam::{IVec3, Vec3};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command {0:?}, try `help`")]
    Unknown(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
    #[error("Invalid number {0:?}")]
    InvalidNumber(String),
    #[error("Unknown block {0:?}")]
    UnknownBlock(String),
    #[error("Unknown face {0:?} (up, down, north, south, east, west)")]
    UnknownFace(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Get(IVec3),
    Set(IVec3, BlockId),
    Mine(IVec3),
    Place(IVec3, Face),
    Select(String),
    Exposed(IVec3),
    Visible(Option<i32>),
    Goto(Vec3),
    Status,
    Connect,
    Help,
    Quit,
}

pub const HELP: &str = "\
get X Y Z            show the block at a position
set X Y Z BLOCK      write a block (id or name)
mine X Y Z           clear a block
place X Y Z [FACE]   place the selected block next to a face (default up)
select BLOCK|1-4     choose the block to place
exposed X Y Z        show which faces of a block touch air
visible [RADIUS]     count blocks a redraw would draw
goto X Y Z           move the player
status               connection and world summary
connect              connect to the relay if offline
quit                 exit";

fn parse_i32(s: &str) -> Result<i32, CommandError> {
    s.parse().map_err(|_| CommandError::InvalidNumber(s.to_string()))
}

fn parse_f32(s: &str) -> Result<f32, CommandError> {
    s.parse().map_err(|_| CommandError::InvalidNumber(s.to_string()))
}

fn parse_pos(args: &[&str], usage: &'static str) -> Result<IVec3, CommandError> {
    match args {
        [x, y, z, ..] => Ok(IVec3::new(parse_i32(x)?, parse_i32(y)?, parse_i32(z)?)),
        _ => Err(CommandError::Usage(usage)),
    }
}

fn parse_face(s: &str) -> Result<Face, CommandError> {
    match s.to_ascii_lowercase().as_str() {
        "up" | "top" => Ok(Face::Up),
        "down" | "bottom" => Ok(Face::Down),
        "north" => Ok(Face::North),
        "south" => Ok(Face::South),
        "east" => Ok(Face::East),
        "west" => Ok(Face::West),
        _ => Err(CommandError::UnknownFace(s.to_string())),
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(CommandError::Usage("empty command"));
        };
        let args: Vec<&str> = words.collect();

        match name.to_ascii_lowercase().as_str() {
            "get" => Ok(Command::Get(parse_pos(&args, "get X Y Z")?)),
            "set" => {
                let pos = parse_pos(&args, "set X Y Z BLOCK")?;
                let block = args.get(3).ok_or(CommandError::Usage("set X Y Z BLOCK"))?;
                let block = block
                    .parse::<BlockId>()
                    .map_err(|_| CommandError::UnknownBlock(block.to_string()))?;
                Ok(Command::Set(pos, block))
            }
            "mine" => Ok(Command::Mine(parse_pos(&args, "mine X Y Z")?)),
            "place" => {
                let pos = parse_pos(&args, "place X Y Z [FACE]")?;
                let face = match args.get(3) {
                    Some(face) => parse_face(face)?,
                    None => Face::Up,
                };
                Ok(Command::Place(pos, face))
            }
            "select" => match args.first() {
                Some(block) => Ok(Command::Select(block.to_string())),
                None => Err(CommandError::Usage("select BLOCK|1-4")),
            },
            "exposed" => Ok(Command::Exposed(parse_pos(&args, "exposed X Y Z")?)),
            "visible" => match args.first() {
                Some(radius) => Ok(Command::Visible(Some(parse_i32(radius)?))),
                None => Ok(Command::Visible(None)),
            },
            "goto" => match args.as_slice() {
                [x, y, z, ..] => Ok(Command::Goto(Vec3::new(
                    parse_f32(x)?,
                    parse_f32(y)?,
                    parse_f32(z)?,
                ))),
                _ => Err(CommandError::Usage("goto X Y Z")),
            },
            "status" => Ok(Command::Status),
            "connect" => Ok(Command::Connect),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}
