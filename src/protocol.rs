//! Wire protocol shared by the relay and every peer.
//!
//! Messages are `;`-separated text, one complete message per datagram,
//! capped at [`MAX_MESSAGE_LEN`] bytes. The first five characters are a
//! fixed-width tag (four letters and a `;`) used for dispatch; the remaining
//! tokens are message specific. Two tags are overloaded by arity and kept
//! that way on the wire: `join;user` asks for the lobby host list while
//! `join;joiner;host` announces a completed pairing, and `rmch;user`
//! requests a rematch while `rmch;opponent;host` confirms one.

use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use crate::config::BOARD_SIZE;
use crate::point::Point;
use crate::ship::{Orientation, Ship};

/// Hard cap on an encoded message, matching the receive buffer size.
pub const MAX_MESSAGE_LEN: usize = 512;

/// Token separator. Usernames and chat-free fields must not contain it.
pub const FIELD_DELIMITER: char = ';';

const TAG_LEN: usize = 5;

/// A decoded protocol message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// `init;user`: register a new connection under `user`.
    Init { username: String },
    /// `host;user`: start hosting a game.
    Host { username: String },
    /// `join;user`: ask for the list of open hosts.
    Join { username: String },
    /// `join;joiner;host`: pairing succeeded; sent to both players.
    Joined { joiner: String, host: String },
    /// `jngm;joiner;host`: request to join a specific host's game.
    JoinGame { joiner: String, host: String },
    /// `redy;user`: the sender has finished placing ships.
    Ready { username: String },
    /// `strt;`: both sides ready; the game begins.
    Start,
    /// `rqst;user;board` from a peer, re-tagged to `rqst;board` when the
    /// relay forwards it to the opponent.
    BoardRequest { username: Option<String> },
    /// `rspn;user;<fleet>`: reply carrying the sender's ship layout.
    BoardResponse {
        username: String,
        ships: Vec<ShipPlacement>,
    },
    /// `move;user;row;col`: a shot taken by `user`.
    Move { username: String, at: Point },
    /// `chat;user;text`: chat line; `text` may itself contain delimiters.
    Chat { username: String, text: String },
    /// `list;host1;host2;...`: open (not yet started) hosts.
    HostList { hosts: Vec<String> },
    /// `dsct;user`: graceful disconnect.
    Disconnect { username: String },
    /// `rmch;user`: request a rematch.
    Rematch { username: String },
    /// `rmch;opponent;host`: both sides agreed; a new round begins.
    RematchStart { opponent: String, host: String },
    /// `info;text`: server notice (registration results, rejections).
    Info { text: String },
}

impl Message {
    /// Render the message to its wire form.
    pub fn encode(&self) -> String {
        match self {
            Message::Init { username } => format!("init;{username}"),
            Message::Host { username } => format!("host;{username}"),
            Message::Join { username } => format!("join;{username}"),
            Message::Joined { joiner, host } => format!("join;{joiner};{host}"),
            Message::JoinGame { joiner, host } => format!("jngm;{joiner};{host}"),
            Message::Ready { username } => format!("redy;{username}"),
            Message::Start => "strt;".to_string(),
            Message::BoardRequest {
                username: Some(username),
            } => format!("rqst;{username};board"),
            Message::BoardRequest { username: None } => "rqst;board".to_string(),
            Message::BoardResponse { username, ships } => {
                format!("rspn;{username};{}", encode_fleet(ships))
            }
            Message::Move { username, at } => {
                format!("move;{username};{};{}", at.row, at.col)
            }
            Message::Chat { username, text } => format!("chat;{username};{text}"),
            Message::HostList { hosts } => {
                let mut out = String::from("list;");
                for host in hosts {
                    out.push_str(host);
                    out.push(FIELD_DELIMITER);
                }
                out
            }
            Message::Disconnect { username } => format!("dsct;{username}"),
            Message::Rematch { username } => format!("rmch;{username}"),
            Message::RematchStart { opponent, host } => format!("rmch;{opponent};{host}"),
            Message::Info { text } => format!("info;{text}"),
        }
    }

    /// Parse one datagram's text into a message.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        if text.len() > MAX_MESSAGE_LEN {
            return Err(ProtocolError::TooLong(text.len()));
        }
        let tag = text.get(..TAG_LEN).ok_or(ProtocolError::Truncated)?;
        let rest = &text[TAG_LEN..];
        match tag {
            "init;" => Ok(Message::Init {
                username: single_field(rest, "init")?,
            }),
            "host;" => Ok(Message::Host {
                username: single_field(rest, "host")?,
            }),
            "join;" => match fields(rest).as_slice() {
                [username] if !username.is_empty() => Ok(Message::Join {
                    username: (*username).to_string(),
                }),
                [joiner, host] if !joiner.is_empty() && !host.is_empty() => {
                    Ok(Message::Joined {
                        joiner: (*joiner).to_string(),
                        host: (*host).to_string(),
                    })
                }
                _ => Err(ProtocolError::BadFieldCount("join")),
            },
            "jngm;" => match fields(rest).as_slice() {
                [joiner, host] if !joiner.is_empty() && !host.is_empty() => {
                    Ok(Message::JoinGame {
                        joiner: (*joiner).to_string(),
                        host: (*host).to_string(),
                    })
                }
                _ => Err(ProtocolError::BadFieldCount("jngm")),
            },
            "redy;" => Ok(Message::Ready {
                username: single_field(rest, "redy")?,
            }),
            "strt;" => match fields(rest).as_slice() {
                [] => Ok(Message::Start),
                _ => Err(ProtocolError::BadFieldCount("strt")),
            },
            "rqst;" => match fields(rest).as_slice() {
                ["board"] => Ok(Message::BoardRequest { username: None }),
                [username, "board"] if !username.is_empty() => Ok(Message::BoardRequest {
                    username: Some((*username).to_string()),
                }),
                _ => Err(ProtocolError::BadFieldCount("rqst")),
            },
            "rspn;" => {
                let (username, fleet) = rest
                    .split_once(FIELD_DELIMITER)
                    .ok_or(ProtocolError::BadFieldCount("rspn"))?;
                if username.is_empty() {
                    return Err(ProtocolError::BadFieldCount("rspn"));
                }
                Ok(Message::BoardResponse {
                    username: username.to_string(),
                    ships: decode_fleet(fleet)?,
                })
            }
            "move;" => match fields(rest).as_slice() {
                [username, row, col] if !username.is_empty() => Ok(Message::Move {
                    username: (*username).to_string(),
                    at: parse_point(row, col)?,
                }),
                _ => Err(ProtocolError::BadFieldCount("move")),
            },
            "chat;" => {
                let (username, chat_text) = rest
                    .split_once(FIELD_DELIMITER)
                    .ok_or(ProtocolError::BadFieldCount("chat"))?;
                if username.is_empty() {
                    return Err(ProtocolError::BadFieldCount("chat"));
                }
                Ok(Message::Chat {
                    username: username.to_string(),
                    text: chat_text.to_string(),
                })
            }
            "list;" => Ok(Message::HostList {
                hosts: rest
                    .split(FIELD_DELIMITER)
                    .filter(|s| !s.is_empty())
                    .map(ToString::to_string)
                    .collect(),
            }),
            "dsct;" => Ok(Message::Disconnect {
                username: single_field(rest, "dsct")?,
            }),
            "rmch;" => match fields(rest).as_slice() {
                [username] if !username.is_empty() => Ok(Message::Rematch {
                    username: (*username).to_string(),
                }),
                [opponent, host] if !opponent.is_empty() && !host.is_empty() => {
                    Ok(Message::RematchStart {
                        opponent: (*opponent).to_string(),
                        host: (*host).to_string(),
                    })
                }
                _ => Err(ProtocolError::BadFieldCount("rmch")),
            },
            "info;" => Ok(Message::Info {
                text: rest.to_string(),
            }),
            _ => Err(ProtocolError::UnknownTag),
        }
    }
}

/// Split payload tokens, tolerating one trailing delimiter.
fn fields(rest: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = rest.split(FIELD_DELIMITER).collect();
    if tokens.last() == Some(&"") {
        tokens.pop();
    }
    tokens
}

fn single_field(rest: &str, tag: &'static str) -> Result<String, ProtocolError> {
    match fields(rest).as_slice() {
        [value] if !value.is_empty() => Ok((*value).to_string()),
        _ => Err(ProtocolError::BadFieldCount(tag)),
    }
}

fn parse_point(row: &str, col: &str) -> Result<Point, ProtocolError> {
    let row: u8 = row.parse().map_err(|_| ProtocolError::InvalidCoordinate)?;
    let col: u8 = col.parse().map_err(|_| ProtocolError::InvalidCoordinate)?;
    let p = Point::new(row, col);
    if !p.in_bounds() {
        return Err(ProtocolError::InvalidCoordinate);
    }
    Ok(p)
}

/// One ship's placement as carried by `rspn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipPlacement {
    pub nose: Point,
    pub length: u8,
    pub orientation: Orientation,
}

impl From<&Ship> for ShipPlacement {
    fn from(ship: &Ship) -> Self {
        ShipPlacement {
            nose: ship.nose(),
            length: ship.len() as u8,
            orientation: ship.orientation(),
        }
    }
}

/// Serialize a fleet: one `"row col,length,horizontal,"` segment per ship,
/// each terminated by `;`.
pub fn encode_fleet(ships: &[ShipPlacement]) -> String {
    let mut out = String::new();
    for ship in ships {
        out.push_str(&format!(
            "{},{},{},;",
            ship.nose,
            ship.length,
            ship.orientation.is_horizontal()
        ));
    }
    out
}

/// Parse the fleet segments of an `rspn` payload.
pub fn decode_fleet(text: &str) -> Result<Vec<ShipPlacement>, ProtocolError> {
    let mut ships = Vec::new();
    for segment in text.split(FIELD_DELIMITER).filter(|s| !s.is_empty()) {
        let mut parts = segment.split(',');
        let nose = parts.next().ok_or(ProtocolError::InvalidBoard)?;
        let length = parts.next().ok_or(ProtocolError::InvalidBoard)?;
        let horizontal = parts.next().ok_or(ProtocolError::InvalidBoard)?;
        // The segment grammar ends each entry with a comma, leaving one
        // empty trailing part.
        if parts.any(|p| !p.is_empty()) {
            return Err(ProtocolError::InvalidBoard);
        }
        let (row, col) = nose.split_once(' ').ok_or(ProtocolError::InvalidBoard)?;
        let nose = parse_point(row, col).map_err(|_| ProtocolError::InvalidBoard)?;
        let length: u8 = length.parse().map_err(|_| ProtocolError::InvalidBoard)?;
        if length == 0 || length as usize > BOARD_SIZE {
            return Err(ProtocolError::InvalidBoard);
        }
        let orientation = match horizontal {
            "true" => Orientation::Horizontal,
            "false" => Orientation::Vertical,
            _ => return Err(ProtocolError::InvalidBoard),
        };
        ships.push(ShipPlacement {
            nose,
            length,
            orientation,
        });
    }
    Ok(ships)
}

/// Errors produced while decoding a datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// Message exceeds [`MAX_MESSAGE_LEN`] bytes.
    TooLong(usize),
    /// Message shorter than a tag.
    Truncated,
    /// First five characters are not a known tag.
    UnknownTag,
    /// Wrong number of payload tokens for the tag.
    BadFieldCount(&'static str),
    /// Row or column missing, non-numeric, or off the grid.
    InvalidCoordinate,
    /// Malformed fleet segment in an `rspn` payload.
    InvalidBoard,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::TooLong(len) => {
                write!(f, "message of {} bytes exceeds {}", len, MAX_MESSAGE_LEN)
            }
            ProtocolError::Truncated => write!(f, "message shorter than a tag"),
            ProtocolError::UnknownTag => write!(f, "unknown message tag"),
            ProtocolError::BadFieldCount(tag) => {
                write!(f, "wrong field count for `{}` message", tag)
            }
            ProtocolError::InvalidCoordinate => write!(f, "coordinate missing or off the grid"),
            ProtocolError::InvalidBoard => write!(f, "malformed board serialization"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ProtocolError {}

/// Errors from client-side username validation, each distinguishable so the
/// caller can re-prompt with a specific reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsernameError {
    TooShort,
    TooLong,
    ContainsDelimiter,
}

impl fmt::Display for UsernameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsernameError::TooShort => write!(f, "username must be at least 3 characters"),
            UsernameError::TooLong => write!(f, "username must be at most 20 characters"),
            UsernameError::ContainsDelimiter => {
                write!(f, "username must not contain `{}`", FIELD_DELIMITER)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UsernameError {}

/// Check a username before it goes into an `init` message: 3 to 20
/// characters, no field delimiter.
pub fn validate_username(name: &str) -> Result<(), UsernameError> {
    let len = name.chars().count();
    if len < 3 {
        return Err(UsernameError::TooShort);
    }
    if len > 20 {
        return Err(UsernameError::TooLong);
    }
    if name.contains(FIELD_DELIMITER) {
        return Err(UsernameError::ContainsDelimiter);
    }
    Ok(())
}
