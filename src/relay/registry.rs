// Session state for the relay.
//
// `Registry` is the data structure the UDP server loop drives: usernames and
// their endpoints, one `GameState` per hosting user, and the symmetric
// opponent mapping. All mutation happens through `handle`, called from the
// single-threaded receive loop, so no internal locking is needed.
//
// `handle` never touches a socket. It returns the datagrams to emit as
// `(destination, message)` pairs and leaves the sending to the caller, which
// keeps every rendezvous rule testable without opening a port.
//
// Every handler checks that the names it dereferences are actually
// registered and answers violations with an `info;` rejection; a message
// about an unknown user must never take the relay down.

use std::collections::HashMap;
use std::net::SocketAddr;

use crate::protocol::Message;

/// Per-hosted-game record, keyed by the hosting username.
///
/// `ready` and `rematch` are two-phase barriers: each fires once when its
/// second flag is set. Ready flags stay set for the life of the game and are
/// only cleared when a rematch completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameState {
    pub game_started: bool,
    pub host_ready: bool,
    pub join_ready: bool,
    pub host_rematch: bool,
    pub join_rematch: bool,
}

/// All session state held by the relay.
#[derive(Debug, Default)]
pub struct Registry {
    /// Registered usernames and where to reach them.
    endpoints: HashMap<String, SocketAddr>,
    /// Hosted games, keyed by host username.
    hosts: HashMap<String, GameState>,
    /// Symmetric pairing: if A maps to B then B maps to A.
    opponents: HashMap<String, String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one decoded message from `from`, returning the datagrams to
    /// send in reply.
    pub fn handle(&mut self, from: SocketAddr, msg: Message) -> Vec<(SocketAddr, Message)> {
        let mut out = Vec::new();
        match msg {
            Message::Init { username } => {
                if self.endpoints.contains_key(&username) {
                    out.push((from, info("Name used")));
                } else {
                    self.endpoints.insert(username, from);
                    out.push((from, info("Name registered")));
                }
            }
            Message::Host { username } => {
                if !self.endpoints.contains_key(&username) {
                    out.push((from, info("Unknown user")));
                } else {
                    self.hosts.insert(username, GameState::default());
                    out.push((from, info("Host received")));
                }
            }
            Message::Join { username } => {
                if !self.endpoints.contains_key(&username) {
                    out.push((from, info("Unknown user")));
                } else {
                    let mut open: Vec<String> = self
                        .hosts
                        .iter()
                        .filter(|(_, gs)| !gs.game_started)
                        .map(|(name, _)| name.clone())
                        .collect();
                    if open.is_empty() {
                        // Nobody to join; the joiner becomes a host instead.
                        out.push((from, info("No hosts found")));
                        self.hosts.insert(username, GameState::default());
                    } else {
                        open.sort();
                        out.push((from, Message::HostList { hosts: open }));
                    }
                }
            }
            Message::JoinGame { joiner, host } => {
                if !self.endpoints.contains_key(&joiner) {
                    out.push((from, info("Unknown user")));
                } else {
                    match (self.hosts.get_mut(&host), self.endpoints.get(&host)) {
                        (Some(gs), Some(&host_ep)) => {
                            if gs.game_started {
                                out.push((from, info("User is already in a game.")));
                            } else {
                                gs.game_started = true;
                                self.opponents.insert(joiner.clone(), host.clone());
                                self.opponents.insert(host.clone(), joiner.clone());
                                let joined = Message::Joined { joiner, host };
                                out.push((host_ep, joined.clone()));
                                out.push((from, joined));
                            }
                        }
                        _ => out.push((from, info("Unknown host"))),
                    }
                }
            }
            Message::Ready { username } => {
                let Some(host) = self.game_host_of(&username) else {
                    out.push((from, info("No game to ready up for")));
                    return out;
                };
                let Some(gs) = self.hosts.get_mut(&host) else {
                    out.push((from, info("Unknown host")));
                    return out;
                };
                let was_complete = gs.host_ready && gs.join_ready;
                if host == username {
                    gs.host_ready = true;
                } else {
                    gs.join_ready = true;
                }
                // The barrier fires exactly once, on the message that
                // completes it.
                if !was_complete && gs.host_ready && gs.join_ready {
                    self.notify_pair(&host, Message::Start, &mut out);
                }
            }
            Message::BoardRequest {
                username: Some(username),
            } => {
                // Forwarded without the requester's name; the receiver only
                // needs to know its board was asked for.
                self.forward_to_opponent(
                    from,
                    &username,
                    Message::BoardRequest { username: None },
                    &mut out,
                );
            }
            Message::BoardResponse { username, ships } => {
                let sender = username.clone();
                self.forward_to_opponent(
                    from,
                    &sender,
                    Message::BoardResponse { username, ships },
                    &mut out,
                );
            }
            Message::Move { username, at } => {
                let sender = username.clone();
                self.forward_to_opponent(from, &sender, Message::Move { username, at }, &mut out);
            }
            Message::Chat { username, text } => {
                if self.opponents.contains_key(&username) {
                    let sender = username.clone();
                    self.forward_to_opponent(
                        from,
                        &sender,
                        Message::Chat { username, text },
                        &mut out,
                    );
                } else {
                    // Lobby chat goes to everyone else who is not in a game.
                    let mut idle: Vec<(String, SocketAddr)> = self
                        .endpoints
                        .iter()
                        .filter(|(name, _)| {
                            *name != &username && !self.opponents.contains_key(*name)
                        })
                        .map(|(name, &ep)| (name.clone(), ep))
                        .collect();
                    idle.sort();
                    for (_, ep) in idle {
                        out.push((
                            ep,
                            Message::Chat {
                                username: username.clone(),
                                text: text.clone(),
                            },
                        ));
                    }
                }
            }
            Message::Disconnect { username } => {
                if let Some(ep) = self
                    .opponents
                    .get(&username)
                    .and_then(|o| self.endpoints.get(o))
                {
                    out.push((
                        *ep,
                        Message::Disconnect {
                            username: username.clone(),
                        },
                    ));
                }
                // Full teardown, both directions of the pairing included.
                self.hosts.remove(&username);
                self.endpoints.remove(&username);
                if let Some(opponent) = self.opponents.remove(&username) {
                    self.opponents.remove(&opponent);
                }
            }
            Message::Rematch { username } => {
                let Some(host) = self.game_host_of(&username) else {
                    out.push((from, info("No game to rematch")));
                    return out;
                };
                let Some(opponent) = self.opponents.get(&host).cloned() else {
                    out.push((from, info("No opponent")));
                    return out;
                };
                let Some(gs) = self.hosts.get_mut(&host) else {
                    out.push((from, info("Unknown host")));
                    return out;
                };
                let was_complete = gs.host_rematch && gs.join_rematch;
                if host == username {
                    gs.host_rematch = true;
                } else {
                    gs.join_rematch = true;
                }
                if !was_complete && gs.host_rematch && gs.join_rematch {
                    gs.host_ready = false;
                    gs.join_ready = false;
                    gs.host_rematch = false;
                    gs.join_rematch = false;
                    self.notify_pair(&host, Message::RematchStart { opponent, host: host.clone() }, &mut out);
                }
            }
            // Messages only the relay itself emits; a client sending one is
            // ignored.
            Message::Joined { .. }
            | Message::Start
            | Message::BoardRequest { username: None }
            | Message::HostList { .. }
            | Message::RematchStart { .. }
            | Message::Info { .. } => {}
        }
        out
    }

    /// True when `name` currently has a registered endpoint.
    pub fn is_registered(&self, name: &str) -> bool {
        self.endpoints.contains_key(name)
    }

    /// The game record hosted by `name`, if any.
    pub fn game(&self, host: &str) -> Option<&GameState> {
        self.hosts.get(host)
    }

    /// The user `name` is currently paired with, if any.
    pub fn opponent_of(&self, name: &str) -> Option<&str> {
        self.opponents.get(name).map(String::as_str)
    }

    /// Resolve the host key of the game `name` belongs to: `name` itself if
    /// hosting, otherwise whoever `name` joined.
    fn game_host_of(&self, name: &str) -> Option<String> {
        if self.hosts.contains_key(name) {
            Some(name.to_string())
        } else {
            self.opponents.get(name).cloned()
        }
    }

    /// Queue `msg` for the host of a game and for the host's opponent.
    fn notify_pair(&self, host: &str, msg: Message, out: &mut Vec<(SocketAddr, Message)>) {
        let host_ep = self.endpoints.get(host);
        let opp_ep = self
            .opponents
            .get(host)
            .and_then(|o| self.endpoints.get(o));
        if let (Some(&host_ep), Some(&opp_ep)) = (host_ep, opp_ep) {
            out.push((host_ep, msg.clone()));
            out.push((opp_ep, msg));
        }
    }

    /// Queue `msg` for the opponent of `sender`, or a rejection back to the
    /// sender when no pairing exists.
    fn forward_to_opponent(
        &self,
        from: SocketAddr,
        sender: &str,
        msg: Message,
        out: &mut Vec<(SocketAddr, Message)>,
    ) {
        match self
            .opponents
            .get(sender)
            .and_then(|o| self.endpoints.get(o))
        {
            Some(&ep) => out.push((ep, msg)),
            None => out.push((from, info("No opponent"))),
        }
    }
}

fn info(text: &str) -> Message {
    Message::Info {
        text: text.to_string(),
    }
}
