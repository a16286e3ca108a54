/// Which side of the connection sent a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Sent by the client, bound for the server.
    Serverbound,
    /// Sent by the server, bound for the client.
    Clientbound,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Serverbound => Direction::Clientbound,
            Direction::Clientbound => Direction::Serverbound,
        }
    }
}
