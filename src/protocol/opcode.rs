/// Inbound opcodes. Every wire frame is a JSON array whose first element
/// is one of these integers; the payload follows positionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Cheat = 1,
    Login = 11,
    RoomList = 13,
    TableList = 15,
    JoinRoom = 17,
    JoinTable = 19,
    NewTable = 21,
    DealPoker = 31,
    CallScore = 33,
    ShowPoker = 35,
    ShotPoker = 37,
    GameOver = 41,
    Chat = 43,
    Restart = 45,
}

/// Outbound opcodes, each one above its request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Cheat = 2,
    Login = 12,
    RoomList = 14,
    TableList = 16,
    JoinRoom = 18,
    JoinTable = 20,
    NewTable = 22,
    DealPoker = 32,
    CallScore = 34,
    ShowPoker = 36,
    ShotPoker = 38,
    GameOver = 42,
    Chat = 44,
    Restart = 46,
}

impl Request {
    pub const fn code(self) -> i64 {
        self as i64
    }
}

impl Response {
    pub const fn code(self) -> i64 {
        self as i64
    }
}

impl TryFrom<i64> for Request {
    type Error = i64;
    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Request::Cheat),
            11 => Ok(Request::Login),
            13 => Ok(Request::RoomList),
            15 => Ok(Request::TableList),
            17 => Ok(Request::JoinRoom),
            19 => Ok(Request::JoinTable),
            21 => Ok(Request::NewTable),
            31 => Ok(Request::DealPoker),
            33 => Ok(Request::CallScore),
            35 => Ok(Request::ShowPoker),
            37 => Ok(Request::ShotPoker),
            41 => Ok(Request::GameOver),
            43 => Ok(Request::Chat),
            45 => Ok(Request::Restart),
            other => Err(other),
        }
    }
}

impl TryFrom<i64> for Response {
    type Error = i64;
    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            2 => Ok(Response::Cheat),
            12 => Ok(Response::Login),
            14 => Ok(Response::RoomList),
            16 => Ok(Response::TableList),
            18 => Ok(Response::JoinRoom),
            20 => Ok(Response::JoinTable),
            22 => Ok(Response::NewTable),
            32 => Ok(Response::DealPoker),
            34 => Ok(Response::CallScore),
            36 => Ok(Response::ShowPoker),
            38 => Ok(Response::ShotPoker),
            42 => Ok(Response::GameOver),
            44 => Ok(Response::Chat),
            46 => Ok(Response::Restart),
            other => Err(other),
        }
    }
}
