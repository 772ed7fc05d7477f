pub mod cards;
pub mod gameroom;
pub mod hosting;
pub mod players;
pub mod protocol;
pub mod session;

/// dimensional analysis types
pub type Chips = i64;
pub type UserId = i64;
pub type RoomId = i64;
pub type TableId = i64;

// table parameters
pub const SEATS: usize = 3;
pub const CARDS_PER_SEAT: usize = 17;
pub const KITTY_CARDS: usize = 3;
pub const DECK_SIZE: usize = 54;
pub const TOP_BID: i64 = 3;
pub const ENTRANCE_FEE: Chips = 200;

// automated player parameters
pub const ROBOT_COIN: Chips = 10_000;
pub const ROBOT_QUEUE: usize = 8;
pub const ROBOT_DELAY: std::time::Duration = std::time::Duration::from_secs(1);

// session keepalive parameters
pub const WRITE_WAIT: std::time::Duration = std::time::Duration::from_secs(1);
pub const PONG_WAIT: std::time::Duration = std::time::Duration::from_secs(60);
pub const PING_PERIOD: std::time::Duration =
    std::time::Duration::from_secs(PONG_WAIT.as_secs() * 9 / 10);
pub const MAX_MESSAGE_SIZE: usize = 512;

/// combination catalog cache, regenerated when absent
pub const RULE_CACHE: &str = "rule.json";

/// initialize logging and exit on ctrl-c
pub fn init() {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.expect("install ctrl-c handler");
        println!();
        log::warn!("forcing exit");
        std::process::exit(0);
    });
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
