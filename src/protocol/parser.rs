//! Tokenizer for the engine protocol
//!
//! One command per line, whitespace separated. Square and piece operands
//! stay raw strings here; the engine validates them so it can answer with a
//! readable message instead of dropping the line.

/// Every command the engine answers, in protocol order.
pub const COMMANDS: [&str; 18] = [
    "protocol_version",
    "name",
    "version",
    "known_command",
    "list_commands",
    "quit",
    "boardsize",
    "reset_board",
    "num_repetition",
    "num_moves_to_draw",
    "move",
    "flip",
    "genmove",
    "game_over",
    "ready",
    "time_settings",
    "time_left",
    "showboard",
];

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Command {
    ProtocolVersion,
    Name,
    Version,
    KnownCommand(String),
    ListCommands,
    Quit,
    BoardSize { files: String, ranks: String },
    ResetBoard,
    NumRepetition,
    NumMovesToDraw,
    Move { from: String, to: String },
    Flip { square: String, piece: String },
    GenMove,
    GameOver(String),
    Ready,
    TimeSettings(Vec<String>),
    TimeLeft { side: String, msec: String },
    ShowBoard,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    let parts: Vec<&str> = trimmed.split_whitespace().collect();
    let Some(&head) = parts.first() else {
        return Command::Unknown(String::new());
    };

    match head {
        "protocol_version" => Command::ProtocolVersion,
        "name" => Command::Name,
        "version" => Command::Version,
        "known_command" => Command::KnownCommand(parts.get(1).unwrap_or(&"").to_string()),
        "list_commands" => Command::ListCommands,
        "quit" => Command::Quit,
        "boardsize" => match (parts.get(1), parts.get(2)) {
            (Some(f), Some(r)) => Command::BoardSize {
                files: f.to_string(),
                ranks: r.to_string(),
            },
            _ => Command::Unknown(trimmed.to_string()),
        },
        "reset_board" => Command::ResetBoard,
        "num_repetition" => Command::NumRepetition,
        "num_moves_to_draw" => Command::NumMovesToDraw,
        "move" => match (parts.get(1), parts.get(2)) {
            (Some(from), Some(to)) => Command::Move {
                from: from.to_string(),
                to: to.to_string(),
            },
            _ => Command::Unknown(trimmed.to_string()),
        },
        "flip" => match (parts.get(1), parts.get(2)) {
            (Some(square), Some(piece)) => Command::Flip {
                square: square.to_string(),
                piece: piece.to_string(),
            },
            _ => Command::Unknown(trimmed.to_string()),
        },
        "genmove" => Command::GenMove,
        "game_over" => Command::GameOver(parts[1..].join(" ")),
        "ready" => Command::Ready,
        "time_settings" => Command::TimeSettings(parts[1..].iter().map(|s| s.to_string()).collect()),
        "time_left" => match (parts.get(1), parts.get(2)) {
            (Some(side), Some(msec)) => Command::TimeLeft {
                side: side.to_string(),
                msec: msec.to_string(),
            },
            _ => Command::Unknown(trimmed.to_string()),
        },
        "showboard" => Command::ShowBoard,
        other => Command::Unknown(other.to_string()),
    }
}
