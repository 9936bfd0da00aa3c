//! Console client: line protocol over TCP, commands from stdin.
//!
//! Input is `row col` for a move, or `PASS`, `RESIGN`, `QUIT`/`EXIT`
//! (case-insensitive). Server lines the client does not recognize are
//! printed raw and are never fatal.

use crate::codec;
use crate::games::go::Move;
use crate::protocol::Notice;
use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;

/// Local view of the match, updated from server notices.
#[derive(Debug, Default)]
struct ClientState {
    my_id: Option<u8>,
    my_turn: bool,
}

/// Connects to the server and plays until game over or disconnect.
pub async fn run(host: &str, port: u16) -> Result<()> {
    let stream = TcpStream::connect((host, port)).await?;
    println!("Connected. Waiting for the game to start...");

    let (read_half, mut write_half) = stream.into_split();
    let mut server_lines = BufReader::new(read_half).lines();
    let mut input_lines = BufReader::new(tokio::io::stdin()).lines();
    let mut state = ClientState::default();

    loop {
        tokio::select! {
            line = server_lines.next_line() => {
                match line? {
                    Some(raw) => {
                        if !handle_server_line(&raw, &mut state) {
                            break;
                        }
                    }
                    None => {
                        eprintln!("Disconnected from server.");
                        break;
                    }
                }
            }
            line = input_lines.next_line() => {
                match line? {
                    Some(raw) => {
                        if !handle_input_line(&raw, &state, &mut write_half).await? {
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }
    Ok(())
}

/// Reacts to one server line. Returns `false` when the match is over.
fn handle_server_line(raw: &str, state: &mut ClientState) -> bool {
    match Notice::parse(raw) {
        Some(Notice::Start(id)) => {
            state.my_id = Some(id);
            println!("Game started. You are player {id} (X=1, O=2)");
        }
        Some(Notice::Board(board)) => {
            println!("--- BOARD ---");
            println!("{board}");
        }
        Some(Notice::YourTurn) => {
            state.my_turn = true;
            println!("Your turn. Enter: row col   (or PASS or RESIGN)");
        }
        Some(Notice::OpponentTurn) => {
            state.my_turn = false;
            println!("Waiting for opponent...");
        }
        Some(Notice::Info(msg)) => println!("[INFO] {msg}"),
        Some(Notice::Error(msg)) => eprintln!("[ERROR] {msg}"),
        Some(Notice::GameOver(msg)) => {
            println!("[GAME OVER] {msg}");
            return false;
        }
        None => println!("[SERVER] {raw}"),
    }
    true
}

/// Reacts to one console line. Returns `false` to quit.
async fn handle_input_line(
    raw: &str,
    state: &ClientState,
    writer: &mut OwnedWriteHalf,
) -> Result<bool> {
    let line = raw.trim();
    if line.is_empty() {
        return Ok(true);
    }

    match line.to_uppercase().as_str() {
        "QUIT" | "EXIT" => {
            send_line(writer, "RESIGN").await?;
            return Ok(false);
        }
        "RESIGN" => {
            send_line(writer, "RESIGN").await?;
            return Ok(true);
        }
        "PASS" => {
            send_line(writer, "PASS").await?;
            return Ok(true);
        }
        _ => {}
    }

    if !state.my_turn {
        println!("Not your turn yet.");
        return Ok(true);
    }

    let mut parts = line.split_whitespace();
    let coords = (
        parts.next().and_then(|s| s.parse::<i32>().ok()),
        parts.next().and_then(|s| s.parse::<i32>().ok()),
    );
    match coords {
        (Some(row), Some(col)) => {
            let mov = Move::new(row, col, state.my_id.unwrap_or(0));
            let payload = codec::encode_move(&mov);
            send_line(writer, &format!("MOVE {payload}")).await?;
        }
        _ => println!("Bad input. Use: row col   or PASS   or RESIGN"),
    }
    Ok(true)
}

async fn send_line(writer: &mut OwnedWriteHalf, line: &str) -> Result<()> {
    writer.write_all(format!("{line}\n").as_bytes()).await?;
    Ok(())
}
