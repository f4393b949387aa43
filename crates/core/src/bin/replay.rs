//! Replays a list of moves from the starting position

use checkers_core::{analyze_position, apply_coords, starting_position, WireSession};

fn parse_move(text: &str) -> Option<[i64; 4]> {
    let (from, to) = text.split_once('-')?;
    let (from_row, from_col) = from.split_once(',')?;
    let (to_row, to_col) = to.split_once(',')?;
    Some([
        from_row.trim().parse().ok()?,
        from_col.trim().parse().ok()?,
        to_row.trim().parse().ok()?,
        to_col.trim().parse().ok()?,
    ])
}

fn main() {
    let moves: Vec<String> = std::env::args().skip(1).collect();
    if moves.is_empty() {
        eprintln!("Usage: replay <row,col-row,col>...");
        eprintln!("Example: replay 5,0-4,1 2,1-3,2");
        std::process::exit(1);
    }

    let mut session = starting_position();
    println!("{}\n", session.board());

    for text in &moves {
        let Some([from_row, from_col, to_row, to_col]) = parse_move(text) else {
            eprintln!("Could not parse move '{}'", text);
            std::process::exit(1);
        };

        let mover = session.turn();
        match apply_coords(&session, from_row, from_col, to_row, to_col) {
            Ok(next) => session = next,
            Err(e) => {
                eprintln!("{} {}: {}", mover, text, e);
                std::process::exit(1);
            }
        }

        println!("{} played {}", mover, text);
        println!("{}\n", session.board());
    }

    let info = analyze_position(&session);
    println!(
        "Red: {} | Black: {} | Kings: {}",
        info.red_pieces, info.black_pieces, info.kings
    );
    println!(
        "To move: {} | Legal moves: {} | Must capture: {}",
        info.side_to_move, info.legal_move_count, info.must_capture
    );

    match serde_json::to_string(&WireSession::from(&session)) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize game: {}", e),
    }
}
