//! Interactive console front-end.
//!
//! Plays the role of the presentation layer: it draws each
//! [`RenderInstruction`] to the terminal and forwards raw input events
//! (cell picks, play-again, back, quit) to the session. It holds no game
//! state of its own.

use crate::position::Position;
use crate::render::RenderInstruction;
use crate::session::GameSession;
use crate::turn::TurnState;
use anyhow::Result;
use std::io::Write;
use tokio::io::AsyncBufReadExt;
use tracing::debug;

/// Runs the interactive loop until the user quits or returns to setup.
pub async fn run(mut session: GameSession) -> Result<()> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    let mut frame = session.start_new_round(true).await;
    loop {
        draw(&frame);

        // A due AI move resolves without prompting; after a failed fetch
        // (notice set) the user decides whether to retry.
        if session.ai_move_pending() && frame.notice.is_none() {
            frame = session.resolve_pending_ai().await;
            continue;
        }

        print_prompt(&frame, &session);
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim().to_lowercase();
        debug!(input = %input, "Console input");

        if input == "quit" || input == "q" {
            break;
        }

        match session.controller().state() {
            TurnState::RoundOver(_) if frame.modal.is_none() => {
                frame = session.continue_after_round_over();
            }
            TurnState::RoundOver(_) => match input.as_str() {
                "again" | "a" | "" => frame = session.start_new_round(false).await,
                "back" | "b" => {
                    session.return_to_setup();
                    println!("Session ended; scores reset.");
                    break;
                }
                _ => println!("Commands: again, back, quit"),
            },
            TurnState::AwaitingAIMove(_) => {
                // Reachable only after a failed AI fetch.
                match input.as_str() {
                    "back" | "b" => {
                        session.return_to_setup();
                        println!("Session ended; scores reset.");
                        break;
                    }
                    _ => frame = session.resolve_pending_ai().await,
                }
            }
            TurnState::AwaitingHumanMove(_) => {
                if input == "back" || input == "b" {
                    session.return_to_setup();
                    println!("Session ended; scores reset.");
                    break;
                }
                match Position::from_label_or_number(&input) {
                    Some(position) if !frame.input_mask[position.to_index()] => {
                        println!("That cell is taken.");
                    }
                    Some(position) => frame = session.player_move(position).await,
                    None => {
                        println!("Pick an empty cell by number (0-8) or name, e.g. 'center'.");
                    }
                }
            }
            TurnState::Idle => break,
        }
    }
    Ok(())
}

fn draw(frame: &RenderInstruction) {
    println!();
    println!("{}", frame.board.display());
    println!();
    println!("  {}", frame.banner.label());
    println!(
        "  {} (X) {} - {} (O) {} - draws {}",
        frame.player1_name,
        frame.scores.player1_wins,
        frame.player2_name,
        frame.scores.player2_wins,
        frame.scores.draws,
    );
    if !frame.history.is_empty() {
        println!("  {}:", frame.move_count_label);
        for record in &frame.history {
            println!(
                "    {}. {} ({}) -> {}",
                record.move_number, record.player, record.mark, record.position
            );
        }
    }
    if let Some(modal) = &frame.modal {
        println!();
        println!("  === {} ===", modal.title);
        println!("  {}", modal.message);
    }
    if let Some(notice) = &frame.notice {
        println!("  ! {notice}");
    }
}

fn print_prompt(frame: &RenderInstruction, session: &GameSession) {
    let prompt = match session.controller().state() {
        TurnState::RoundOver(_) if frame.modal.is_none() => "[enter to continue, q to quit] ",
        TurnState::RoundOver(_) => "[again/back/quit] ",
        TurnState::AwaitingAIMove(_) => "[enter to retry, back/quit] ",
        _ => "> ",
    };
    print!("{prompt}");
    let _ = std::io::stdout().flush();
}
