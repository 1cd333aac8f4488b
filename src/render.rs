use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;

use super::board::{CellState, Content, Point};
use super::game::{Game, Outcome};

const WALL: &str = "🧱";

// crossterm emits rows 1-based, so the last u16 row cannot be addressed.
fn screen_row(row: usize) -> io::Result<u16> {
    u16::try_from(row).ok().filter(|&row| row < u16::MAX).ok_or_else(|| io::Error::new(
        io::ErrorKind::InvalidInput, format!("row {} does not fit on the terminal", row)))
}

pub fn glyph(state: &CellState) -> &'static str {
    if state.flagged {
        return "🚩"
    }
    if !state.revealed {
        return "  "
    }
    match state.content {
        Content::Mine => "💣",
        Content::Clear(0) => "⬜",
        Content::Clear(1) => "1️⃣ ",
        Content::Clear(2) => "2️⃣ ",
        Content::Clear(3) => "3️⃣ ",
        Content::Clear(4) => "4️⃣ ",
        Content::Clear(5) => "5️⃣ ",
        Content::Clear(6) => "6️⃣ ",
        Content::Clear(7) => "7️⃣ ",
        Content::Clear(_) => "8️⃣ "
    }
}

pub fn status_lines(game: &Game) -> Vec<String> {
    let mut lines = vec![
        format!("Mines left: {}", game.field().remaining_mines()),
        String::from("Press ENTER to uncover a field, SPACE to place a flag"),
    ];
    let message = match game.outcome() {
        Outcome::Playing => None,
        Outcome::Won => Some("Won :)"),
        Outcome::Lost => Some("Lost :(")
    };
    if let Some(message) = message {
        lines.push(String::new());
        lines.push(String::from(message));
        lines.push(String::from("Press ENTER to play again (Ctrl+C to abort)"));
    }
    lines
}

/// Redraws the whole screen: walled grid, highlighted cursor, status lines.
pub fn draw<W: Write>(out: &mut W, game: &Game) -> io::Result<()> {
    let field = game.field();
    let wall_row = WALL.repeat(field.width() + 2);
    let mut row = 0;

    out.queue(Clear(ClearType::All))?;
    out.queue(MoveTo(0, screen_row(row)?))?.queue(Print(&wall_row))?;
    for y in 0..field.height() {
        row += 1;
        out.queue(MoveTo(0, screen_row(row)?))?.queue(Print(WALL))?;
        for x in 0..field.width() {
            let point = Point(x, y);
            let state = field.cell_state(&point).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            if point == game.cursor() {
                out.queue(SetBackgroundColor(Color::White))?
                    .queue(SetForegroundColor(Color::Black))?
                    .queue(Print(glyph(&state)))?
                    .queue(ResetColor)?;
            } else {
                out.queue(Print(glyph(&state)))?;
            }
        }
        out.queue(Print(WALL))?;
    }
    row += 1;
    out.queue(MoveTo(0, screen_row(row)?))?.queue(Print(&wall_row))?;
    for line in status_lines(game) {
        row += 1;
        out.queue(MoveTo(0, screen_row(row)?))?.queue(Print(line))?;
    }
    out.flush()
}
