use std::io::Write;

use crossterm::{cursor, queue, style, terminal};

/// Print a menu item string, bolding any text inside `[...]` brackets.
/// Text outside brackets is printed dim.
pub fn print_menu_item(out: &mut impl Write, item: &str) -> anyhow::Result<()> {
    let mut rest = item;
    while !rest.is_empty() {
        let Some(open) = rest.find('[') else {
            print_dim(out, rest)?;
            break;
        };
        if open > 0 {
            print_dim(out, &rest[..open])?;
        }
        rest = &rest[open..];
        let Some(close) = rest.find(']') else {
            queue!(out, style::Print(rest))?;
            break;
        };
        queue!(
            out,
            style::SetAttribute(style::Attribute::Bold),
            style::Print(&rest[..=close]),
            style::SetAttribute(style::Attribute::Reset),
        )?;
        rest = &rest[close + 1..];
    }
    Ok(())
}

fn print_dim(out: &mut impl Write, text: &str) -> anyhow::Result<()> {
    queue!(
        out,
        style::SetAttribute(style::Attribute::Dim),
        style::Print(text),
        style::SetAttribute(style::Attribute::Reset),
    )?;
    Ok(())
}

/// Draw the title row: the window title in bold, then the close hints.
pub fn render(out: &mut impl Write, title: &str, close_keys: &[&str]) -> anyhow::Result<()> {
    queue!(
        out,
        cursor::MoveTo(0, 0),
        terminal::Clear(terminal::ClearType::CurrentLine),
        style::Print(" "),
        style::SetAttribute(style::Attribute::Bold),
        style::Print(title),
        style::SetAttribute(style::Attribute::Reset),
        style::Print("   "),
    )?;
    let keys: String = close_keys
        .iter()
        .filter(|k| !k.is_empty())
        .map(|k| format!("[{k}]"))
        .collect();
    if !keys.is_empty() {
        print_menu_item(out, &format!("{keys} close"))?;
    }
    Ok(())
}
