//! Plain-text renderer writing to stdout.
//!
//! Logs go to stderr, so the two streams can be separated.

use std::fmt::Write as _;
use std::io::Write as _;

use crate::application::chat::ChatEntry;
use crate::ui::presentation::{GameView, ViewRenderer};

use super::presentation::view_model::TargetPanel;

#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl TerminalRenderer {
    pub fn new() -> Self {
        Self
    }

    fn emit(text: &str) {
        let mut out = std::io::stdout().lock();
        // A closed stdout is not worth crashing the client over.
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }
}

impl ViewRenderer for TerminalRenderer {
    fn render(&self, view: &GameView) {
        Self::emit(&format_view(view));
    }

    fn render_chat(&self, entry: &ChatEntry) {
        Self::emit(&format_chat(entry));
    }

    fn notify(&self, message: &str) {
        Self::emit(&format!("» {message}\n"));
    }
}

pub fn format_view(view: &GameView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n=== {} ({}) ===", view.header, view.alive_summary);

    for p in &view.players {
        let _ = writeln!(
            out,
            "  [{}] {} - {} - {}",
            p.player_id, p.display_name, p.life_label, p.role_label
        );
    }

    if !view.last_night_deaths.is_empty() {
        let _ = writeln!(out, "  † {}", view.last_night_deaths.join(", "));
    }

    if let Some(discussion) = &view.discussion {
        for line in &discussion.lines {
            let _ = writeln!(out, "  {}: {}", line.speaker, line.content);
        }
        if discussion.input_enabled {
            let _ = writeln!(out, "  (say <text>)");
        }
    }

    if let Some(vote) = &view.vote {
        write_panel(&mut out, vote, "vote");
    }
    if let Some(night) = &view.night {
        write_panel(&mut out, night, "target");
    }
    if let Some(notice) = view.night_notice {
        let _ = writeln!(out, "  {notice}");
    }

    if let Some(advance) = &view.advance {
        let state = if advance.enabled { "next" } else { "-" };
        let _ = writeln!(out, "  [{state}] {}", advance.label);
    }

    if let Some(result) = &view.result {
        let _ = writeln!(out, "  *** {result} ***");
    }

    out
}

fn write_panel(out: &mut String, panel: &TargetPanel, command: &str) {
    let _ = writeln!(out, "  {} ({command} <n>, then confirm)", panel.prompt);
    for option in &panel.options {
        let mark = if option.selected { "x" } else { " " };
        let _ = writeln!(out, "    ({mark}) {}", option.label);
    }
}

pub fn format_chat(entry: &ChatEntry) -> String {
    let at = entry.received_at.with_timezone(&chrono::Local);
    format!(
        "[{}] {}: {}\n",
        at.format("%H:%M:%S"),
        entry.player_name,
        entry.message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::presentation::view_model::{AdvanceButton, PlayerRow, TargetOption};
    use wolfpack_domain::{Phase, PlayerId};

    fn id(n: u32) -> PlayerId {
        PlayerId::new(n).expect("non-zero")
    }

    #[test]
    fn renders_roster_panel_and_advance() {
        let view = GameView {
            header: "Day 1 · Vote".into(),
            phase: Phase::Vote,
            alive_summary: "2/2 alive".into(),
            players: vec![PlayerRow {
                player_id: id(1),
                display_name: "Ann (you)".into(),
                is_alive: true,
                life_label: "alive",
                role_label: "seer",
                is_self: true,
            }],
            discussion: None,
            history: vec![],
            last_night_deaths: vec![],
            vote: Some(TargetPanel {
                prompt: "Choose a player to banish",
                options: vec![TargetOption {
                    player_id: id(2),
                    label: "Bo (2)".into(),
                    selected: true,
                }],
                submit_enabled: true,
            }),
            night: None,
            night_notice: None,
            advance: Some(AdvanceButton {
                label: "Next phase",
                enabled: false,
            }),
            result: None,
        };

        let text = format_view(&view);

        assert!(text.contains("=== Day 1 · Vote (2/2 alive) ==="));
        assert!(text.contains("[1] Ann (you) - alive - seer"));
        assert!(text.contains("(x) Bo (2)"));
        assert!(text.contains("[-] Next phase"));
    }
}
