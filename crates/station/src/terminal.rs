// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Interactive scan station on the terminal.
//!
//! One `select!` loop owns the [`Station`]. A blocking reader thread forwards
//! key presses over a channel; while a handler awaits a prompt, the prompt
//! reads from that same channel, so no other handler runs in between.

use std::future::Future;
use std::io::{self, Write};
use std::pin::Pin;
use std::time::Duration;

use crossterm::event::{self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Print, Stylize};
use crossterm::{cursor, terminal, ExecutableCommand, QueueableCommand};
use tokio::sync::mpsc;
use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};

use crate::admin::AdminState;
use crate::commands::Session;
use crate::display::{admin_label, format_active_line, limit_label};
use crate::error::{Error, Result};
use crate::notify::{Notice, Tone, NOTICE_TTL};
use crate::prompt::{normalize_answer, BellAlert, Prompt};
use crate::scan::{InputEvent, KeyInput};
use crate::station::Station;

const TICK: Duration = Duration::from_secs(1);

const KEY_HELP: &str = "^S scan  ^P period  ^E enroll  ^U unlock  ^L lock  ^B badge  ^R roster start  Esc quit";

/// What one key press asks the loop to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    Input(InputEvent),
    ToggleScan,
    CycleFilter,
    Enroll,
    Unlock,
    Lock,
    TypeBadge,
    StartFromRoster,
    Quit,
    Ignore,
}

pub(crate) fn map_key(key: &KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Action::Quit,
            KeyCode::Char('s') => Action::ToggleScan,
            KeyCode::Char('p') => Action::CycleFilter,
            KeyCode::Char('e') => Action::Enroll,
            KeyCode::Char('u') => Action::Unlock,
            KeyCode::Char('l') => Action::Lock,
            KeyCode::Char('b') => Action::TypeBadge,
            KeyCode::Char('r') => Action::StartFromRoster,
            _ => Action::Ignore,
        };
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        return Action::Ignore;
    }
    match key.code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Char(c) => Action::Input(InputEvent::surface(KeyInput::Char(c))),
        KeyCode::Enter => Action::Input(InputEvent::surface(KeyInput::Enter)),
        KeyCode::Tab => Action::Input(InputEvent::surface(KeyInput::Tab)),
        _ => Action::Ignore,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineEdit {
    Continue,
    Submit,
    Cancel,
}

/// Applies one key to a prompt's line buffer.
pub(crate) fn edit_line(line: &mut String, key: &KeyEvent) -> LineEdit {
    match key.code {
        KeyCode::Enter => LineEdit::Submit,
        KeyCode::Esc => LineEdit::Cancel,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => LineEdit::Cancel,
        KeyCode::Backspace => {
            line.pop();
            LineEdit::Continue
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            line.push(c);
            LineEdit::Continue
        }
        _ => LineEdit::Continue,
    }
}

/// The station screen, top to bottom, without notice or key help.
pub(crate) fn screen_lines(station: &Station, online: bool) -> Vec<String> {
    let now = station.now();
    let settings = station.settings();
    let filter = station.filter();
    let mut lines = vec![
        format!(
            "Hall Pass  {} ({})  Period: {}  Scan: {}  Admin: {}  [{}]",
            settings.destination,
            limit_label(settings.max_minutes),
            filter,
            if station.scan_mode() { "on" } else { "off" },
            admin_label(station.admin_state(), now),
            if online { "online" } else { "offline" },
        ),
        String::new(),
    ];

    let out: Vec<_> = station
        .passes()
        .active()
        .iter()
        .filter(|p| filter.matches(p.period))
        .collect();
    lines.push(format!("Out now: {}", out.len()));
    if out.is_empty() {
        lines.push("  (nobody out)".to_string());
    }
    for pass in out {
        lines.push(format!("  {}", format_active_line(pass, now)));
    }

    lines.push(String::new());
    lines.push(format!(
        "Roster: {} students in view",
        station.visible_roster().len()
    ));
    if let Some(code) = station.last_scan() {
        lines.push(format!("Last scan: {code}"));
    }
    lines
}

/// Raw mode plus the alternate screen, restored on drop.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode().map_err(Error::Io)?;
        let mut stdout = io::stdout();
        let _ = stdout.execute(terminal::EnterAlternateScreen);
        let _ = stdout.execute(cursor::Hide);
        Ok(TerminalGuard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = stdout.execute(cursor::Show);
        let _ = stdout.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn spawn_key_reader(tx: mpsc::UnboundedSender<KeyEvent>) {
    std::thread::spawn(move || loop {
        match event::read() {
            Ok(event::Event::Key(key)) if key.kind == KeyEventKind::Press => {
                if tx.send(key).is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "terminal read failed");
                break;
            }
        }
    });
}

fn draw(lines: &[String], notice: Option<&Notice>) -> io::Result<()> {
    let mut stdout = io::stdout();
    stdout.queue(cursor::MoveTo(0, 0))?;
    stdout.queue(terminal::Clear(terminal::ClearType::All))?;
    for line in lines {
        stdout.queue(Print(line))?;
        stdout.queue(Print("\r\n"))?;
    }
    stdout.queue(Print("\r\n"))?;
    if let Some(notice) = notice {
        let text = notice.message.clone();
        let styled = match notice.tone {
            Tone::Success => text.green(),
            Tone::Error => text.red(),
            Tone::Info => text.cyan(),
        };
        stdout.queue(Print(styled))?;
    }
    stdout.queue(Print("\r\n\r\n"))?;
    stdout.queue(Print(KEY_HELP.dark_grey()))?;
    stdout.flush()
}

fn draw_prompt(message: &str, line: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    let (_, rows) = terminal::size().unwrap_or((80, 24));
    stdout.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    stdout.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
    stdout.queue(Print(format!("{} {}_", message, line).bold()))?;
    stdout.flush()
}

/// Prompt on the bottom line, fed by the loop's key channel.
struct TerminalPrompt<'a> {
    keys: &'a mut mpsc::UnboundedReceiver<KeyEvent>,
}

impl Prompt for TerminalPrompt<'_> {
    fn ask(&mut self, message: &str) -> Pin<Box<dyn Future<Output = Option<String>> + Send + '_>> {
        let message = message.to_string();
        Box::pin(async move {
            let mut line = String::new();
            loop {
                let _ = draw_prompt(&message, &line);
                let key = self.keys.recv().await?;
                match edit_line(&mut line, &key) {
                    LineEdit::Continue => {}
                    LineEdit::Submit => return normalize_answer(Some(line)),
                    LineEdit::Cancel => return None,
                }
            }
        })
    }
}

/// The latest notice and when it was shown.
#[derive(Default)]
struct NoticeBoard {
    current: Option<(Notice, Instant)>,
}

impl NoticeBoard {
    fn post(&mut self, mut notices: Vec<Notice>) {
        if let Some(latest) = notices.pop() {
            self.current = Some((latest, Instant::now()));
        }
    }

    fn visible(&self) -> Option<&Notice> {
        self.current
            .as_ref()
            .filter(|(_, shown)| shown.elapsed() < NOTICE_TTL)
            .map(|(notice, _)| notice)
    }
}

/// Runs the station until Esc or Ctrl-C.
pub async fn run(session: Session) -> Result<()> {
    let online = session.is_online();
    tracing::info!(
        state_dir = %session.state_dir.display(),
        tenant = %session.config.tenant,
        online,
        "station running"
    );
    let (mut station, sync, mut events) = session.into_parts();

    let guard = TerminalGuard::enter()?;
    let (key_tx, mut keys) = mpsc::unbounded_channel();
    spawn_key_reader(key_tx);

    let _bootstrap = sync.bootstrap();
    let _subscription = sync.spawn_subscription();

    let mut admin_tick = interval(TICK);
    admin_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut redraw = interval(TICK);
    redraw.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut board = NoticeBoard::default();
    let mut alert = BellAlert;

    loop {
        board.post(station.take_notices());
        if let Err(e) = draw(&screen_lines(&station, online), board.visible()) {
            tracing::warn!(error = %e, "draw failed");
        }

        let deadline = station.decoder().deadline();
        let unlocked = matches!(station.admin_state(), AdminState::Unlocked { .. });

        tokio::select! {
            key = keys.recv() => {
                let Some(key) = key else { break };
                let mut prompt = TerminalPrompt { keys: &mut keys };
                match map_key(&key) {
                    Action::Quit => break,
                    Action::Ignore => {}
                    Action::Input(input) => {
                        station
                            .handle_input(input, Instant::now(), &mut prompt, &mut alert)
                            .await;
                    }
                    Action::ToggleScan => {
                        let on = !station.scan_mode();
                        station.set_scan_mode(on);
                        station.notify(Notice::info(if on { "Scan mode on" } else { "Scan mode off" }));
                    }
                    Action::CycleFilter => {
                        let filter = station.cycle_filter();
                        station.notify(Notice::info(format!("Period: {filter}")));
                    }
                    Action::Enroll => {
                        let result = station.request_enroll();
                        station.notify_result(result);
                    }
                    Action::Unlock => {
                        let result = station.request_unlock();
                        station.notify_result(result);
                    }
                    Action::Lock => station.lock_admin(),
                    Action::TypeBadge => {
                        if let Some(code) = prompt.ask("Badge code:").await {
                            station.enter_badge(&code);
                        }
                    }
                    Action::StartFromRoster => {
                        if let Some(id) = prompt.ask("Student ID:").await {
                            let result = station.start_from_roster(&id);
                            station.notify_result(result);
                        }
                    }
                }
            }
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                let mut prompt = TerminalPrompt { keys: &mut keys };
                station
                    .handle_scan_timer(Instant::now(), &mut prompt, &mut alert)
                    .await;
            }
            _ = admin_tick.tick(), if unlocked => {
                station.admin_tick();
            }
            _ = redraw.tick() => {}
            Some(event) = events.recv() => station.apply_sync(event),
        }
    }

    drop(guard);
    tracing::info!("station stopping");
    sync.shutdown().await;
    station.save_all();
    Ok(())
}

#[cfg(test)]
#[path = "terminal_tests.rs"]
mod tests;
