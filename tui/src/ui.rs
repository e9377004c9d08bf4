use crate::app::App;
use companion_core::calendar::{CalendarService, SyncStatus};
use companion_core::types::{Author, CaptureStatus, Message, Route, StepMarker, Trend, WizardKind};
use companion_core::{CalendarSyncState, WizardState};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const CHIP_WIDTH: usize = 24;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame.size());

    draw_header(frame, app, chunks[0]);
    if app.route == Route::Home {
        draw_messages(frame, app, chunks[1]);
    } else {
        draw_page(frame, app.route, chunks[1]);
    }
    draw_chips(frame, app, chunks[2]);
    draw_input(frame, app, chunks[3]);
    draw_status(frame, app, chunks[4]);

    if let Some(kind) = app.active_wizard {
        draw_wizard(frame, app, kind);
    }
    if let Some(calendar) = &app.follow_up {
        draw_follow_up(frame, app, calendar);
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let tabs: Vec<Span> = [
        Route::Home,
        Route::Vitals,
        Route::Medications,
        Route::Appointments,
        Route::Emergency,
    ]
    .iter()
    .flat_map(|route| {
        let style = if *route == app.route {
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        [Span::styled(route.title(), style), Span::raw("  ")]
    })
    .collect();
    frame.render_widget(Paragraph::new(Line::from(tabs)), area);
}

fn message_lines(message: &Message) -> Vec<Line<'static>> {
    let (who, color) = match message.author {
        Author::User => ("You", Color::Blue),
        Author::Assistant => ("Assistant", Color::Green),
        Author::VoiceCapture => ("Voice", Color::Magenta),
    };

    let mut header = vec![
        Span::styled(who, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("  {}", message.display_time()),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    match message.capture_status {
        Some(CaptureStatus::Listening) => {
            header.push(Span::styled("  listening...", Style::default().fg(Color::Magenta)))
        }
        Some(CaptureStatus::Abandoned) => {
            header.push(Span::styled("  (not captured)", Style::default().fg(Color::DarkGray)))
        }
        None => {}
    }

    let mut lines = vec![Line::from(header), Line::from(message.text.clone())];

    if let Some(metrics) = &message.metrics_snapshot {
        for (name, reading) in metrics {
            let trend = match reading.trend {
                Trend::Stable => Color::Blue,
                Trend::Improving => Color::Green,
                Trend::Warning => Color::Yellow,
            };
            lines.push(Line::from(vec![
                Span::raw(format!("  {name}: {} ", reading.value)),
                Span::styled(
                    format!("{:?}", reading.trend).to_lowercase(),
                    Style::default().fg(trend),
                ),
            ]));
        }
    }
    lines.push(Line::default());
    lines
}

fn draw_messages(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.driver.state();
    let mut lines: Vec<Line> = state.messages.iter().flat_map(message_lines).collect();
    if state.assistant_busy {
        lines.push(Line::styled("Assistant is typing...", Style::default().fg(Color::DarkGray)));
    }

    let visible = area.height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(visible) as u16;
    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Health Assistant"))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(widget, area);
}

fn draw_page(frame: &mut Frame, route: Route, area: Rect) {
    let body = Paragraph::new(vec![
        Line::from(format!("{} ({})", route.title(), route.path())),
        Line::default(),
        Line::styled("Press Esc to return to the assistant.", Style::default().fg(Color::DarkGray)),
    ])
    .block(Block::default().borders(Borders::ALL).title(route.title()));
    frame.render_widget(body, area);
}

fn truncate(label: &str) -> String {
    if label.width() <= CHIP_WIDTH {
        return label.to_string();
    }
    let mut out = String::new();
    for c in label.chars() {
        if out.width() + 1 >= CHIP_WIDTH {
            break;
        }
        out.push(c);
    }
    out.push('~');
    out
}

fn draw_chips(frame: &mut Frame, app: &App, area: Rect) {
    let chips: Vec<Span> = app
        .driver
        .state()
        .current_suggestions()
        .iter()
        .enumerate()
        .flat_map(|(index, chip)| {
            let style = if index == app.selected_chip {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default().fg(Color::Cyan)
            };
            [Span::styled(format!(" {} ", truncate(chip)), style), Span::raw(" ")]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(chips)), area);
}

fn draw_input(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.driver.state();
    let title = if state.listening {
        "Listening (F1 to stop)"
    } else if !state.accepts_input() {
        "Waiting for reply (Esc to cancel)"
    } else {
        "Message"
    };
    let input = Paragraph::new(state.draft.as_str())
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(input, area);

    if app.active_wizard.is_none() && app.follow_up.is_none() {
        let x = area.x + 1 + state.draft.width() as u16;
        frame.set_cursor(x.min(area.right().saturating_sub(2)), area.y + 1);
    }
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let line = match &app.notice {
        Some(notice) => Line::styled(
            format!("{} (Esc to dismiss)", notice.message),
            Style::default().fg(Color::Red),
        ),
        None if app.route != Route::Home => Line::styled(
            "Esc back | F2 medication | F3 appointment | Ctrl-C quit",
            Style::default().fg(Color::DarkGray),
        ),
        None => Line::styled(
            "Enter send | Tab/F4 suggestions | F1 voice | F2 medication | F3 appointment | \
             Ctrl-C quit",
            Style::default().fg(Color::DarkGray),
        ),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn draw_wizard(frame: &mut Frame, app: &App, kind: WizardKind) {
    let wizard: &WizardState = match kind {
        WizardKind::AddMedication => &app.medication,
        WizardKind::ScheduleAppointment => &app.appointment,
    };
    let area = centered(frame.size(), 64, 18);
    frame.render_widget(Clear, area);

    let markers: Vec<Span> = wizard
        .step_markers()
        .into_iter()
        .enumerate()
        .map(|(index, marker)| {
            let color = match marker {
                StepMarker::Current => Color::Blue,
                StepMarker::Completed => Color::LightBlue,
                StepMarker::Upcoming => Color::DarkGray,
            };
            Span::styled(format!(" ({}) ", index + 1), Style::default().fg(color))
        })
        .collect();

    let mut lines = vec![
        Line::from(markers),
        Line::styled(wizard.step_title(), Style::default().add_modifier(Modifier::BOLD)),
        Line::default(),
    ];

    if let Some(step) = wizard.definition.step(wizard.current_step) {
        for (index, spec) in step.fields.iter().enumerate() {
            let shown = app.field_display(kind, spec.name);
            let marker = if index == app.selected_field { "> " } else { "  " };
            let required = if spec.required { "*" } else { "" };
            lines.push(Line::from(vec![
                Span::raw(format!("{marker}{}{required}: ", spec.label)),
                Span::styled(shown, Style::default().fg(Color::Cyan)),
            ]));
            if let Some(error) = wizard.errors.get(spec.name) {
                lines.push(Line::styled(format!("    {error}"), Style::default().fg(Color::Red)));
            }
        }
    }

    lines.push(Line::default());
    let back = if wizard.can_go_back() { "PgUp Back | " } else { "" };
    lines.push(Line::styled(
        format!("{back}Enter {} | Tab options | Esc cancel", wizard.primary_label()),
        Style::default().fg(Color::DarkGray),
    ));

    let dialog = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(wizard.definition.title))
        .wrap(Wrap { trim: false });
    frame.render_widget(dialog, area);
}

fn draw_follow_up(frame: &mut Frame, app: &App, calendar: &CalendarSyncState) {
    let area = centered(frame.size(), 56, 18);
    frame.render_widget(Clear, area);

    let appointment = &calendar.appointment;
    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::styled(
            appointment.type_label().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::styled(appointment.when(), dim),
        Line::styled(format!("with {}", appointment.provider), dim),
        Line::default(),
    ];

    for (index, service) in CalendarService::ALL.iter().enumerate() {
        let selected = calendar.selected == Some(*service);
        let style = if selected {
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let check = if calendar.is_synced(*service) { "  [done]" } else { "" };
        lines.push(Line::styled(
            format!("{}. {}{check}", index + 1, service.name()),
            style,
        ));
    }

    let invite = if calendar.email_invite { "[x]" } else { "[ ]" };
    lines.push(Line::default());
    lines.push(Line::from(format!("{invite} Email me a calendar invitation (e)")));

    if let Some(status) = calendar.status_text() {
        let color = match calendar.status {
            SyncStatus::Syncing => Color::Blue,
            _ => Color::Green,
        };
        lines.push(Line::default());
        lines.push(Line::styled(status, Style::default().fg(color)));
    }
    if let Some(path) = &app.exported {
        lines.push(Line::styled(format!("Saved {}", path.display()), dim));
    }

    lines.push(Line::default());
    lines.push(Line::styled(
        "You can always update this event in your calendar later",
        dim,
    ));
    lines.push(Line::styled("1-4 choose | Enter/Esc close", dim));

    let dialog = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Add to Calendar"))
        .wrap(Wrap { trim: false });
    frame.render_widget(dialog, area);
}
