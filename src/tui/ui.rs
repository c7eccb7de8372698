use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::input_box::INPUT_HEIGHT;
use crate::tui::components::{AlertPopup, MessageList, ModeBar, TitleBar};

/// Panel layout, top to bottom:
///
/// ```text
/// title bar      (1)
/// mode bar       (1)
/// message log    (rest)
/// URL box        (3)
/// message box    (3)
/// key hints      (1)
/// ```
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([
        Length(1),
        Length(1),
        Min(0),
        Length(INPUT_HEIGHT),
        Length(INPUT_HEIGHT),
        Length(1),
    ]);
    let [title_area, mode_area, log_area, url_area, message_area, hint_area] =
        layout.areas(frame.area());

    MessageList::new(&mut tui.message_list, &app.log).render(frame, log_area);

    TitleBar::new(
        app.connection,
        app.connecting,
        app.url.clone(),
        app.status_message.clone(),
        tui.message_list.has_unseen_content,
    )
    .render(frame, title_area);

    ModeBar::new(app.mode).render(frame, mode_area);

    tui.url_box.render(frame, url_area);
    tui.message_box.render(frame, message_area);

    draw_key_hints(frame, hint_area, app);

    if let Some(message) = &app.alert {
        AlertPopup::new(message).render(frame, frame.area());
    }
}

/// Bottom line of key bindings. Bindings that do nothing in the current
/// connection state are dimmed.
fn draw_key_hints(frame: &mut Frame, area: Rect, app: &App) {
    let controls = app.controls();
    let key = Style::default().fg(Color::Cyan);
    let off = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::DIM);
    let text = Style::default().fg(Color::DarkGray);

    let hint = |keys: &'static str, label: &'static str, enabled: bool| {
        let (k, t) = if enabled { (key, text) } else { (off, off) };
        [Span::styled(keys, k), Span::styled(label, t)]
    };

    let enter_label = if controls.connect {
        " connect  "
    } else {
        " send  "
    };

    let spans: Vec<Span> = [
        hint("Enter", enter_label, controls.connect || controls.send),
        hint("Ctrl+D", " disconnect  ", controls.disconnect),
        hint("F1-F3/Tab", " mode  ", true),
        hint("↑↓/PgUp/PgDn", " scroll  ", true),
        hint("Esc", " quit", true),
    ]
    .into_iter()
    .flatten()
    .collect();

    frame.render_widget(Line::from(spans), area);
}
