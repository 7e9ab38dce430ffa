use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Styles by role in marketdb's terminal output
#[derive(Debug, Clone)]
pub struct Theme {
    /// Command banners and group titles
    pub title: Style,
    /// Completed writes
    pub ok: Style,
    pub warn: Style,
    /// Left-hand labels of stat lines
    pub key: Style,
    /// Counts and other figures
    pub figure: Style,
    /// Rules and placeholders
    pub faint: Style,
}

impl Theme {
    pub fn for_stdout() -> Self {
        if console::Term::stdout().features().colors_supported() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    pub fn colored() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            ok: Style::new().green().bold(),
            warn: Style::new().yellow().bold(),
            key: Style::new().white().dimmed(),
            figure: Style::new().magenta().bold(),
            faint: Style::new().bright_black(),
        }
    }

    pub fn plain() -> Self {
        Self {
            title: Style::new(),
            ok: Style::new(),
            warn: Style::new(),
            key: Style::new(),
            figure: Style::new(),
            faint: Style::new(),
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::for_stdout)
}
