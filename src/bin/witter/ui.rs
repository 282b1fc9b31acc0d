use std::fmt::Display;
use std::io::IsTerminal;

use nu_ansi_term::{Color, Style};

/// Plain-text printer for command results, coloured when stdout is a TTY.
pub struct Ui {
    palette: Palette,
    paint: bool,
}

impl Ui {
    pub fn new() -> Self {
        let paint = std::io::stdout().is_terminal();

        #[cfg(windows)]
        if paint {
            let _ = nu_ansi_term::enable_ansi_support();
        }

        Self {
            palette: Palette::dark(),
            paint,
        }
    }

    pub fn section<'a, I, V>(&self, title: &str, rows: I)
    where
        I: IntoIterator<Item = (&'a str, V)>,
        V: Display,
    {
        let rows: Vec<(String, String)> = rows
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        if rows.is_empty() {
            return;
        }

        self.heading(title);
        let key_width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (key, value) in rows {
            if self.paint {
                println!(
                    "  {} {}",
                    self.palette.key.paint(format!("{key:>key_width$}:")),
                    self.palette.value.paint(value)
                );
            } else {
                println!("  {key:>key_width$}: {value}");
            }
        }
    }

    /// Prints `entries` under `title`, or a note when there are none.
    pub fn list<I>(&self, title: &str, entries: I)
    where
        I: IntoIterator<Item = String>,
    {
        let entries: Vec<String> = entries.into_iter().collect();
        self.heading(title);
        if entries.is_empty() {
            self.info("(none)");
            return;
        }
        for entry in entries {
            if self.paint {
                println!("  {} {entry}", self.palette.bullet.paint("•"));
            } else {
                println!("  - {entry}");
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.paint {
            println!("  {}", self.palette.info.paint(message));
        } else {
            println!("  {message}");
        }
    }

    pub fn answer(&self, yes: bool, message: &str) {
        let (icon, style) = if yes {
            (SUCCESS_ICON, self.palette.success)
        } else {
            (NO_ICON, self.palette.warn)
        };
        if self.paint {
            println!("{} {message}", style.paint(icon));
        } else {
            println!("{icon} {message}");
        }
    }

    fn heading(&self, title: &str) {
        let formatted = format!("{HEADING_ICON} {title}");
        if self.paint {
            println!("{}", self.palette.heading.paint(formatted));
        } else {
            println!("{formatted}");
        }
    }
}

struct Palette {
    heading: Style,
    key: Style,
    value: Style,
    bullet: Style,
    info: Style,
    success: Style,
    warn: Style,
}

impl Palette {
    fn dark() -> Self {
        Self {
            heading: Style::new().fg(Color::Purple).bold(),
            key: Style::new().fg(Color::LightBlue).bold(),
            value: Style::new().fg(Color::White),
            bullet: Style::new().fg(Color::LightBlue),
            info: Style::new().fg(Color::LightCyan),
            success: Style::new().fg(Color::LightGreen).bold(),
            warn: Style::new().fg(Color::Yellow).bold(),
        }
    }
}

const HEADING_ICON: &str = "▸";
const SUCCESS_ICON: &str = "✔";
const NO_ICON: &str = "✘";
