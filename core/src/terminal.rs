//! Command interpreters for the boot screen and the desktop mini terminal.
//!
//! Both only match a word against a fixed vocabulary; side effects on the page
//! are returned as an [`Effect`] for the caller to carry out.

pub const GUEST_USER: &str = "guest";
pub const DEFAULT_LOGIN: &str = "henrique";
pub const HOST_NAME: &str = "arch";
pub const LOGIN_DELAY_MS: i32 = 400;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Style {
    Plain,
    Muted,
    Code,
    Cmd,
    Path,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    pub style: Style,
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::default().push(Style::Plain, text)
    }

    /// A muted label followed by plain text, the common shape of status lines.
    pub fn labeled(label: &str, text: impl Into<String>) -> Self {
        Self::default()
            .push(Style::Muted, label)
            .push(Style::Plain, text)
    }

    pub fn push(mut self, style: Style, text: impl Into<String>) -> Self {
        self.spans.push(Span {
            style,
            text: text.into(),
        });
        self
    }

    pub fn text(&self) -> String {
        self.spans.iter().map(|span| span.text.as_str()).collect()
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for span in &self.spans {
            let text = escape_html(&span.text);
            match span.style {
                Style::Plain => html.push_str(&text),
                Style::Code => {
                    html.push_str("<code>");
                    html.push_str(&text);
                    html.push_str("</code>");
                }
                Style::Muted => push_class_span(&mut html, "muted", &text),
                Style::Cmd => push_class_span(&mut html, "cmd", &text),
                Style::Path => push_class_span(&mut html, "path", &text),
            }
        }
        html
    }
}

fn push_class_span(html: &mut String, class: &str, text: &str) {
    html.push_str("<span class=\"");
    html.push_str(class);
    html.push_str("\">");
    html.push_str(text);
    html.push_str("</span>");
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Wipe the terminal's output (after the echo line was printed).
    ClearOutput,
    /// Switch from the boot screen to the desktop after [`LOGIN_DELAY_MS`].
    EnterDesktop,
    OpenPaint,
    Logout,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandOutput {
    pub lines: Vec<Line>,
    pub effect: Option<Effect>,
}

pub struct Session {
    user: String,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            user: GUEST_USER.to_string(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn host_label(&self) -> String {
        format!("{}@{HOST_NAME}", self.user)
    }

    pub fn window_title(&self) -> String {
        format!("Hypr-ish — {}", self.user)
    }

    pub fn logout(&mut self) {
        self.user = GUEST_USER.to_string();
    }

    pub fn banner() -> Vec<Line> {
        vec![
            Line::labeled("[ ok ]", " booting arch@rice..."),
            Line::labeled("[ ok ]", " loading hypr-ish session manager..."),
            Line::labeled("[ ok ]", " starting tty1"),
            Line::blank(),
            Line::plain("Type ")
                .push(Style::Code, "help")
                .push(Style::Plain, " for commands."),
            Line::blank(),
        ]
    }

    fn echo(&self, input: &str) -> Line {
        Line::default()
            .push(Style::Cmd, self.host_label())
            .push(Style::Plain, ":")
            .push(Style::Path, "~")
            .push(Style::Plain, format!("$ {input}"))
    }

    /// Boot screen vocabulary: `help`, `whoami`, `clear`, `login [name]`.
    /// Blank input produces nothing.
    pub fn run_boot(&mut self, raw: &str) -> Option<CommandOutput> {
        let input = raw.trim();
        if input.is_empty() {
            return None;
        }
        let mut lines = vec![self.echo(input)];
        let mut words = input.split_whitespace();
        let cmd = words.next()?;
        let effect = match cmd.to_lowercase().as_str() {
            "help" => {
                lines.push(Line::labeled("Commands:", " help, login [name], clear, whoami"));
                lines.push(
                    Line::labeled("Tip:", " type ")
                        .push(Style::Code, "login")
                        .push(Style::Plain, " to enter the desktop."),
                );
                None
            }
            "whoami" => {
                lines.push(Line::plain(self.user.clone()));
                None
            }
            "clear" => Some(Effect::ClearOutput),
            "login" => {
                let name = words.collect::<Vec<_>>().join(" ");
                self.user = if name.is_empty() {
                    DEFAULT_LOGIN.to_string()
                } else {
                    name
                };
                lines.push(Line::labeled("auth:", format!(" welcome, {}.", self.user)));
                lines.push(Line::labeled("session:", " starting desktop..."));
                Some(Effect::EnterDesktop)
            }
            _ => {
                lines.push(Line::labeled("command not found:", format!(" {cmd}")));
                None
            }
        };
        Some(CommandOutput { lines, effect })
    }

    /// Desktop terminal vocabulary: `help`, `clear`, `logout`, `paint`,
    /// `neofetch`.
    pub fn run_mini(&self, raw: &str) -> Option<CommandOutput> {
        let input = raw.trim();
        if input.is_empty() {
            return None;
        }
        let mut lines = vec![self.echo(input)];
        let cmd = input.split_whitespace().next()?;
        let effect = match cmd.to_lowercase().as_str() {
            "help" => {
                lines.push(Line::labeled(
                    "Commands:",
                    " help, neofetch, paint, logout, clear",
                ));
                None
            }
            "clear" => Some(Effect::ClearOutput),
            "logout" => Some(Effect::Logout),
            "paint" => Some(Effect::OpenPaint),
            "neofetch" => {
                lines.extend(self.neofetch());
                None
            }
            _ => {
                lines.push(Line::labeled("command not found:", format!(" {cmd}")));
                None
            }
        };
        Some(CommandOutput { lines, effect })
    }

    fn neofetch(&self) -> Vec<Line> {
        [
            ("      /\\", format!("   {}", self.host_label())),
            ("     /  \\", "   OS: arch@rice (fake)".to_string()),
            ("    /\\   \\", "  WM: Hypr-ish".to_string()),
            ("   /      \\", " Draw: enabled".to_string()),
            ("  /  /\\    \\", " Uptime: yes".to_string()),
        ]
        .into_iter()
        .map(|(logo, info)| Line::labeled(logo, info))
        .collect()
    }
}
