//! Display style roles for the front desk console
//!
//! Each logical role (a table header, the client being served, an error line)
//! is a variant of [`StyleRole`] mapped to an optional `colored::Color`.
//! Colour is only applied when the caller passes `enabled = true`, so no
//! global colour state is needed.
//!
//! ```
//! use clinic_queue::core::styles::StyleRole;
//! assert_eq!(StyleRole::Header.paint("Queue", false), "Queue");
//! assert!(StyleRole::Header.paint("Queue", true).starts_with("\x1b["));
//! ```

use clap::builder::styling::AnsiColor;
use colored::Color;

macro_rules! style {
    ( $( $variant:ident => $color:expr ),+ $(,)? ) => {
        #[derive(Copy, Clone, Debug, PartialEq, Eq)]
        pub enum StyleRole { $( $variant ),+ }

        impl StyleRole {
            pub fn color(self) -> Option<Color> {
                match self { $( StyleRole::$variant => $color ),+ }
            }
        }
    }
}

style! {
    Header  => Some(Color::Yellow),
    Serving => Some(Color::BrightGreen),
    Booked  => Some(Color::Cyan),
    WalkIn  => Some(Color::Magenta),
    Notice  => Some(Color::Blue),
    Error   => Some(Color::BrightRed),
    Dim     => Some(Color::BrightBlack),
    Value   => None,
}

impl StyleRole {
    pub fn ansi_code(self) -> Option<String> {
        self.color().and_then(ansi_code)
    }

    pub fn paint(self, text: &str, enabled: bool) -> String {
        match self.ansi_code() {
            Some(code) if enabled => format!("\x1b[{code}m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    }

    /// prettytable cell style spec (`F` + colour letter)
    pub fn to_prettytable_spec(self) -> Option<String> {
        let spec_char = match self.color()? {
            Color::Black => "k",
            Color::Red => "r",
            Color::Green => "g",
            Color::Yellow => "y",
            Color::Blue => "b",
            Color::Magenta => "m",
            Color::Cyan => "c",
            Color::White => "w",
            Color::BrightBlack => "K",
            Color::BrightRed => "R",
            Color::BrightGreen => "G",
            Color::BrightYellow => "Y",
            Color::BrightBlue => "B",
            Color::BrightMagenta => "M",
            Color::BrightCyan => "C",
            Color::BrightWhite => "W",
            _ => return None,
        };
        Some(format!("F{spec_char}"))
    }
}

fn ansi_code(c: Color) -> Option<String> {
    use Color::*;
    let code = match c {
        Black => "30".to_string(),
        Red => "31".to_string(),
        Green => "32".to_string(),
        Yellow => "33".to_string(),
        Blue => "34".to_string(),
        Magenta => "35".to_string(),
        Cyan => "36".to_string(),
        White => "37".to_string(),
        BrightBlack => "90".to_string(),
        BrightRed => "91".to_string(),
        BrightGreen => "92".to_string(),
        BrightYellow => "93".to_string(),
        BrightBlue => "94".to_string(),
        BrightMagenta => "95".to_string(),
        BrightCyan => "96".to_string(),
        BrightWhite => "97".to_string(),
        TrueColor { r, g, b } => format!("38;2;{r};{g};{b}"),
        #[allow(unreachable_patterns)]
        _ => return None,
    };
    Some(code)
}

fn color_to_ansi(c: Color) -> Option<AnsiColor> {
    use self::AnsiColor as A;
    use Color::*;
    Some(match c {
        Black => A::Black,
        Red => A::Red,
        Green => A::Green,
        Yellow => A::Yellow,
        Blue => A::Blue,
        Magenta => A::Magenta,
        Cyan => A::Cyan,
        White => A::White,
        BrightBlack => A::BrightBlack,
        BrightRed => A::BrightRed,
        BrightGreen => A::BrightGreen,
        BrightYellow => A::BrightYellow,
        BrightBlue => A::BrightBlue,
        BrightMagenta => A::BrightMagenta,
        BrightCyan => A::BrightCyan,
        BrightWhite => A::BrightWhite,
        _ => return None,
    })
}

/// clap help styles built from the same roles
pub fn clap_styles(enabled: bool) -> clap::builder::Styles {
    use clap::builder::styling::{Color as ClapColor, Style};
    if !enabled {
        return clap::builder::Styles::plain();
    }

    let style = |role: StyleRole, bold: bool| {
        let mut s = Style::new();
        if let Some(col) = role.color().and_then(color_to_ansi) {
            s = s.fg_color(Some(ClapColor::Ansi(col)));
        }
        if bold {
            s = s.bold();
        }
        s
    };

    clap::builder::Styles::styled()
        .header(style(StyleRole::Header, true))
        .usage(style(StyleRole::Header, true))
        .literal(style(StyleRole::Booked, false))
        .placeholder(style(StyleRole::Serving, false))
        .error(style(StyleRole::Error, true))
}
