use colored::Colorize;

pub struct Theme {
    pub query: fn(&str) -> String,
    pub translation: fn(&str) -> String,
    pub diagnostic: fn(&str) -> String,
    pub placeholder: fn(&str) -> String,
    pub loading: fn(&str) -> String,
    pub idx: fn(&str) -> String,
    pub link: fn(&str) -> String,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name {
            "temp" | "" => Self::temp(),
            "wudao" => Self::wudao(),
            "canvas" => Self::canvas(),
            _ => {
                eprintln!("{}", format!("✘ Unknown theme: {}", name).red());
                Self::temp()
            }
        }
    }

    fn temp() -> Self {
        Self {
            query: |s| s.bright_magenta().italic().bold().underline().to_string(),
            translation: |s| s.yellow().to_string(),
            diagnostic: |s| s.red().italic().to_string(),
            placeholder: |s| s.bright_black().dimmed().to_string(),
            loading: |s| s.cyan().dimmed().to_string(),
            idx: |s| s.bright_white().to_string(),
            link: |s| s.bright_white().dimmed().italic().to_string(),
        }
    }

    fn wudao() -> Self {
        Self {
            query: |s| s.red().italic().bold().underline().to_string(),
            translation: |s| s.bright_white().to_string(),
            diagnostic: |s| s.bright_yellow().italic().to_string(),
            placeholder: |s| s.bright_black().dimmed().to_string(),
            loading: |s| s.green().italic().to_string(),
            idx: |s| s.bright_white().to_string(),
            link: |s| s.cyan().italic().to_string(),
        }
    }

    fn canvas() -> Self {
        Self {
            query: |s| s.blue().bold().underline().to_string(),
            translation: |s| s.black().to_string(),
            diagnostic: |s| s.red().bold().to_string(),
            placeholder: |s| s.bright_black().italic().to_string(),
            loading: |s| s.magenta().to_string(),
            idx: |s| s.cyan().to_string(),
            link: |s| s.bright_blue().to_string(),
        }
    }
}
