use console::{Emoji, style};

pub static SUCCESS_ICON: Emoji<'_, '_> = Emoji("✅ ", "");
pub static INFO_ICON: Emoji<'_, '_> = Emoji("ℹ️  ", "");
pub static WARN_ICON: Emoji<'_, '_> = Emoji("⚠️  ", "");
pub static ERROR_ICON: Emoji<'_, '_> = Emoji("❌ ", "");
pub static GLOBE: Emoji<'_, '_> = Emoji("🌐 ", "");
pub static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");
pub static PHONE: Emoji<'_, '_> = Emoji("📞 ", "");

pub fn print_success(msg: &str) {
    println!("{} {}", SUCCESS_ICON, style(msg).green());
}

pub fn print_info(msg: &str) {
    println!("{} {}", INFO_ICON, style(msg).blue());
}

pub fn print_warn(msg: &str) {
    println!("{} {}", WARN_ICON, style(msg).yellow());
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", ERROR_ICON, style(msg).red().bold());
}

pub fn print_status(label: &str, msg: &str) {
    println!("  {} {}: {}", GEAR, style(label).bold().cyan(), msg);
}

pub fn print_link(label: &str, url: &str) {
    println!(
        "  {} {}: {}",
        GLOBE,
        style(label).bold(),
        style(url).underlined().cyan()
    );
}

pub fn print_banner() {
    let lines: &[&str] = &[
        "          _ _ _                         _ ",
        "  ___ __ _| | | |__   ___   __ _ _ __ __| |",
        " / __/ _` | | | '_ \\ / _ \\ / _` | '__/ _` |",
        "| (_| (_| | | | |_) | (_) | (_| | | | (_| |",
        " \\___\\__,_|_|_|_.__/ \\___/ \\__,_|_|  \\__,_|",
    ];

    println!();
    for line in lines {
        println!("{}", style(*line).magenta().bold());
    }
    println!(
        "{}\n",
        style("Your calls, handled while you work.").cyan()
    );
}

/// A titled block of aligned command/status lines for help output.
pub struct GuideSection {
    title: String,
    rows: Vec<String>,
}

impl GuideSection {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            rows: Vec::new(),
        }
    }

    pub fn command(mut self, name: &str, description: &str) -> Self {
        self.rows.push(format!(
            "  {:<24} {}",
            style(name).green().bold(),
            description
        ));
        self
    }

    pub fn info(mut self, msg: &str) -> Self {
        self.rows.push(format!("  {}", style(msg).dim()));
        self
    }

    pub fn print(self) {
        println!("\n {}", style(self.title).bold().underlined());
        for row in self.rows {
            println!("{}", row);
        }
    }
}
