use djangogen::scaffold::ScaffoldReport;

pub fn print_success(message: &str) {
    println!("✅ {}", message);
}

pub fn print_info(message: &str) {
    println!("ℹ️  {}", message);
}

pub fn print_warning(message: &str) {
    println!("⚠️  {}", message);
}

pub fn print_error(message: &str) {
    eprintln!("❌ {}", message);
}

pub fn print_usage(usage: &str) {
    println!("Usage: djangogen {}", usage);
}

/// One line per touched file, then any warnings
pub fn print_report(report: &ScaffoldReport) {
    for path in &report.created {
        println!("  📄 created  {}", path);
    }
    for path in &report.updated {
        println!("  ✏️  updated  {}", path);
    }
    for path in &report.skipped {
        println!("  ⏭️  skipped  {}", path);
    }
    for warning in &report.warnings {
        print_warning(warning);
    }
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        format!("1 {}", word)
    } else {
        format!("{} {}s", count, word)
    }
}

/// Positional argument as `&str`, when given
pub fn positional<'a>(matches: &'a clap::ArgMatches, id: &str) -> Option<&'a str> {
    matches.get_one::<String>(id).map(|s| s.as_str()).filter(|s| !s.trim().is_empty())
}
