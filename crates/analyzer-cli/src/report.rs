//! Output formatting for analysis results.

use analyzer_core::verdict::Verdict;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {s}. Use 'text' or 'json'.")),
        }
    }
}

pub fn print_verdict(url: &str, verdict: &Verdict, format: OutputFormat) {
    match format {
        OutputFormat::Text => print_text(url, verdict),
        OutputFormat::Json => print_json(url, verdict),
    }
}

fn print_text(url: &str, verdict: &Verdict) {
    println!("URL:     {url}");
    println!("Level:   {}", verdict.level);
    println!("Message: {}", verdict.message);
}

fn print_json(url: &str, verdict: &Verdict) {
    let output = serde_json::json!({
        "url": url,
        "level": verdict.level,
        "message": verdict.message,
    });
    println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
}
