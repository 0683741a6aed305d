use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "rangecat")]
#[command(version)]
#[command(about = "Read files and HTTP resources as one random-access byte range", long_about = None)]
#[command(after_help = "Examples:\n  \
  rangecat part1.bin part2.bin -s 4096 -n 512 -x   hexdump 512 bytes across both files\n  \
  rangecat -l a.bin https://example.com/b.bin      show the member table\n  \
  rangecat vol.00 vol.01 vol.02 > joined.bin       concatenate volumes")]
pub struct Cli {
    /// File paths or HTTP URLs, in address order
    #[arg(value_name = "SOURCES", required = true)]
    pub sources: Vec<String>,

    /// Global position to start reading at
    #[arg(short = 's', long, value_name = "OFFSET", default_value_t = 0)]
    pub offset: u64,

    /// Number of bytes to read (default: to the end)
    #[arg(short = 'n', long, value_name = "LENGTH")]
    pub length: Option<u64>,

    /// Hexdump instead of writing raw bytes
    #[arg(short = 'x', long)]
    pub hex: bool,

    /// List members with their global start offsets
    #[arg(short = 'l', long)]
    pub list: bool,

    /// More logging (-v, -vv, -vvv)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode, no transfer statistics
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_http_url(source: &str) -> bool {
        source.starts_with("http://") || source.starts_with("https://")
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet > 0
    }

    /// Default log filter for the requested verbosity
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_range_options() {
        let cli = Cli::parse_from(["rangecat", "-s", "100", "-n", "20", "-x", "a", "b"]);
        assert_eq!(cli.sources, vec!["a", "b"]);
        assert_eq!(cli.offset, 100);
        assert_eq!(cli.length, Some(20));
        assert!(cli.hex);
        assert!(!cli.list);
    }

    #[test]
    fn verbosity_maps_to_log_filter() {
        assert_eq!(Cli::parse_from(["rangecat", "a"]).log_filter(), "warn");
        assert_eq!(Cli::parse_from(["rangecat", "-vv", "a"]).log_filter(), "debug");
        assert_eq!(Cli::parse_from(["rangecat", "-vvvv", "a"]).log_filter(), "trace");
    }

    #[test]
    fn sources_are_required() {
        assert!(Cli::try_parse_from(["rangecat"]).is_err());
    }

    #[test]
    fn recognises_http_urls() {
        assert!(Cli::is_http_url("https://example.com/a.bin"));
        assert!(Cli::is_http_url("http://example.com/a.bin"));
        assert!(!Cli::is_http_url("./http/a.bin"));
    }
}
