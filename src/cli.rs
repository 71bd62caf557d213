//! Command-line interface definition using clap.
//!
//! The binary reads one export file, runs the full ingestion pipeline, and
//! writes the structured result (messages + participants + timing profile)
//! as JSON for downstream tooling.

use clap::Parser;

/// Turn a KakaoTalk chat export into role-annotated messages and a
/// response-timing profile.
#[derive(Parser, Debug, Clone)]
#[command(name = "talkpack")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    talkpack KakaoTalkChats.txt --self-name 홍길동
    talkpack chat.txt -s 나 -o result.json --pretty
    talkpack group_chat.txt -s 나 --target 김영희
    talkpack chat.txt -s 나 --keep-system --cap 720")]
pub struct Args {
    /// Path to the exported chat text file
    pub input: String,

    /// Your display name as it appears in the chat
    #[arg(short = 's', long, value_name = "NAME")]
    pub self_name: String,

    /// In a group chat, keep only messages between you and this person
    #[arg(long, value_name = "NAME")]
    pub target: Option<String>,

    /// Path to output JSON file (prints to stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Keep KakaoTalk system messages instead of skipping them
    #[arg(long)]
    pub keep_system: bool,

    /// Discard response-latency samples longer than this many minutes
    #[arg(long, value_name = "MINUTES", default_value_t = 1440)]
    pub cap: i64,
}

impl Args {
    /// Builds the pipeline configuration from the parsed arguments.
    pub fn to_config(&self) -> crate::config::IngestConfig {
        let mut config = crate::config::IngestConfig::new(&self.self_name)
            .with_skip_system_messages(!self.keep_system)
            .with_outlier_cap_minutes(self.cap);
        if let Some(target) = &self.target {
            config = config.with_target_person(target);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse_minimal() {
        let args = Args::try_parse_from(["talkpack", "chat.txt", "-s", "나"]).unwrap();
        assert_eq!(args.input, "chat.txt");
        assert_eq!(args.self_name, "나");
        assert!(args.target.is_none());
        assert_eq!(args.cap, 1440);
        assert!(!args.keep_system);
    }

    #[test]
    fn test_args_require_self_name() {
        assert!(Args::try_parse_from(["talkpack", "chat.txt"]).is_err());
    }

    #[test]
    fn test_to_config() {
        let args = Args::try_parse_from([
            "talkpack",
            "chat.txt",
            "-s",
            "나",
            "--target",
            "영희",
            "--keep-system",
            "--cap",
            "60",
        ])
        .unwrap();
        let config = args.to_config();
        assert_eq!(config.resolve.self_name, "나");
        assert_eq!(config.resolve.target_person.as_deref(), Some("영희"));
        assert!(!config.segmenter.skip_system_messages);
        assert_eq!(config.timing.outlier_cap_minutes, 60);
    }
}
