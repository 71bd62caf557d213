//! # talkpack CLI
//!
//! Command-line interface for the talkpack library.

use std::fs;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;

use talkpack::Result;
use talkpack::cli::Args;
use talkpack::ingest::ingest;

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        if e.is_self_name_not_found() || e.is_participant_not_found() {
            eprintln!("   Check the name you entered against the names in the export.");
        }
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let total_start = Instant::now();
    let args = <Args as ClapParser>::parse();

    println!("📦 talkpack v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Input:   {}", args.input);
    println!("👤 Self:    {}", args.self_name);
    if let Some(ref target) = args.target {
        println!("🎯 Target:  {}", target);
    }
    println!();

    let config = args.to_config();

    println!("⏳ Ingesting...");
    let parse_start = Instant::now();
    let bytes = fs::read(&args.input)?;
    let result = ingest(&bytes, &config)?;
    println!(
        "   {} messages from {} participant(s) ({:.2}s, {})",
        result.messages.len(),
        result.participants.len(),
        parse_start.elapsed().as_secs_f64(),
        result.encoding
    );

    // Summary
    println!();
    println!("📊 Summary:");
    println!(
        "   Conversation: {}",
        if result.participants.is_group {
            "group"
        } else {
            "1:1"
        }
    );
    for (name, count) in result.participants.ranked() {
        println!("   {:>6}  {}", count, name);
    }

    println!();
    println!("⏱️  Response timing ({} samples):", result.timing.sample_count());
    for bucket in talkpack::timing::TimeOfDay::all() {
        match result.timing.bucket(*bucket) {
            Some(stats) => println!(
                "   {:<14} {:>4} sample(s), mean {:.1}m, range {}",
                bucket.to_string(),
                stats.sample_count,
                stats.mean_minutes,
                stats.natural_range()
            ),
            None => println!("   {:<14} insufficient data", bucket.to_string()),
        }
    }

    // Write output
    let json = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };

    println!();
    match args.output {
        Some(ref path) => {
            fs::write(path, json)?;
            println!("✅ Done! Output saved to {}", path);
        }
        None => {
            println!("{}", json);
        }
    }

    println!();
    println!("⚡ Total time: {:.2}s", total_start.elapsed().as_secs_f64());

    Ok(())
}
