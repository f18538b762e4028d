//! Offline slice of the report flow: look a player up, classify them, and
//! print the prompt that would be sent to the image model.
//!
//! Usage: `cargo run --example roster_lookup -- <name> <account> [registry.csv]`

use investment_report_builder::{build_report_prompt, profile_summary, Registry, SessionState};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let name = args.next().unwrap_or_else(|| "Kim MinJae".to_string());
    let account = args.next().unwrap_or_else(|| "123456789012".to_string());
    let registry_path = args
        .next()
        .unwrap_or_else(|| "customer_report_updated.csv".to_string());

    let registry = Registry::new(registry_path);
    let mut session = SessionState::new();

    let profile = session.submit_identity(&registry, &name, &account)?;

    println!("선수: {} | 소속: {} | 등번호: {}", profile.name, profile.team, profile.jersey_number);
    println!("포지션: {}\n", profile.position);
    println!("{}\n", profile_summary(profile));
    println!("--- prompt ---\n{}", build_report_prompt(profile));

    Ok(())
}
