use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::path::PathBuf;

use heritage::{FamilyDocument, MemberRef, SuccessionEngine};

/// Compute what every member of a family inherits at a given date
#[derive(Debug, Parser)]
#[command(name = "heritage", version)]
struct Args {
    /// JSON family document
    family: PathBuf,

    /// Date of the computation (YYYY-MM-DD), defaults to today
    #[arg(long)]
    when: Option<NaiveDate>,

    /// Only report this member
    #[arg(long)]
    member: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let when = args.when.unwrap_or_else(|| Local::now().date_naive());

    let tree = FamilyDocument::from_file(&args.family)?.build()?;
    let engine = SuccessionEngine::new();

    println!("🌳 {} members loaded from {:?}", tree.len(), args.family);
    println!("📅 Heritage as of {}", when.format("%d/%m/%Y"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    match &args.member {
        Some(name) => {
            let member = tree
                .find_by_name(name)
                .ok_or_else(|| anyhow!("No member named '{}' in this family", name))?;
            print_member(&engine, member, when, 0);
        }
        None => {
            for (generation, member) in tree.walk() {
                print_member(&engine, member, when, generation);
            }
        }
    }

    Ok(())
}

fn print_member(engine: &SuccessionEngine, member: MemberRef<'_>, when: NaiveDate, generation: usize) {
    let indent = "  ".repeat(generation);

    if member.is_dead(when) {
        println!("{}✝ {}", indent, member);
        return;
    }

    let breakdown = engine.breakdown(member, when);
    println!(
        "{}• {}  heritage={} (cash={} land={} real_estate={})  patrimony={}",
        indent,
        member,
        breakdown.total(),
        breakdown.cash,
        breakdown.land,
        breakdown.real_estate,
        member.get_patrimony(engine, when),
    );
}
