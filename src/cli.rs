// src/cli.rs

use std::{env, error::Error};

use crate::core::net::HttpFetch;
use crate::export;
use crate::params::{OutputKind, Params};
use crate::scrape::ChamberKind;

pub fn run() -> Result<(), Box<dyn Error>> {
    let params = parse_cli()?;
    let strategy = params.chamber.strategy();
    let fetch = HttpFetch;

    for url in &params.urls {
        let votes = strategy.load_session(&fetch, url, params.window)?;

        if matches!(params.output, OutputKind::Text | OutputKind::Both) {
            for vote in &votes {
                println!("{}", export::vote_text(vote));
                println!("----------\n");
            }
        }
        if matches!(params.output, OutputKind::Json | OutputKind::Both) {
            println!("{}", export::votes_to_json(&votes)?);
        }
    }
    Ok(())
}

fn parse_cli() -> Result<Params, Box<dyn Error>> {
    let mut chamber: Option<ChamberKind> = None;
    let mut window: Option<usize> = None;
    let mut output = OutputKind::Both;
    let mut urls: Vec<String> = Vec::new();

    let mut args = env::args().skip(1);
    while let Some(a) = args.next() {
        match a.as_str() {
            "-c" | "--chamber" => {
                let v = args.next().ok_or("Missing value for --chamber")?;
                chamber = Some(match v.to_ascii_lowercase().as_str() {
                    "lower" | "psp" => ChamberKind::LowerHouse,
                    "senate" | "senat" => ChamberKind::Senate,
                    other => return Err(format!("Unknown chamber: {}", other).into()),
                });
            }
            "-w" | "--window" => {
                window = Some(args.next().ok_or("Missing value for --window")?.parse()?);
            }
            "--text" => output = OutputKind::Text,
            "--json" => output = OutputKind::Json,
            "--both" => output = OutputKind::Both,
            "-h" | "--help" => {
                eprintln!(include_str!("cli_help.txt"));
                std::process::exit(0);
            }
            other if other.starts_with('-') => return Err(format!("Unknown arg: {}", other).into()),
            _ => urls.push(a),
        }
    }

    let chamber = chamber.ok_or("Missing --chamber (lower|senate)")?;
    if urls.is_empty() {
        return Err("No transcript URLs given".into());
    }

    let mut params = Params::new(chamber);
    if let Some(w) = window {
        params.window = w;
    }
    params.output = output;
    params.urls = urls;
    Ok(params)
}
