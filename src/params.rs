// src/params.rs

use crate::scrape::ChamberKind;

/// Speech paragraphs kept as context before each vote.
pub const DEFAULT_WINDOW: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputKind {
    Text,
    Json,
    Both,
}

#[derive(Clone, Debug)]
pub struct Params {
    pub chamber: ChamberKind,
    pub window: usize,
    pub output: OutputKind,
    pub urls: Vec<String>,
}

impl Params {
    pub fn new(chamber: ChamberKind) -> Self {
        Self {
            chamber,
            window: DEFAULT_WINDOW,
            output: OutputKind::Both,
            urls: Vec::new(),
        }
    }
}
