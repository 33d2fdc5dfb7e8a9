// src/scrape/mod.rs

mod lower_house;
mod senate;
mod state;

pub use lower_house::LowerHouse;
pub use senate::Senate;
pub use state::{ContextWindow, Continuation, DocScope};

use crate::core::net::Fetch;
use crate::data::VoteInfo;
use crate::error::ScrapeError;

/// One traversal strategy per chamber, unified behind a single contract:
/// walk a session transcript from its starting URL and return the
/// assembled vote records in emission order.
pub trait Chamber {
    fn load_session(
        &self,
        fetch: &dyn Fetch,
        url: &str,
        window: usize,
    ) -> Result<Vec<VoteInfo>, ScrapeError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChamberKind {
    LowerHouse,
    Senate,
}

impl ChamberKind {
    pub fn strategy(self) -> &'static dyn Chamber {
        match self {
            ChamberKind::LowerHouse => &LowerHouse,
            ChamberKind::Senate => &Senate,
        }
    }
}
