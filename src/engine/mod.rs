//! Flow accumulation engine

mod accumulation;
mod trapping;

pub use accumulation::{FlowEngine, outlet_totals, trapped_sediment_total};
