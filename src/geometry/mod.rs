pub mod plots;

pub use plots::{PlotDefinition, PlotRegistry};
