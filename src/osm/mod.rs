pub mod parser;

pub use parser::{Intake, parse_coastline, read_mainland, read_segments};
