pub mod result;
pub mod status;
pub mod tree;

pub use result::{Statistic, Time};
pub use status::{Status, StatusOrder};
pub use tree::{Group, ResultNode, TestCase, tally};
