mod block;
mod bloom;
mod receipt;
mod transaction;

pub use block::*;
pub use bloom::*;
pub use receipt::*;
pub use transaction::*;
