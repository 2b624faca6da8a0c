mod process;
mod walk;

use crate::models::FileReport;

pub struct ProcessResult {
    pub files: Vec<FileReport>,
    pub excluded_count: usize,
}

pub use self::process::process;
pub use self::walk::{WalkTotals, count};
