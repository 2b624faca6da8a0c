mod output;
mod person;

pub use output::{
    AUTHORMATCH_OUTPUT_FORMAT_VERSION, ConflictMatch, ExtraData, FileReport, FileReportBuilder,
    Header, Output, SystemEnvironment,
};
pub use person::PersonName;
