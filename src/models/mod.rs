pub mod choices;
pub mod loaders;
pub mod row;
pub mod section;
pub mod submission;

pub use choices::{
    join_choices, AttendanceConcern, CleanlinessPreference, HelpArea, NoisePreference,
    WorkEnvironment, WorkPosition, WorkWith,
};
pub use loaders::{load_all_submissions, load_submission, PendingSubmission};
pub use row::{compact_row, county_row, CellValue, COMPACT_COLUMNS, COUNTY_COLUMNS};
pub use section::{Emphasis, HighlightRule, HighlightScope, Rgb, Section, StyledLine};
pub use submission::{NeedsScore, Submission};
