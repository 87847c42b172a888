#![warn(clippy::uninlined_format_args)]

pub mod error_presenter;
pub mod member_directory;
pub mod settlement_presenter;
pub mod summary_presenter;
pub mod text_table;

pub use error_presenter::format_validation_error;
pub use member_directory::MemberDirectory;
pub use settlement_presenter::{SettlementPresenter, SettlementView, format_amount};
pub use summary_presenter::SummaryPresenter;
