// Trading mode selection and candidate scoring
pub mod mode;
pub mod scoring;
pub mod session;

pub use mode::{choose_mode, ModeSelector, ModeSelectorConfig, ModeTally};
pub use scoring::{pick_intraday_interval, rank, score_intraday, score_swing};
pub use session::choose_mode_at;
