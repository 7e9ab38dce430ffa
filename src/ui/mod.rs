pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{group, header, stat_line, stat_placeholder, success, warn};
pub use table::{TableBuilder, articles_table, frame_table};
pub use theme::{theme, Theme};
