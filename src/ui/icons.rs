pub struct Icons;

impl Icons {
    pub const CHECK: &str = "✅";
    pub const WARN: &str = "⚠️";
    pub const STATS: &str = "📊";
    pub const NEWS: &str = "📰";
    pub const CHART: &str = "📈";
    pub const EMPTY: &str = "∅";
}
