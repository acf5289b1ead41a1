// UI constants extracted from scattered magic numbers across the codebase.

/// Upper bound on concurrently live filter rows
pub const MAX_FILTER_ROWS: usize = 6;

/// Debounce delay between a filter change and the backend query, in milliseconds
pub const QUERY_DEBOUNCE_MS: u64 = 300;

/// UI spacing constants
pub mod spacing {
    /// Small spacing (4px)
    pub const SMALL: f32 = 4.0;

    /// Medium spacing (8px)
    pub const MEDIUM: f32 = 8.0;

    /// Large spacing (16px)
    pub const LARGE: f32 = 16.0;
}

/// Filter-row layout constants
pub mod filter {
    /// Side of the square index/color badge
    pub const BADGE_SIZE: f32 = 20.0;

    /// Rounding used by pickers, badges and the count plaque
    pub const ROUNDING: f32 = 6.0;

    /// Width of one element inside a row
    pub const ELEMENT_WIDTH: f32 = 190.0;

    /// Max height of a multi-select popup list
    pub const POPUP_MAX_HEIGHT: f32 = 240.0;
}
