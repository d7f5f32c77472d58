/// Goals with fewer days than this left before the deadline are flagged
pub const DEADLINE_WARNING_DAYS: i64 = 30;

/// Read-modify-write attempts for one deposit before giving up on conflicts
pub const MAX_DEPOSIT_ATTEMPTS: u32 = 5;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Calendar date format used for deadlines and creation dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";
