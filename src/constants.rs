//! Global constants for typegrid
//!
//! Consolidates grid, compensation, and name-resolution constants
//! to eliminate magic numbers throughout the codebase.

// ============================================================================
// Baseline Grid Constants
// ============================================================================

/// Default baseline unit in rem
pub const DEFAULT_BASELINE_UNIT_REM: f64 = 0.5;

/// Root font size assumed by the drift compensation (pixels)
pub const ROOT_FONT_SIZE_PX: f64 = 16.0;

/// One CSS pixel expressed in rem at the assumed root font size
pub const ONE_PIXEL_IN_REM: f64 = 1.0 / ROOT_FONT_SIZE_PX;

/// Decimal places kept for every rem value the grid produces
pub const REM_DECIMAL_PLACES: i32 = 5;

/// Line heights must be a multiple of this many baseline units
pub const LINE_HEIGHT_STEP_UNITS: f64 = 0.5;

// ============================================================================
// Element Defaults
// ============================================================================

/// Family key used when an element names none
pub const DEFAULT_FONT_FAMILY: &str = "sans";

/// Weight used when an element names none
pub const DEFAULT_FONT_WEIGHT: u16 = 400;

/// Space after a block, in baseline units
pub const DEFAULT_SPACE_AFTER_UNITS: f64 = 4.0;

/// Valid CSS numeric weight range
pub const MIN_FONT_WEIGHT: u16 = 100;
pub const MAX_FONT_WEIGHT: u16 = 900;

// ============================================================================
// Name Resolution
// ============================================================================

/// OpenType name IDs in the order they are trusted
/// (typographic family, family, full name, PostScript name)
pub const NAME_ID_PRIORITY: [u16; 4] = [16, 1, 4, 6];

/// Returned when no source yields anything usable
pub const UNKNOWN_FONT_NAME: &str = "Unknown Font";

/// Windows language ID for US English
pub const WINDOWS_LANG_EN_US: u16 = 0x0409;

/// Macintosh language ID for English
pub const MAC_LANG_ENGLISH: u16 = 0;

/// Offset of `achVendID` inside the OS/2 table
pub const OS2_VENDOR_ID_OFFSET: usize = 58;
