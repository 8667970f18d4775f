/// Animation timing and geometry tuning constants.
///
/// These constants express intended behavior (thresholds, durations, spring
/// tuning) and keep magic numbers out of the code.
// Disc geometry (screen points)
pub const DISC_RADIUS: f64 = 200.0;

// Spiral shape defaults for the drop flight path
pub const SPIRAL_SHAPE: f64 = 1.0; // a
pub const SPIRAL_GROWTH: f64 = 0.1; // b

// Fraction of the disc radius at which the drop is considered captured
pub const CAPTURE_DISTANCE_FRACTION: f64 = 0.04;

// Star finale transition length (seconds)
pub const FINALE_DURATION_SEC: f64 = 4.0;

// Added to spiral progress so the flight never samples exactly zero
pub const PROGRESS_EPSILON: f64 = 0.001;

// Smallest drop-to-center distance the controller will solve a spiral for;
// closer drops are nudged out to this radius along +x
pub const MIN_DROP_RADIUS: f64 = 1e-3;

// Offline field seeding
pub const SEED_STEP_SEC: f64 = 1.0 / 60.0;
pub const STAR_SEED_SEC: f64 = 2.0;
pub const AMBIENT_SEED_SEC: f64 = 10.0;

// Spring presets: response (seconds) and damping ratio (critical at 1)
pub const OPEN_SPRING_RESPONSE: f64 = 0.5;
pub const OPEN_SPRING_DAMPING: f64 = 0.7;
pub const CLOSE_SPRING_RESPONSE: f64 = 0.3;
pub const CLOSE_SPRING_DAMPING: f64 = 1.0;

// A spring is settled once it stays within this fraction of its target
pub const SETTLE_TOLERANCE: f64 = 1e-3;
