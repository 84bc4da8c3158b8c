use serde::{Deserialize, Serialize};

/// Upper bound of the trust ratio. Full confidence is never reported.
pub const TRUST_CEILING: f64 = 0.98;

/// Number of photo slots that contribute to the trust ratio.
pub const MAX_COUNTED_PHOTOS: u8 = 2;

const DEFAULT_COMPLETE_BASELINE: f64 = 0.5;
const DEFAULT_INCOMPLETE_BASELINE: f64 = 0.3;
const DEFAULT_PER_PHOTO_INCREMENT: f64 = 0.2;

/// Baseline and increment table used to derive the trust ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "TrustTable")]
pub struct TrustPolicy {
    complete_baseline: f64,
    incomplete_baseline: f64,
    per_photo_increment: f64,
}

impl TrustPolicy {
    /// Values outside `0.0..=1.0` fall back to the standard table entry.
    pub fn new(complete_baseline: f64, incomplete_baseline: f64, per_photo_increment: f64) -> Self {
        Self {
            complete_baseline: sanitize(complete_baseline, DEFAULT_COMPLETE_BASELINE),
            incomplete_baseline: sanitize(incomplete_baseline, DEFAULT_INCOMPLETE_BASELINE),
            per_photo_increment: sanitize(per_photo_increment, DEFAULT_PER_PHOTO_INCREMENT),
        }
    }

    pub fn standard() -> Self {
        Self::new(
            DEFAULT_COMPLETE_BASELINE,
            DEFAULT_INCOMPLETE_BASELINE,
            DEFAULT_PER_PHOTO_INCREMENT,
        )
    }

    /// Higher complete baseline, smaller photo bonus.
    pub fn generous() -> Self {
        Self::new(0.6, 0.35, 0.15)
    }

    /// Same baseline whether or not the quiz is finished.
    pub fn cautious() -> Self {
        Self::new(0.3, 0.3, 0.2)
    }

    pub fn from_profile(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "standard" | "default" => Some(Self::standard()),
            "generous" => Some(Self::generous()),
            "cautious" => Some(Self::cautious()),
            _ => None,
        }
    }

    pub fn complete_baseline(&self) -> f64 {
        self.complete_baseline
    }

    pub fn incomplete_baseline(&self) -> f64 {
        self.incomplete_baseline
    }

    pub fn per_photo_increment(&self) -> f64 {
        self.per_photo_increment
    }

    /// Trust ratio for the given completeness and photo count, capped at [`TRUST_CEILING`].
    pub fn trust_ratio(&self, all_answered: bool, photo_count: u8) -> f64 {
        let base = if all_answered {
            self.complete_baseline
        } else {
            self.incomplete_baseline
        };
        let photos = f64::from(photo_count.min(MAX_COUNTED_PHOTOS));
        (base + photos * self.per_photo_increment).clamp(0.0, TRUST_CEILING)
    }
}

/// Unchecked wire form; deserialization goes through [`TrustPolicy::new`].
#[derive(Deserialize)]
struct TrustTable {
    complete_baseline: f64,
    incomplete_baseline: f64,
    per_photo_increment: f64,
}

impl From<TrustTable> for TrustPolicy {
    fn from(table: TrustTable) -> Self {
        Self::new(
            table.complete_baseline,
            table.incomplete_baseline,
            table.per_photo_increment,
        )
    }
}

impl Default for TrustPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

fn sanitize(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        value
    } else {
        fallback
    }
}

pub fn trust_ratio(all_answered: bool, photo_count: u8) -> f64 {
    TrustPolicy::standard().trust_ratio(all_answered, photo_count)
}
