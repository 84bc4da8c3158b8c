use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;

/// Uploads smaller than this are assumed to be too dark or too far away.
pub const DEFAULT_MIN_PHOTO_BYTES: usize = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoSlot {
    Front,
    Side,
}

impl PhotoSlot {
    pub const fn ordered() -> [Self; 2] {
        [Self::Front, Self::Side]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Front => "Front selfie",
            Self::Side => "Side / 3/4 selfie",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "front" => Some(Self::Front),
            "side" => Some(Self::Side),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoQuality {
    TooSmall,
    Clear,
}

impl PhotoQuality {
    pub const fn message(self) -> &'static str {
        match self {
            Self::TooSmall => "Too small / dark. Try again closer to your face with good light.",
            Self::Clear => "Good! Face looks clear enough for ratio scan.",
        }
    }
}

/// Result of ingesting one uploaded photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRef {
    pub slot: PhotoSlot,
    pub byte_len: usize,
    pub digest: String,
    pub quality: PhotoQuality,
}

/// Capability turning raw upload bytes into a [`PhotoRef`].
pub trait PhotoIngest: Send + Sync {
    fn ingest(&self, slot: PhotoSlot, bytes: &[u8]) -> PhotoRef;
}

/// Byte-size heuristic; no image decoding takes place.
#[derive(Debug, Clone, Copy)]
pub struct SizeHeuristicIngest {
    min_bytes: usize,
}

impl SizeHeuristicIngest {
    pub fn new(min_bytes: usize) -> Self {
        Self { min_bytes }
    }

    pub fn min_bytes(&self) -> usize {
        self.min_bytes
    }
}

impl Default for SizeHeuristicIngest {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_PHOTO_BYTES)
    }
}

impl PhotoIngest for SizeHeuristicIngest {
    fn ingest(&self, slot: PhotoSlot, bytes: &[u8]) -> PhotoRef {
        let quality = if bytes.len() < self.min_bytes {
            PhotoQuality::TooSmall
        } else {
            PhotoQuality::Clear
        };

        PhotoRef {
            slot,
            byte_len: bytes.len(),
            digest: hex_digest(bytes),
            quality,
        }
    }
}

fn hex_digest(bytes: &[u8]) -> String {
    let hash = Sha256::digest(bytes);
    let mut out = String::with_capacity(hash.len() * 2);
    for byte in hash {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// What fills a photo slot: a client-reported upload, or one ingested here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SlotFill {
    Reported,
    Ingested(PhotoRef),
}

impl SlotFill {
    fn photo(&self) -> Option<&PhotoRef> {
        match self {
            Self::Reported => None,
            Self::Ingested(photo) => Some(photo),
        }
    }
}

/// Front and side slots. Each write touches exactly one slot; the latest upload wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PhotoSlots {
    front: Option<SlotFill>,
    side: Option<SlotFill>,
}

impl PhotoSlots {
    /// Store the photo in its own slot, returning the ingested photo it displaced.
    pub fn replace(&mut self, photo: PhotoRef) -> Option<PhotoRef> {
        let previous = self.slot_mut(photo.slot).replace(SlotFill::Ingested(photo));
        match previous {
            Some(SlotFill::Ingested(photo)) => Some(photo),
            _ => None,
        }
    }

    /// Mark a slot as filled without photo details. An ingested photo already
    /// in the slot is kept. Returns `true` when the slot was empty.
    pub fn mark(&mut self, slot: PhotoSlot) -> bool {
        let target = self.slot_mut(slot);
        if target.is_some() {
            return false;
        }
        *target = Some(SlotFill::Reported);
        true
    }

    /// Ingested photo in the slot, if any. Reported slots have no details.
    pub fn get(&self, slot: PhotoSlot) -> Option<&PhotoRef> {
        self.slot(slot).as_ref().and_then(SlotFill::photo)
    }

    pub fn is_filled(&self, slot: PhotoSlot) -> bool {
        self.slot(slot).is_some()
    }

    /// Empty one slot. Returns `true` when something was removed.
    pub fn remove(&mut self, slot: PhotoSlot) -> bool {
        self.slot_mut(slot).take().is_some()
    }

    pub fn count(&self) -> u8 {
        u8::from(self.front.is_some()) + u8::from(self.side.is_some())
    }

    fn slot(&self, slot: PhotoSlot) -> &Option<SlotFill> {
        match slot {
            PhotoSlot::Front => &self.front,
            PhotoSlot::Side => &self.side,
        }
    }

    fn slot_mut(&mut self, slot: PhotoSlot) -> &mut Option<SlotFill> {
        match slot {
            PhotoSlot::Front => &mut self.front,
            PhotoSlot::Side => &mut self.side,
        }
    }
}
