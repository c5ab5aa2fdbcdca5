//! Frame feature extraction for speech detection.
//!
//! Turns raw audio samples and a subtitle-derived label timeline into
//! equal-length per-frame sequences:
//!
//! 1. **Extraction** (`extract`): non-overlapping 0.05 s frames, each tapered
//!    over a 3-frame Hann span and summarized into 50 log-energy spectral
//!    banks of its audible-band magnitude spectrum.
//!
//! 2. **Labels** (`labels`): subtitle intervals rasterized onto the sample
//!    timeline and reduced to a strict majority vote per frame.
//!
//! 3. **Augmentation** (`augment`): adjacency expansion plus rolling maxima,
//!    reproducing the positional layout the classifier was trained on.
//!
//! Extraction runs over frame-aligned time chunks so large inputs can be
//! mapped onto a worker pool; gathered results always preserve chunk order.

mod augment;
mod extract;
mod labels;

pub use augment::{augment, expand_to_adjacent, rolling_max};
pub use extract::{compute, FeatureError, FrameFeatures};
pub use labels::{build_label_samples, frame_labels};
