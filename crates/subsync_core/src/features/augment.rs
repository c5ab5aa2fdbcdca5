//! Context augmentation of frame features.
//!
//! Expands each frame's vector with neighboring-frame context: adjacency
//! concatenation and rolling-window maxima. The column layout is positional
//! and must reproduce the representation the classifier coefficients were
//! trained against.

/// Value of row `i`, column `col` in the feature matrix shifted by `delta`
/// frames; out-of-range rows read as zero.
fn shifted(frames: &[Vec<f64>], i: usize, delta: isize, col: usize) -> f64 {
    let src = i as isize - delta;
    if src >= 0 && (src as usize) < frames.len() {
        frames[src as usize][col]
    } else {
        0.0
    }
}

/// Concatenate each row with its neighbors shifted by `-width..=width`
/// frames, zero-filled past the sequence boundaries.
pub fn expand_to_adjacent(frames: &[Vec<f64>], width: usize) -> Vec<Vec<f64>> {
    let n_cols = frames.first().map_or(0, Vec::len);
    frames
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let mut row = Vec::with_capacity((2 * width + 1) * n_cols);
            for delta in -(width as isize)..=width as isize {
                for col in 0..n_cols {
                    row.push(shifted(frames, i, delta, col));
                }
            }
            row
        })
        .collect()
}

/// Per-column rolling maximum over a `±width`-frame window.
///
/// Out-of-range window positions contribute zero, matching the zero-filled
/// shift semantics of the adjacency expansion.
pub fn rolling_max(frames: &[Vec<f64>], width: usize) -> Vec<Vec<f64>> {
    let n_cols = frames.first().map_or(0, Vec::len);
    frames
        .iter()
        .enumerate()
        .map(|(i, _)| {
            (0..n_cols)
                .map(|col| {
                    (-(width as isize)..=width as isize)
                        .map(|delta| shifted(frames, i, delta, col))
                        .fold(f64::NEG_INFINITY, f64::max)
                })
                .collect()
        })
        .collect()
}

/// Build the full augmented representation: adjacency expansion (±1 frame)
/// followed by rolling maxima over ±2 and ±5 frame windows, concatenated
/// per row. Output width is five times the input width.
pub fn augment(frames: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let adjacent = expand_to_adjacent(frames, 1);
    let max_2 = rolling_max(frames, 2);
    let max_5 = rolling_max(frames, 5);

    adjacent
        .into_iter()
        .zip(max_2)
        .zip(max_5)
        .map(|((mut row, m2), m5)| {
            row.extend(m2);
            row.extend(m5);
            row
        })
        .collect()
}
