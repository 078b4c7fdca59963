use crate::clamp;

/// Maps a raw model output onto a 0-1 rate. The model may answer with either
/// a fraction or a percentage, so values in `(1, 100]` are read as percent.
pub fn normalize_prediction(raw: f64) -> f64 {
    if !raw.is_finite() {
        return 0.0;
    }
    if raw <= 1.0 {
        return clamp(raw, 0.0, 1.0);
    }
    if raw <= 100.0 {
        return clamp(raw / 100.0, 0.0, 1.0);
    }
    1.0
}
