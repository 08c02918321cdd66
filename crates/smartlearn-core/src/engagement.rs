//! Engagement-state heuristic over normalized 2D facial landmarks.
//!
//! Eye and mouth aspect ratios are cheap proxies for eye closure and
//! mouth opening. Thresholds are global constants; there is no
//! per-individual calibration.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Eyes mostly closed below this eye-aspect-ratio.
pub const EAR_CLOSED_THRESHOLD: f32 = 0.2;

/// Mouth open above this mouth-aspect-ratio.
pub const MAR_OPEN_THRESHOLD: f32 = 0.05;

/// Frames kept for the majority vote (about one second at 30 fps).
pub const MAJORITY_WINDOW_FRAMES: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearnerState {
    Distracted,
    Confused,
    Engaged,
}

pub type Landmark = [f32; 2];

/// The landmark subsets the heuristic needs: six points per eye, the
/// eleven-point inner mouth contour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceLandmarks {
    pub left_eye: [Landmark; 6],
    pub right_eye: [Landmark; 6],
    pub mouth: [Landmark; 11],
}

fn dist(a: Landmark, b: Landmark) -> f32 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    (dx * dx + dy * dy).sqrt()
}

/// Ratio of vertical eye-opening distances to horizontal eye width.
pub fn eye_aspect_ratio(eye: &[Landmark; 6]) -> f32 {
    let a = dist(eye[1], eye[5]);
    let b = dist(eye[2], eye[4]);
    let c = dist(eye[0], eye[3]);
    (a + b) / (2.0 * c)
}

/// Ratio of vertical mouth-opening distances to horizontal mouth width.
pub fn mouth_aspect_ratio(mouth: &[Landmark; 11]) -> f32 {
    let a = dist(mouth[2], mouth[10]);
    let b = dist(mouth[4], mouth[8]);
    let c = dist(mouth[3], mouth[9]);
    let d = dist(mouth[0], mouth[6]);
    let e = dist(mouth[1], mouth[7]);
    (a + b + c) / (3.0 * (d + e) / 2.0)
}

/// Threshold classification on pre-computed ratios. Eye closure wins
/// over mouth opening.
pub fn classify_ratios(ear: f32, mar: f32) -> LearnerState {
    if ear < EAR_CLOSED_THRESHOLD {
        LearnerState::Distracted
    } else if mar > MAR_OPEN_THRESHOLD {
        LearnerState::Confused
    } else {
        LearnerState::Engaged
    }
}

/// Classify a face from its landmarks: average both eyes, then apply
/// the fixed thresholds.
pub fn classify(face: &FaceLandmarks) -> LearnerState {
    let avg_ear = (eye_aspect_ratio(&face.left_eye) + eye_aspect_ratio(&face.right_eye)) / 2.0;
    let mar = mouth_aspect_ratio(&face.mouth);
    classify_ratios(avg_ear, mar)
}

/// Rolling majority vote over recent labels, applied before a state is
/// reported upstream. Ties favor the most recently seen label.
#[derive(Debug)]
pub struct MajorityWindow {
    capacity: usize,
    window: VecDeque<LearnerState>,
}

impl Default for MajorityWindow {
    fn default() -> Self {
        Self::new(MAJORITY_WINDOW_FRAMES)
    }
}

impl MajorityWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            window: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, state: LearnerState) {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(state);
    }

    pub fn majority(&self) -> Option<LearnerState> {
        let mut best: Option<(LearnerState, usize)> = None;
        // Scan newest-first so ties resolve to the most recent label.
        for &candidate in self.window.iter().rev() {
            let count = self.window.iter().filter(|&&s| s == candidate).count();
            match best {
                Some((_, best_count)) if best_count >= count => {}
                _ => best = Some((candidate, count)),
            }
        }
        best.map(|(state, _)| state)
    }

    pub fn clear(&mut self) {
        self.window.clear();
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_eyes_mean_distracted_regardless_of_mouth() {
        assert_eq!(classify_ratios(0.1, 0.0), LearnerState::Distracted);
        assert_eq!(classify_ratios(0.1, 0.5), LearnerState::Distracted);
    }

    #[test]
    fn open_mouth_with_open_eyes_means_confused() {
        assert_eq!(classify_ratios(0.3, 0.08), LearnerState::Confused);
    }

    #[test]
    fn open_eyes_closed_mouth_means_engaged() {
        assert_eq!(classify_ratios(0.3, 0.02), LearnerState::Engaged);
    }

    #[test]
    fn eye_aspect_ratio_from_geometry() {
        // Width 1.0, both vertical openings 0.3 -> EAR 0.3.
        let eye: [Landmark; 6] = [
            [0.0, 0.0],
            [0.25, 0.15],
            [0.75, 0.15],
            [1.0, 0.0],
            [0.75, -0.15],
            [0.25, -0.15],
        ];
        let ear = eye_aspect_ratio(&eye);
        assert!((ear - 0.3).abs() < 1e-6, "got {ear}");
    }

    #[test]
    fn nearly_shut_eye_classifies_distracted() {
        let shut_eye: [Landmark; 6] = [
            [0.0, 0.0],
            [0.25, 0.01],
            [0.75, 0.01],
            [1.0, 0.0],
            [0.75, -0.01],
            [0.25, -0.01],
        ];
        let flat_mouth: [Landmark; 11] = [[0.0, 0.0]; 11];
        let face = FaceLandmarks {
            left_eye: shut_eye,
            right_eye: shut_eye,
            mouth: flat_mouth,
        };
        assert_eq!(classify(&face), LearnerState::Distracted);
    }

    #[test]
    fn majority_vote_picks_most_frequent() {
        let mut window = MajorityWindow::new(5);
        window.push(LearnerState::Engaged);
        window.push(LearnerState::Distracted);
        window.push(LearnerState::Engaged);
        window.push(LearnerState::Confused);
        window.push(LearnerState::Engaged);
        assert_eq!(window.majority(), Some(LearnerState::Engaged));
    }

    #[test]
    fn majority_tie_favors_most_recent() {
        let mut window = MajorityWindow::new(4);
        window.push(LearnerState::Engaged);
        window.push(LearnerState::Engaged);
        window.push(LearnerState::Confused);
        window.push(LearnerState::Confused);
        assert_eq!(window.majority(), Some(LearnerState::Confused));
    }

    #[test]
    fn window_drops_oldest_at_capacity() {
        let mut window = MajorityWindow::new(2);
        window.push(LearnerState::Distracted);
        window.push(LearnerState::Engaged);
        window.push(LearnerState::Engaged);
        assert_eq!(window.len(), 2);
        assert_eq!(window.majority(), Some(LearnerState::Engaged));
    }

    #[test]
    fn empty_window_has_no_majority() {
        assert_eq!(MajorityWindow::new(3).majority(), None);
    }
}
