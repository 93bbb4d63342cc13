//! UI models and metadata that should be available on both wasm and native.
//!
//! Keeping these out of the wasm-only `web` module allows us to unit-test the
//! page inventory and frame timing on the host.

use folio::assistant::{MessageKind, Role};

/// Length of one reference frame. Field speeds are expressed per frame at 60 Hz.
pub const REFERENCE_FRAME_MS: f64 = 1000.0 / 60.0;

/// Anchored page sections, in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavSection {
    Manifesto,
    Projects,
    Connect,
}

impl NavSection {
    pub fn label(self) -> &'static str {
        match self {
            NavSection::Manifesto => "MANIFESTO",
            NavSection::Projects => "PROJECTS",
            NavSection::Connect => "CONNECT",
        }
    }

    /// DOM id of the section element.
    pub fn anchor(self) -> &'static str {
        match self {
            NavSection::Manifesto => "manifesto",
            NavSection::Projects => "projects",
            NavSection::Connect => "connect",
        }
    }

    pub fn href(self) -> String {
        format!("#{}", self.anchor())
    }

    pub fn all() -> &'static [NavSection] {
        &[
            NavSection::Manifesto,
            NavSection::Projects,
            NavSection::Connect,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlineStat {
    pub value: &'static str,
    pub label: &'static str,
}

pub const HEADLINE_STATS: &[HeadlineStat] = &[
    HeadlineStat {
        value: "10K+",
        label: "Private Pool",
    },
    HeadlineStat {
        value: "50+",
        label: "Practical",
    },
];

pub const SOCIAL_LINKS: &[&str] = &["GITHUB", "LINKEDIN", "EMAIL"];

/// Staggered reveal delay for the n-th card of a three-column grid.
pub fn reveal_delay_ms(index: usize) -> u32 {
    (index % 3) as u32 * 100
}

/// Elapsed time between two animation-frame timestamps, in reference frames.
///
/// The first frame (no previous timestamp) counts as one frame. Clock skew
/// yields zero; the field clamps the upper end.
pub fn frame_step(previous_ms: Option<f64>, now_ms: f64) -> f32 {
    match previous_ms {
        None => 1.0,
        Some(prev) => {
            let elapsed = now_ms - prev;
            if elapsed.is_finite() && elapsed > 0.0 {
                (elapsed / REFERENCE_FRAME_MS) as f32
            } else {
                0.0
            }
        }
    }
}

/// CSS class for a chat bubble.
pub fn bubble_class(role: Role, kind: MessageKind) -> &'static str {
    match (role, kind) {
        (Role::User, _) => "bubble bubble-user",
        (Role::Assistant, MessageKind::Offline) => "bubble bubble-assistant bubble-offline",
        (Role::Assistant, MessageKind::Failure) => "bubble bubble-assistant bubble-failure",
        (Role::Assistant, _) => "bubble bubble-assistant",
    }
}

pub fn bubble_row_class(role: Role) -> &'static str {
    match role {
        Role::User => "bubble-row bubble-row-user",
        Role::Assistant => "bubble-row bubble-row-assistant",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nav_sections_have_unique_anchors() {
        let all = NavSection::all();
        assert_eq!(all.len(), 3);
        for (i, a) in all.iter().enumerate() {
            assert!(a.href().starts_with('#'));
            for b in &all[i + 1..] {
                assert_ne!(a.anchor(), b.anchor());
            }
        }
    }

    #[test]
    fn frame_step_is_measured_in_reference_frames() {
        assert_eq!(frame_step(None, 1234.0), 1.0);
        let one = frame_step(Some(1000.0), 1000.0 + REFERENCE_FRAME_MS);
        assert!((one - 1.0).abs() < 1e-4);
        let two = frame_step(Some(0.0), 2.0 * REFERENCE_FRAME_MS);
        assert!((two - 2.0).abs() < 1e-4);
        assert_eq!(frame_step(Some(50.0), 10.0), 0.0);
        assert_eq!(frame_step(Some(0.0), f64::NAN), 0.0);
    }

    #[test]
    fn reveal_delay_cycles_per_row() {
        let delays: Vec<u32> = (0..6).map(reveal_delay_ms).collect();
        assert_eq!(delays, [0, 100, 200, 0, 100, 200]);
    }

    #[test]
    fn fallback_bubbles_are_distinguishable() {
        assert_ne!(
            bubble_class(Role::Assistant, MessageKind::Reply),
            bubble_class(Role::Assistant, MessageKind::Failure)
        );
        assert_eq!(
            bubble_class(Role::User, MessageKind::User),
            "bubble bubble-user"
        );
    }
}
