// src/engine/detector.rs

use crate::models::{signal::ClientSignal, violation::ViolationKind};

/// Outcome of classifying one raw browser signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: ViolationKind,
    /// Whether the learner tab must suppress the default browser action
    /// for this event (context menu, denylisted keys, copy, paste).
    pub suppress_default: bool,
}

/// Maps a raw signal to its violation category, if any.
///
/// Stateless by design: the detector never touches session state, it only
/// classifies. Tallying happens in the session state machine so the tally
/// increment and the violation record stay coupled.
pub fn classify(signal: &ClientSignal) -> Option<Classification> {
    match signal {
        ClientSignal::Visibility { hidden: true } => Some(Classification {
            kind: ViolationKind::TabSwitch,
            suppress_default: false,
        }),
        ClientSignal::ContextMenu => Some(Classification {
            kind: ViolationKind::RightClick,
            suppress_default: true,
        }),
        ClientSignal::KeyPress {
            key,
            ctrl,
            shift,
            alt: _,
            meta,
        } if is_denylisted(key, *ctrl, *shift, *meta) => Some(Classification {
            kind: ViolationKind::SuspiciousKeypress,
            suppress_default: true,
        }),
        ClientSignal::Copy => Some(Classification {
            kind: ViolationKind::CopyAttempt,
            suppress_default: true,
        }),
        ClientSignal::Paste => Some(Classification {
            kind: ViolationKind::PasteAttempt,
            suppress_default: true,
        }),
        _ => None,
    }
}

/// Fixed denylist of key combinations:
/// developer tools (F12, Ctrl+Shift+I/J/C), view-source (Ctrl+U) and the
/// copy/cut/paste accelerators (Ctrl/Cmd+C/X/V).
pub fn is_denylisted(key: &str, ctrl: bool, shift: bool, meta: bool) -> bool {
    if key.eq_ignore_ascii_case("F12") {
        return true;
    }
    if ctrl && shift {
        if ["i", "j", "c"].iter().any(|k| key.eq_ignore_ascii_case(k)) {
            return true;
        }
    }
    if ctrl && key.eq_ignore_ascii_case("u") {
        return true;
    }
    if (ctrl || meta) && ["c", "x", "v"].iter().any(|k| key.eq_ignore_ascii_case(k)) {
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: &str, ctrl: bool, shift: bool, meta: bool) -> ClientSignal {
        ClientSignal::KeyPress {
            key: key.into(),
            ctrl,
            shift,
            alt: false,
            meta,
        }
    }

    #[test]
    fn devtools_and_accelerators_are_denylisted() {
        assert!(is_denylisted("F12", false, false, false));
        assert!(is_denylisted("I", true, true, false));
        assert!(is_denylisted("j", true, true, false));
        assert!(is_denylisted("u", true, false, false));
        assert!(is_denylisted("c", true, false, false));
        assert!(is_denylisted("V", false, false, true));
        assert!(!is_denylisted("a", true, false, false));
        assert!(!is_denylisted("c", false, false, false));
    }

    #[test]
    fn signal_classification() {
        let c = classify(&ClientSignal::Visibility { hidden: true }).unwrap();
        assert_eq!(c.kind, ViolationKind::TabSwitch);
        assert!(!c.suppress_default);

        assert!(classify(&ClientSignal::Visibility { hidden: false }).is_none());

        let c = classify(&ClientSignal::ContextMenu).unwrap();
        assert_eq!(c.kind, ViolationKind::RightClick);
        assert!(c.suppress_default);

        let c = classify(&key("c", true, false, false)).unwrap();
        assert_eq!(c.kind, ViolationKind::SuspiciousKeypress);
        assert!(c.suppress_default);

        assert!(classify(&key("a", false, false, false)).is_none());

        let c = classify(&ClientSignal::Copy).unwrap();
        assert_eq!(c.kind, ViolationKind::CopyAttempt);
        let c = classify(&ClientSignal::Paste).unwrap();
        assert_eq!(c.kind, ViolationKind::PasteAttempt);

        // Non-detector signals never classify.
        assert!(classify(&ClientSignal::Submit).is_none());
    }
}
