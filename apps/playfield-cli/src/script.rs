use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use playfield_input::HostEvent;
use serde::Deserialize;

/// One host event delivered before a given frame.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptedEvent {
    pub frame: u64,
    pub event: HostEvent,
}

/// Host events grouped by the frame they precede.
#[derive(Debug, Default)]
pub struct InputScript {
    by_frame: BTreeMap<u64, Vec<HostEvent>>,
}

impl InputScript {
    pub fn from_json_str(src: &str) -> anyhow::Result<Self> {
        let events: Vec<ScriptedEvent> = serde_json::from_str(src)?;
        let mut by_frame: BTreeMap<u64, Vec<HostEvent>> = BTreeMap::new();
        for e in events {
            by_frame.entry(e.frame).or_default().push(e.event);
        }
        Ok(Self { by_frame })
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("reading input script {}", path.display()))?;
        Self::from_json_str(&src).with_context(|| format!("parsing input script {}", path.display()))
    }

    pub fn events_for(&self, frame: u64) -> &[HostEvent] {
        self.by_frame.get(&frame).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.by_frame.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use playfield_input::Key;

    #[test]
    fn groups_events_by_frame() {
        let script = InputScript::from_json_str(
            r#"[
                {"frame": 3, "event": {"KeyDown": "W"}},
                {"frame": 3, "event": {"PointerMoved": [0.5, -0.25]}},
                {"frame": 9, "event": {"KeyUp": "W"}},
                {"frame": 12, "event": "FocusLost"}
            ]"#,
        )
        .unwrap();
        assert_eq!(script.len(), 4);
        assert_eq!(
            script.events_for(3),
            &[
                HostEvent::KeyDown(Key::W),
                HostEvent::PointerMoved(Vec2::new(0.5, -0.25))
            ]
        );
        assert_eq!(script.events_for(12), &[HostEvent::FocusLost]);
        assert!(script.events_for(4).is_empty());
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(InputScript::from_json_str(r#"[{"frame": 1, "event": {"KeyDown": "Q"}}]"#).is_err());
    }
}
