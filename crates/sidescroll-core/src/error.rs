/// Failures at the data boundaries of a scene: snapshots and layout files.
///
/// Gameplay outcomes (death, time-out, game over) are state transitions and
/// never show up here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    SnapshotEncode(String),
    SnapshotDecode(String),
    LayoutParse(String),
    InvalidLayout(String),
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SnapshotEncode(m) => write!(f, "failed to encode scene snapshot: {m}"),
            Self::SnapshotDecode(m) => write!(f, "failed to decode scene snapshot: {m}"),
            Self::LayoutParse(m) => write!(f, "failed to parse level layout: {m}"),
            Self::InvalidLayout(m) => write!(f, "invalid level layout: {m}"),
        }
    }
}

impl std::error::Error for SceneError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_detail() {
        let err = SceneError::InvalidLayout("checkpoint 'x' unknown".to_string());
        assert_eq!(
            err.to_string(),
            "invalid level layout: checkpoint 'x' unknown"
        );
    }
}
