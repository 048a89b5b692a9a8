use serde::Serialize;

/// A visual theme a shoutout can be rendered in. Static configuration, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShoutoutFrame {
    pub id: &'static str,
    pub name: &'static str,
    pub style: &'static str,
}

/// The fixed frame registry.
pub static FRAMES: [ShoutoutFrame; 3] = [
    ShoutoutFrame {
        id: "heart",
        name: "Heart",
        style: "circuit-heart-frame",
    },
    ShoutoutFrame {
        id: "code",
        name: "Code",
        style: "circuit-heart-frame",
    },
    ShoutoutFrame {
        id: "circuit",
        name: "Circuit",
        style: "circuit-heart-frame",
    },
];

/// Frame preselected on a fresh draft.
pub const DEFAULT_FRAME: &str = "heart";

/// Resolve a frame id. Unknown ids yield `None` and render unthemed.
pub fn find(id: &str) -> Option<&'static ShoutoutFrame> {
    FRAMES.iter().find(|f| f.id == id)
}
