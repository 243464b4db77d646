//! Deferred scene-level requests.
//!
//! Components run while the project is busy ticking one scene, so they
//! cannot switch or destroy scenes directly. They push a [`SceneCommand`]
//! into the [`SceneCommandBuffer`] instead, and the project resolves the
//! buffer at the start of its next update:
//!
//! 1. every `Destroy` is applied, in FIFO order, duplicates collapsed;
//! 2. of all `Load` requests, only the last one is honored.
//!
//! ```
//! use tessera_engine::command::SceneCommandBuffer;
//!
//! let mut cmds = SceneCommandBuffer::new();
//! cmds.load("menu");
//! cmds.destroy("intro");
//! cmds.load("level-1");
//!
//! let resolved = cmds.resolve();
//! assert_eq!(resolved.load.as_deref(), Some("level-1"));
//! assert_eq!(resolved.destroy, vec!["intro".to_owned()]);
//! assert_eq!(resolved.superseded_loads, 1);
//! assert!(cmds.is_empty());
//! ```

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SceneCommand
// ---------------------------------------------------------------------------

/// A single deferred scene request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneCommand {
    /// Make the named scene the active one.
    Load(String),
    /// Mark the named scene pending-destroy and release it.
    Destroy(String),
}

// ---------------------------------------------------------------------------
// ResolvedCommands
// ---------------------------------------------------------------------------

/// What a drained buffer boils down to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedCommands {
    /// Scenes to destroy, in first-request order, without duplicates.
    pub destroy: Vec<String>,
    /// The scene to switch to, if any load was requested.
    pub load: Option<String>,
    /// Loads that were overridden by a later load in the same batch.
    pub superseded_loads: usize,
}

// ---------------------------------------------------------------------------
// SceneCommandBuffer
// ---------------------------------------------------------------------------

/// FIFO buffer of scene requests issued since the last project update.
#[derive(Debug, Default)]
pub struct SceneCommandBuffer {
    commands: Vec<SceneCommand>,
}

impl SceneCommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, scene: &str) {
        self.commands.push(SceneCommand::Load(scene.to_owned()));
    }

    pub fn destroy(&mut self, scene: &str) {
        self.commands.push(SceneCommand::Destroy(scene.to_owned()));
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Pending commands in issue order.
    pub fn iter(&self) -> impl Iterator<Item = &SceneCommand> {
        self.commands.iter()
    }

    /// The load that would win if the buffer were resolved now.
    pub fn pending_load(&self) -> Option<&str> {
        self.commands.iter().rev().find_map(|cmd| match cmd {
            SceneCommand::Load(name) => Some(name.as_str()),
            SceneCommand::Destroy(_) => None,
        })
    }

    /// Drain the buffer and collapse it into one batch.
    pub fn resolve(&mut self) -> ResolvedCommands {
        let mut resolved = ResolvedCommands::default();
        for cmd in self.commands.drain(..) {
            match cmd {
                SceneCommand::Load(name) => {
                    if resolved.load.replace(name).is_some() {
                        resolved.superseded_loads += 1;
                    }
                }
                SceneCommand::Destroy(name) => {
                    if !resolved.destroy.contains(&name) {
                        resolved.destroy.push(name);
                    }
                }
            }
        }
        resolved
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
