#![forbid(unsafe_code)]

//! Retained-scene synchronisation.
//!
//! The host owns a retained drawing (SVG, canvas scene graph, ...) keyed by
//! [`NodeId`]. [`SceneSync`] turns a drained [`ChangeSet`] into the minimal
//! [`DrawCommand`] stream that brings that drawing up to date:
//!
//! - a structural change (insert, delete, reindex) or a boundary change
//!   redraws every layer, because description rows and display depths move
//!   with index and reference;
//! - otherwise only layers named in the change log are redrawn;
//! - grid ticks are redrawn only when the grid is dirty, and surplus ticks
//!   from a longer previous grid are removed.

use snowpit_core::animation::BlinkPhase;
use snowpit_core::{Line, Point, Rect};
use snowpit_layout::{ChangeSet, Layer, LayerChange, LayerId, Profile};

/// Stable identity of one retained drawing node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "node", content = "key", rename_all = "snake_case"))]
pub enum NodeId {
    /// Outline of the handle area.
    Frame,
    Handle(LayerId),
    TopEdge(LayerId),
    RightEdge(LayerId),
    Leader(LayerId),
    Description(LayerId),
    DepthTick(usize),
    DepthLabel(usize),
    HardnessTick(usize),
    HardnessLabel(usize),
}

/// Handle outline style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HandleStroke {
    #[default]
    Normal,
    /// Highlight phase of an untouched layer's blink.
    BlinkOn,
    /// Pointer is over the handle.
    Hover,
}

/// One retained-mode drawing instruction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "op", rename_all = "snake_case"))]
pub enum DrawCommand {
    Rect {
        id: NodeId,
        rect: Rect,
        stroke: HandleStroke,
    },
    Line {
        id: NodeId,
        line: Line,
    },
    Text {
        id: NodeId,
        origin: Point,
        lines: Vec<String>,
    },
    Stroke {
        id: NodeId,
        stroke: HandleStroke,
    },
    Remove {
        id: NodeId,
    },
}

impl DrawCommand {
    /// Node the command targets.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        match self {
            Self::Rect { id, .. }
            | Self::Line { id, .. }
            | Self::Text { id, .. }
            | Self::Stroke { id, .. }
            | Self::Remove { id } => *id,
        }
    }
}

/// Receiver of draw commands.
pub trait RenderSink {
    fn draw(&mut self, command: DrawCommand);
}

/// Sink that buffers commands for a host to pull.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingSink {
    commands: Vec<DrawCommand>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take all buffered commands.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Take all buffered commands as a JSON array.
    #[cfg(feature = "serde")]
    pub fn take_json(&mut self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.take())
    }
}

impl RenderSink for RecordingSink {
    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

/// Counters for the last sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncStats {
    pub layers_drawn: usize,
    pub layers_removed: usize,
    pub grid_redrawn: bool,
}

/// Tracks what the host has drawn and emits the delta for each change set.
#[derive(Debug, Clone, Default)]
pub struct SceneSync {
    drawn: Vec<LayerId>,
    depth_ticks: usize,
    hardness_ticks: usize,
    hovered: Option<LayerId>,
    blink: BlinkPhase,
}

impl SceneSync {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Layers currently in the host drawing, in draw order.
    #[must_use]
    pub fn drawn_layers(&self) -> &[LayerId] {
        &self.drawn
    }

    #[must_use]
    pub const fn hovered(&self) -> Option<LayerId> {
        self.hovered
    }

    /// Stroke for a layer's handle under the current hover and blink state.
    #[must_use]
    pub fn stroke_for(&self, layer: &Layer) -> HandleStroke {
        if self.hovered == Some(layer.id()) {
            HandleStroke::Hover
        } else if !layer.is_touched() && self.blink == BlinkPhase::On {
            HandleStroke::BlinkOn
        } else {
            HandleStroke::Normal
        }
    }

    /// Draw everything from scratch.
    pub fn full_redraw(&mut self, profile: &Profile, sink: &mut dyn RenderSink) -> SyncStats {
        let frame = profile.transform().graph().bounds();
        sink.draw(DrawCommand::Rect {
            id: NodeId::Frame,
            rect: frame,
            stroke: HandleStroke::Normal,
        });
        self.draw_grid(profile, sink);
        let (layers_drawn, layers_removed) = self.draw_all_layers(profile, sink);
        SyncStats {
            layers_drawn,
            layers_removed,
            grid_redrawn: true,
        }
    }

    /// Apply one drained change set.
    pub fn sync(
        &mut self,
        profile: &Profile,
        changes: &ChangeSet,
        sink: &mut dyn RenderSink,
    ) -> SyncStats {
        let mut stats = SyncStats::default();
        if changes.grid {
            self.draw_grid(profile, sink);
            stats.grid_redrawn = true;
        }
        if changes.has_structural_change() || changes.boundaries {
            (stats.layers_drawn, stats.layers_removed) = self.draw_all_layers(profile, sink);
            return stats;
        }

        let mut redrawn: Vec<LayerId> = Vec::new();
        for change in &changes.layers {
            let id = match *change {
                LayerChange::Updated { id }
                | LayerChange::Touched { id }
                | LayerChange::FeaturesChanged { id } => id,
                LayerChange::Inserted { .. }
                | LayerChange::Removed { .. }
                | LayerChange::Reindexed => continue,
            };
            if redrawn.contains(&id) {
                continue;
            }
            redrawn.push(id);
            if let Some(layer) = find_layer(profile, id) {
                self.draw_layer(profile, layer, sink);
                stats.layers_drawn += 1;
            }
        }
        stats
    }

    /// Move the hover highlight. Returns whether anything was redrawn.
    pub fn set_hover(
        &mut self,
        profile: &Profile,
        hovered: Option<LayerId>,
        sink: &mut dyn RenderSink,
    ) -> bool {
        // Hover events can trail a delete; a gone layer reads as no hover.
        let hovered = hovered.filter(|&id| find_layer(profile, id).is_some());
        if self.hovered == hovered {
            return false;
        }
        let previous = std::mem::replace(&mut self.hovered, hovered);
        for id in [previous, hovered].into_iter().flatten() {
            if let Some(layer) = find_layer(profile, id) {
                sink.draw(DrawCommand::Stroke {
                    id: NodeId::Handle(id),
                    stroke: self.stroke_for(layer),
                });
            }
        }
        true
    }

    /// Apply a blink phase to every untouched handle.
    pub fn set_blink(&mut self, profile: &Profile, phase: BlinkPhase, sink: &mut dyn RenderSink) {
        self.blink = phase;
        for layer in profile.layers().iter().filter(|layer| !layer.is_touched()) {
            sink.draw(DrawCommand::Stroke {
                id: NodeId::Handle(layer.id()),
                stroke: self.stroke_for(layer),
            });
        }
    }

    fn draw_all_layers(&mut self, profile: &Profile, sink: &mut dyn RenderSink) -> (usize, usize) {
        let current: Vec<LayerId> = profile.layers().iter().map(Layer::id).collect();
        let stale: Vec<LayerId> = self
            .drawn
            .iter()
            .copied()
            .filter(|id| !current.contains(id))
            .collect();
        for &id in &stale {
            remove_layer(id, sink);
            if self.hovered == Some(id) {
                self.hovered = None;
            }
        }
        for layer in profile.layers().iter() {
            self.draw_layer(profile, layer, sink);
        }
        self.drawn = current;
        (self.drawn.len(), stale.len())
    }

    fn draw_layer(&self, profile: &Profile, layer: &Layer, sink: &mut dyn RenderSink) {
        let id = layer.id();
        let geometry = layer.geometry();
        sink.draw(DrawCommand::Line {
            id: NodeId::TopEdge(id),
            line: geometry.top_edge,
        });
        sink.draw(DrawCommand::Line {
            id: NodeId::RightEdge(id),
            line: geometry.right_edge,
        });
        sink.draw(DrawCommand::Line {
            id: NodeId::Leader(id),
            line: geometry.leader,
        });
        sink.draw(DrawCommand::Rect {
            id: NodeId::Handle(id),
            rect: geometry.handle,
            stroke: self.stroke_for(layer),
        });
        let lines = profile.describe(layer);
        sink.draw(DrawCommand::Text {
            id: NodeId::Description(id),
            origin: Point::new(profile.config().description_x, geometry.description_y),
            lines,
        });
    }

    fn draw_grid(&mut self, profile: &Profile, sink: &mut dyn RenderSink) {
        let grid = profile.grid();
        let graph = profile.transform().graph();

        for (index, tick) in grid.depth_ticks.iter().enumerate() {
            sink.draw(DrawCommand::Line {
                id: NodeId::DepthTick(index),
                line: Line::horizontal(tick.y, graph.min_x(), graph.max_x()),
            });
            sink.draw(DrawCommand::Text {
                id: NodeId::DepthLabel(index),
                origin: Point::new(graph.min_x(), tick.y),
                lines: vec![tick.label.clone()],
            });
        }
        for index in grid.depth_ticks.len()..self.depth_ticks {
            sink.draw(DrawCommand::Remove {
                id: NodeId::DepthTick(index),
            });
            sink.draw(DrawCommand::Remove {
                id: NodeId::DepthLabel(index),
            });
        }
        self.depth_ticks = grid.depth_ticks.len();

        for (index, tick) in grid.hardness_ticks.iter().enumerate() {
            sink.draw(DrawCommand::Line {
                id: NodeId::HardnessTick(index),
                line: Line::vertical(tick.x, graph.min_y(), graph.max_y()),
            });
            sink.draw(DrawCommand::Text {
                id: NodeId::HardnessLabel(index),
                origin: Point::new(tick.x, graph.max_y()),
                lines: vec![tick.code.to_string()],
            });
        }
        for index in grid.hardness_ticks.len()..self.hardness_ticks {
            sink.draw(DrawCommand::Remove {
                id: NodeId::HardnessTick(index),
            });
            sink.draw(DrawCommand::Remove {
                id: NodeId::HardnessLabel(index),
            });
        }
        self.hardness_ticks = grid.hardness_ticks.len();
    }
}

fn find_layer(profile: &Profile, id: LayerId) -> Option<&Layer> {
    profile.layers().iter().find(|layer| layer.id() == id)
}

fn remove_layer(id: LayerId, sink: &mut dyn RenderSink) {
    for node in [
        NodeId::Handle(id),
        NodeId::TopEdge(id),
        NodeId::RightEdge(id),
        NodeId::Leader(id),
        NodeId::Description(id),
    ] {
        sink.draw(DrawCommand::Remove { id: node });
    }
}

/// Rect nodes in a command stream, for hit-testing hosts and tests.
#[must_use]
pub fn handle_rects(commands: &[DrawCommand]) -> Vec<(LayerId, Rect)> {
    commands
        .iter()
        .filter_map(|command| match command {
            DrawCommand::Rect {
                id: NodeId::Handle(layer),
                rect,
                ..
            } => Some((*layer, *rect)),
            _ => None,
        })
        .collect()
}
