//! Editor state and the actions that produce new revisions of it.

use crate::compute::{Direction, transform};
use crate::schema::{ExportConfigPatch, Frame, GRID_SIZE, Grid, Pixel, Project, Shape};

/// A user edit.
#[derive(Debug, Clone, PartialEq)]
pub enum EditAction {
    /// Append an empty frame and select it.
    AddFrame,
    /// Insert a copy of the current frame after it and select the copy.
    DuplicateFrame,
    /// Remove the current frame; ignored when it is the only one.
    DeleteFrame,
    MoveFrame { from: usize, to: usize },
    SelectFrame(usize),
    SetGrid(Grid),
    SetPixel { row: usize, col: usize, pixel: Pixel },
    Clear,
    Fill,
    Invert,
    ApplyShape(Shape),
    Shift(Direction),
    Rotate { clockwise: bool },
    FlipHorizontal,
    FlipVertical,
    /// Default duration for frames added from now on.
    SetPlaybackSpeed(u32),
    /// Duration of the current frame.
    SetFrameDuration(u32),
    Rename(String),
    UpdateExportConfig(ExportConfigPatch),
}

/// One revision of the editor: a project and the selected frame.
///
/// [`EditorState::apply`] never mutates a revision; it returns the next one,
/// so earlier revisions can be kept as history snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    project: Project,
    current_frame: usize,
}

impl EditorState {
    /// Start editing `project` at its first frame.
    ///
    /// A project without frames gets one empty frame.
    pub fn new(mut project: Project) -> Self {
        if project.frames.is_empty() {
            project.frames.push(Frame::empty(project.playback_speed));
        }
        Self {
            project,
            current_frame: 0,
        }
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn into_project(self) -> Project {
        self.project
    }

    pub fn current_index(&self) -> usize {
        self.current_frame
    }

    pub fn current(&self) -> &Frame {
        &self.project.frames[self.current_frame]
    }

    /// Produce the revision that results from `action`.
    ///
    /// Actions with out-of-range indices leave the state unchanged.
    #[must_use]
    pub fn apply(&self, action: EditAction) -> Self {
        let mut next = self.clone();
        let len = next.project.frames.len();

        match action {
            EditAction::AddFrame => {
                let frame = Frame::empty(next.project.playback_speed);
                next.project.frames.push(frame);
                next.current_frame = len;
                next.project.touch();
            }
            EditAction::DuplicateFrame => {
                let copy = self.current().duplicate();
                next.project.frames.insert(self.current_frame + 1, copy);
                next.current_frame = self.current_frame + 1;
                next.project.touch();
            }
            EditAction::DeleteFrame => {
                if len > 1 {
                    next.project.frames.remove(self.current_frame);
                    next.current_frame = self.current_frame.min(len - 2);
                    next.project.touch();
                }
            }
            EditAction::MoveFrame { from, to } => {
                if from < len && to < len && from != to {
                    let frame = next.project.frames.remove(from);
                    next.project.frames.insert(to, frame);
                    next.current_frame = follow_move(self.current_frame, from, to);
                    next.project.touch();
                }
            }
            EditAction::SelectFrame(index) => {
                next.current_frame = index.min(len - 1);
            }
            EditAction::SetGrid(grid) => next.set_current_grid(grid),
            EditAction::SetPixel { row, col, pixel } => {
                if row < GRID_SIZE && col < GRID_SIZE {
                    let grid = self.current().grid.with_pixel(row, col, pixel);
                    next.set_current_grid(grid);
                }
            }
            EditAction::Clear => next.set_current_grid(transform::clear()),
            EditAction::Fill => next.set_current_grid(transform::fill()),
            EditAction::Invert => next.set_current_grid(transform::invert(&self.current().grid)),
            EditAction::ApplyShape(shape) => next.set_current_grid(shape.generate()),
            EditAction::Shift(direction) => {
                next.set_current_grid(transform::shift_direction(&self.current().grid, direction))
            }
            EditAction::Rotate { clockwise } => {
                next.set_current_grid(transform::rotate90(&self.current().grid, clockwise))
            }
            EditAction::FlipHorizontal => {
                next.set_current_grid(transform::flip_horizontal(&self.current().grid))
            }
            EditAction::FlipVertical => {
                next.set_current_grid(transform::flip_vertical(&self.current().grid))
            }
            EditAction::SetPlaybackSpeed(ms) => next.project.playback_speed = ms,
            EditAction::SetFrameDuration(ms) => {
                next.project.frames[self.current_frame].duration = ms;
            }
            EditAction::Rename(name) => {
                next.project.name = name;
                next.project.touch();
            }
            EditAction::UpdateExportConfig(patch) => {
                next.project.export_config = patch.apply(&self.project.export_config);
                next.project.touch();
            }
        }

        next
    }

    fn set_current_grid(&mut self, grid: Grid) {
        self.project.frames[self.current_frame].grid = grid;
    }
}

/// Where the selection ends up after moving the frame at `from` to `to`.
fn follow_move(current: usize, from: usize, to: usize) -> usize {
    if current == from {
        to
    } else if current > from && current <= to {
        current - 1
    } else if current < from && current >= to {
        current + 1
    } else {
        current
    }
}
