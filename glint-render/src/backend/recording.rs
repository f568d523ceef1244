//! A backend that records every call instead of talking to a GPU.
//!
//! Tests and benchmarks hand a `RecordingBackend` to the renderer and
//! keep a [`CommandLog`] clone to inspect what was issued.

use super::{BackendError, FrameStats, GpuBackend, ProgramDesc, ProgramHandle, TextureId};
use crate::vertex::{Mat4, VertexAttributeDesc};
use glint_core::{Color, PixelBuffer, PixelFormat, PixelRect};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// One recorded backend call.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    CreateProgram { label: String, program: ProgramHandle },
    UseProgram(ProgramHandle),
    SetUniformMatrix { location: u32, matrix: Mat4 },
    SetUniformSampler { location: u32, unit: u32 },
    CreateTexture { texture: TextureId, width: u32, height: u32, format: PixelFormat },
    UploadTexture { texture: TextureId, region: PixelRect },
    BindTexture(Option<TextureId>),
    AllocateVertexBuffer(usize),
    WriteVertexBuffer { offset: usize, len: usize },
    EnableAttribute(u32),
    DisableAttribute(u32),
    DrawTriangles { first_vertex: u32, vertex_count: u32 },
    SetScissor(PixelRect),
    Resize { width: u32, height: u32 },
    BeginFrame,
    EndFrame,
}

#[derive(Default)]
struct LogState {
    commands: Vec<Command>,
    vertex_data: Vec<u8>,
}

/// Shared view of everything a [`RecordingBackend`] has seen.
#[derive(Clone, Default)]
pub struct CommandLog {
    state: Rc<RefCell<LogState>>,
}

impl CommandLog {
    fn push(&self, command: Command) {
        self.state.borrow_mut().commands.push(command);
    }

    /// Snapshot of all commands so far.
    pub fn commands(&self) -> Vec<Command> {
        self.state.borrow().commands.clone()
    }

    pub fn clear(&self) {
        self.state.borrow_mut().commands.clear();
    }

    /// `(first_vertex, vertex_count)` of every draw, in order.
    pub fn draws(&self) -> Vec<(u32, u32)> {
        self.state
            .borrow()
            .commands
            .iter()
            .filter_map(|c| match c {
                Command::DrawTriangles { first_vertex, vertex_count } => Some((*first_vertex, *vertex_count)),
                _ => None,
            })
            .collect()
    }

    /// Number of commands matching `pred`.
    pub fn count(&self, pred: impl Fn(&Command) -> bool) -> usize {
        self.state.borrow().commands.iter().filter(|c| pred(c)).count()
    }

    /// Contents of the current vertex buffer allocation.
    pub fn vertex_data(&self) -> Vec<u8> {
        self.state.borrow().vertex_data.clone()
    }
}

struct RecordedProgram {
    attributes: HashMap<&'static str, u32>,
    uniforms: HashSet<&'static str>,
}

/// Uniform names a program may declare, with their fixed locations.
const UNIFORMS: [(&str, u32); 2] = [("mvp", 0), ("base_color_texture", 1)];

/// In-memory [`GpuBackend`].
#[derive(Default)]
pub struct RecordingBackend {
    log: CommandLog,
    programs: Vec<RecordedProgram>,
    rejected: HashSet<String>,
    next_texture: u32,
    frame: FrameStats,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clone of the command log that stays valid after the backend is
    /// moved into a renderer.
    pub fn log(&self) -> CommandLog {
        self.log.clone()
    }

    /// Make every later `create_program` with this label fail.
    pub fn reject_program(&mut self, label: &str) {
        self.rejected.insert(label.to_string());
    }
}

impl GpuBackend for RecordingBackend {
    fn create_program(&mut self, desc: &ProgramDesc<'_>) -> Result<ProgramHandle, BackendError> {
        if self.rejected.contains(desc.label) {
            return Err(BackendError::ProgramBuild {
                label: desc.label.to_string(),
                message: "rejected by recording backend".to_string(),
            });
        }
        let program = ProgramHandle(self.programs.len() as u32);
        let uniforms = UNIFORMS
            .iter()
            .map(|(name, _)| *name)
            .filter(|name| desc.vertex_source.contains(name) || desc.fragment_source.contains(name))
            .collect();
        self.programs.push(RecordedProgram {
            attributes: desc.attributes.iter().map(|a| (a.name, a.location)).collect(),
            uniforms,
        });
        self.log.push(Command::CreateProgram { label: desc.label.to_string(), program });
        Ok(program)
    }

    fn attribute_location(&self, program: ProgramHandle, name: &str) -> Option<u32> {
        self.programs.get(program.0 as usize)?.attributes.get(name).copied()
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<u32> {
        let recorded = self.programs.get(program.0 as usize)?;
        UNIFORMS
            .iter()
            .find(|(n, _)| *n == name && recorded.uniforms.contains(n))
            .map(|(_, loc)| *loc)
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.log.push(Command::UseProgram(program));
    }

    fn set_uniform_matrix(&mut self, location: u32, matrix: &Mat4) {
        self.log.push(Command::SetUniformMatrix { location, matrix: *matrix });
    }

    fn set_uniform_sampler(&mut self, location: u32, unit: u32) {
        self.log.push(Command::SetUniformSampler { location, unit });
    }

    fn create_texture(&mut self, width: u32, height: u32, format: PixelFormat) -> TextureId {
        let texture = TextureId(self.next_texture);
        self.next_texture += 1;
        self.log.push(Command::CreateTexture { texture, width, height, format });
        texture
    }

    fn upload_texture(&mut self, texture: TextureId, region: PixelRect, _pixels: &PixelBuffer) {
        self.frame.texture_uploads += 1;
        self.log.push(Command::UploadTexture { texture, region });
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) {
        self.log.push(Command::BindTexture(texture));
    }

    fn allocate_vertex_buffer(&mut self, size: usize) {
        self.log.state.borrow_mut().vertex_data = vec![0; size];
        self.log.push(Command::AllocateVertexBuffer(size));
    }

    fn write_vertex_buffer(&mut self, offset: usize, data: &[u8]) {
        {
            let mut state = self.log.state.borrow_mut();
            let end = (offset + data.len()).min(state.vertex_data.len());
            if offset < end {
                state.vertex_data[offset..end].copy_from_slice(&data[..end - offset]);
            }
        }
        self.log.push(Command::WriteVertexBuffer { offset, len: data.len() });
    }

    fn enable_attribute(&mut self, location: u32, _desc: VertexAttributeDesc, _stride: u32) {
        self.log.push(Command::EnableAttribute(location));
    }

    fn disable_attribute(&mut self, location: u32) {
        self.log.push(Command::DisableAttribute(location));
    }

    fn draw_triangles(&mut self, first_vertex: u32, vertex_count: u32) {
        self.frame.draw_calls += 1;
        self.frame.vertices += vertex_count;
        self.log.push(Command::DrawTriangles { first_vertex, vertex_count });
    }

    fn set_scissor(&mut self, rect: PixelRect) {
        self.log.push(Command::SetScissor(rect));
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.log.push(Command::Resize { width, height });
    }

    fn begin_frame(&mut self, _clear: Color) -> Result<(), BackendError> {
        self.frame = FrameStats::default();
        self.log.push(Command::BeginFrame);
        Ok(())
    }

    fn end_frame(&mut self) -> Result<FrameStats, BackendError> {
        self.log.push(Command::EndFrame);
        Ok(std::mem::take(&mut self.frame))
    }
}
