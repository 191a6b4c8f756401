use std::rc::Rc;

use crate::config::MeshManagerConfig;
use crate::error::{Error, Result};
use crate::sprite::Sprite;
use crate::text::SpriteFont;

use super::handle_table::{HandleTable, RawHandle};

/// Handle to a mesh owned by a [`MeshManager`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct MeshHandle(RawHandle);

impl MeshHandle {
    pub const INVALID: MeshHandle = MeshHandle(RawHandle::INVALID);

    #[inline]
    pub fn raw(self) -> RawHandle {
        self.0
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MeshKind {
    Image,
    NineSlice,
    Text,
}

/// Text laid out with a sprite font.
#[derive(Debug, Clone)]
pub struct TextMesh {
    pub font: Rc<SpriteFont>,
    pub text: String,
    /// Visible glyphs in `text` (quads the mesh draws).
    pub glyph_count: u32,
}

#[derive(Debug, Clone)]
pub enum MeshContent {
    Sprite(Sprite),
    Text(TextMesh),
}

/// A live mesh: what it draws and the geometry it has room for.
#[derive(Debug, Clone)]
pub struct MeshRecord {
    content: MeshContent,
    vertex_capacity: u32,
    index_capacity: u32,
}

impl MeshRecord {
    pub fn content(&self) -> &MeshContent {
        &self.content
    }

    pub fn kind(&self) -> MeshKind {
        match &self.content {
            MeshContent::Sprite(Sprite::Image(_)) => MeshKind::Image,
            MeshContent::Sprite(_) => MeshKind::NineSlice,
            MeshContent::Text(_) => MeshKind::Text,
        }
    }

    pub fn sprite(&self) -> Option<&Sprite> {
        match &self.content {
            MeshContent::Sprite(s) => Some(s),
            MeshContent::Text(_) => None,
        }
    }

    pub fn text(&self) -> Option<&TextMesh> {
        match &self.content {
            MeshContent::Text(t) => Some(t),
            MeshContent::Sprite(_) => None,
        }
    }

    #[inline]
    pub fn vertex_capacity(&self) -> u32 {
        self.vertex_capacity
    }

    #[inline]
    pub fn index_capacity(&self) -> u32 {
        self.index_capacity
    }
}

const IMAGE_CAPACITY: (u32, u32) = (4, 6);
const NINE_SLICE_CAPACITY: (u32, u32) = (16, 54);

/// Largest vertex count addressable with 16-bit indices.
pub const MAX_INDEXED_VERTEX_CAPACITY: u32 = 0xFFFF;

/// Owns every UI mesh and tracks the geometry capacity they reserve.
///
/// Meshes are addressed by [`MeshHandle`]; a handle goes stale once its mesh
/// is destroyed, after which lookups return `None` and mutations fail with
/// `NotFound`.
#[derive(Debug)]
pub struct MeshManager {
    meshes: HandleTable<MeshRecord>,
    font_char_capacity: u32,
    total_vertex_capacity: u64,
    total_index_capacity: u64,
}

impl MeshManager {
    pub fn new(config: &MeshManagerConfig) -> Self {
        Self {
            meshes: HandleTable::with_capacity(config.initial_capacity),
            font_char_capacity: config.font_char_capacity,
            total_vertex_capacity: 0,
            total_index_capacity: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Sum of the vertex capacity of every live mesh.
    #[inline]
    pub fn total_vertex_capacity(&self) -> u64 {
        self.total_vertex_capacity
    }

    #[inline]
    pub fn total_index_capacity(&self) -> u64 {
        self.total_index_capacity
    }

    pub fn try_get(&self, handle: MeshHandle) -> Option<&MeshRecord> {
        self.meshes.get(handle.0)
    }

    pub fn contains(&self, handle: MeshHandle) -> bool {
        self.meshes.contains(handle.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MeshHandle, &MeshRecord)> {
        self.meshes.iter().map(|(h, r)| (MeshHandle(h), r))
    }

    // ── create / destroy ──────────────────────────────────────────────────

    pub fn create_mesh(&mut self, sprite: impl Into<Sprite>) -> MeshHandle {
        let sprite = sprite.into();
        let (v, i) = match sprite {
            Sprite::Image(_) => IMAGE_CAPACITY,
            Sprite::NineSlice(_) | Sprite::OptimizedNineSlice(_) => NINE_SLICE_CAPACITY,
        };
        self.insert(MeshRecord {
            content: MeshContent::Sprite(sprite),
            vertex_capacity: v,
            index_capacity: i,
        })
    }

    /// Fails with `NotSupported` if the text needs more vertices than 16-bit
    /// indices can address.
    pub fn create_text_mesh(&mut self, font: Rc<SpriteFont>, text: &str) -> Result<MeshHandle> {
        let glyph_count = font.font().glyph_count(text) as u32;
        let (v, i) = self.text_capacity(glyph_count)?;
        Ok(self.insert(MeshRecord {
            content: MeshContent::Text(TextMesh { font, text: text.to_owned(), glyph_count }),
            vertex_capacity: v,
            index_capacity: i,
        }))
    }

    fn insert(&mut self, record: MeshRecord) -> MeshHandle {
        self.total_vertex_capacity += record.vertex_capacity as u64;
        self.total_index_capacity += record.index_capacity as u64;
        let kind = record.kind();
        let handle = MeshHandle(self.meshes.insert(record));
        log::trace!("mesh {:?} created ({:?})", handle.0, kind);
        handle
    }

    /// Destroys the mesh. Returns `false` (and logs) if the handle was stale.
    pub fn destroy_mesh(&mut self, handle: MeshHandle) -> bool {
        match self.meshes.remove(handle.0) {
            Some(record) => {
                self.total_vertex_capacity -= record.vertex_capacity as u64;
                self.total_index_capacity -= record.index_capacity as u64;
                log::trace!("mesh {:?} destroyed", handle.0);
                true
            }
            None => {
                log::warn!("destroy_mesh on stale handle {:?}", handle.0);
                false
            }
        }
    }

    // ── mutate ────────────────────────────────────────────────────────────

    /// Replaces the sprite of a mesh.
    ///
    /// The old handle is retired; use the returned one from now on.
    pub fn set_mesh_sprite(&mut self, handle: MeshHandle, sprite: impl Into<Sprite>) -> Result<MeshHandle> {
        if !self.meshes.contains(handle.0) {
            return Err(stale(handle, "set_mesh_sprite"));
        }
        self.destroy_mesh(handle);
        Ok(self.create_mesh(sprite))
    }

    /// Re-lays out a text mesh, growing its capacity when the new text needs it.
    ///
    /// The handle stays valid. Fails with `InvalidArgument` for non-text meshes.
    pub fn set_mesh_text(&mut self, handle: MeshHandle, text: &str) -> Result<MeshHandle> {
        let record = self.meshes.get(handle.0).ok_or_else(|| stale(handle, "set_mesh_text"))?;
        let MeshContent::Text(current) = &record.content else {
            return Err(Error::invalid_argument(format!(
                "set_mesh_text on {:?} mesh {:?}",
                record.kind(),
                handle.0
            )));
        };
        let glyph_count = current.font.font().glyph_count(text) as u32;
        let (v, i) = self.text_capacity(glyph_count)?;
        self.ensure_capacity(handle, v, i)?;

        if let Some(MeshRecord { content: MeshContent::Text(t), .. }) = self.meshes.get_mut(handle.0) {
            t.text.clear();
            t.text.push_str(text);
            t.glyph_count = glyph_count;
        }
        Ok(handle)
    }

    /// Swaps the font of a text mesh and re-lays out its text with it.
    ///
    /// The handle stays valid. Fails with `InvalidArgument` for non-text meshes.
    pub fn set_mesh_font(&mut self, handle: MeshHandle, font: Rc<SpriteFont>) -> Result<MeshHandle> {
        let record = self.meshes.get(handle.0).ok_or_else(|| stale(handle, "set_mesh_font"))?;
        let MeshContent::Text(current) = &record.content else {
            return Err(Error::invalid_argument(format!(
                "set_mesh_font on {:?} mesh {:?}",
                record.kind(),
                handle.0
            )));
        };
        let glyph_count = font.font().glyph_count(&current.text) as u32;
        let (v, i) = self.text_capacity(glyph_count)?;
        self.ensure_capacity(handle, v, i)?;

        if let Some(MeshRecord { content: MeshContent::Text(t), .. }) = self.meshes.get_mut(handle.0) {
            t.font = font;
            t.glyph_count = glyph_count;
        }
        Ok(handle)
    }

    /// Grows the mesh so it holds at least the given geometry. Never shrinks.
    pub fn ensure_capacity(&mut self, handle: MeshHandle, vertex_capacity: u32, index_capacity: u32) -> Result<()> {
        let record = self.meshes.get_mut(handle.0).ok_or_else(|| stale(handle, "ensure_capacity"))?;
        let v = record.vertex_capacity.max(vertex_capacity);
        let i = record.index_capacity.max(index_capacity);
        if i > 0 && v > MAX_INDEXED_VERTEX_CAPACITY {
            return Err(Error::not_supported(format!(
                "{v} vertices can not be addressed with 16-bit indices"
            )));
        }
        if v == record.vertex_capacity && i == record.index_capacity {
            return Ok(());
        }
        self.total_vertex_capacity += (v - record.vertex_capacity) as u64;
        self.total_index_capacity += (i - record.index_capacity) as u64;
        log::trace!(
            "mesh {:?} capacity {}/{} -> {}/{}",
            handle.0,
            record.vertex_capacity,
            record.index_capacity,
            v,
            i
        );
        record.vertex_capacity = v;
        record.index_capacity = i;
        Ok(())
    }

    fn text_capacity(&self, glyph_count: u32) -> Result<(u32, u32)> {
        let glyphs = glyph_count.max(self.font_char_capacity) as u64;
        let (v, i) = (glyphs * 4, glyphs * 6);
        if v > MAX_INDEXED_VERTEX_CAPACITY as u64 {
            return Err(Error::not_supported(format!(
                "text mesh of {glyph_count} glyphs exceeds 16-bit index range"
            )));
        }
        Ok((v as u32, i as u32))
    }
}

impl Drop for MeshManager {
    fn drop(&mut self) {
        if !self.meshes.is_empty() {
            log::warn!("MeshManager dropped with {} live meshes", self.meshes.len());
        }
    }
}

fn stale(handle: MeshHandle, op: &str) -> Error {
    Error::not_found(format!("{op}: mesh handle {:?} is stale", handle.0))
}
