//! UI meshes behind generation checked handles.

mod handle_table;
mod manager;

pub use handle_table::{HandleTable, RawHandle};
pub use manager::{
    MeshContent, MeshHandle, MeshKind, MeshManager, MeshRecord, TextMesh, MAX_INDEXED_VERTEX_CAPACITY,
};
