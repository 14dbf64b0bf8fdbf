pub mod header;
pub mod writer;

pub use header::PlyHeader;
pub use writer::PlyWriter;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlyError {
	#[error("ply io error: {0}")]
	Io(#[from] std::io::Error),
	#[error("malformed ply header at line {line}: {reason}")]
	MalformedHeader { line: usize, reason: String },
}

/// A triangle mesh that can be handed to the exporter.
///
/// Procedures that produce meshes implement this so the exporter doesn't need to know
/// anything about how the mesh was built.
pub trait TriangleMesh {
	/// Vertex positions, one `[x, y, z]` per vertex.
	fn positions(&self) -> &[[f32; 3]];

	/// Triangles as indices into [`TriangleMesh::positions`].
	fn triangles(&self) -> &[[u32; 3]];
}
